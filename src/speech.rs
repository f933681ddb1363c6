//! Text-to-speech
//!
//! Synthesized audio is written to a file; playback is left to the operator.

use crate::config::SpeechConfig;
use crate::error::{HrError, Result};
use crate::utils::ensure_directory;
use async_openai::config::OpenAIConfig;
use async_openai::types::{CreateSpeechRequestArgs, SpeechModel, Voice};
use async_openai::Client;
use std::path::PathBuf;

/// Turns text into speech
pub trait Speaker {
    /// Synthesize `text`; returns the audio file when one was produced
    async fn speak(&self, text: &str) -> Result<Option<PathBuf>>;
}

fn parse_voice(name: &str) -> Voice {
    match name.trim().to_lowercase().as_str() {
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        "alloy" => Voice::Alloy,
        other => {
            log::warn!("Unknown TTS voice '{}', using alloy", other);
            Voice::Alloy
        }
    }
}

fn parse_model(name: &str) -> SpeechModel {
    match name {
        "tts-1" => SpeechModel::Tts1,
        "tts-1-hd" => SpeechModel::Tts1Hd,
        other => SpeechModel::Other(other.to_string()),
    }
}

/// OpenAI speech endpoint; each call overwrites `speech.mp3` in the output dir
pub struct OpenAiSpeech {
    client: Client<OpenAIConfig>,
    config: SpeechConfig,
}

impl OpenAiSpeech {
    pub fn new(client: Client<OpenAIConfig>, config: SpeechConfig) -> Self {
        Self { client, config }
    }
}

impl Speaker for OpenAiSpeech {
    async fn speak(&self, text: &str) -> Result<Option<PathBuf>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .voice(parse_voice(&self.config.voice))
            .model(parse_model(&self.config.model))
            .build()?;

        let response = self.client.audio().speech(request).await?;

        ensure_directory(&self.config.output_dir)?;
        let path = self.config.output_dir.join("speech.mp3");
        let path_str = path
            .to_str()
            .ok_or_else(|| HrError::Speech(format!("Invalid audio path: {}", path.display())))?;
        response.save(path_str).await?;

        log::debug!("Speech written to {}", path.display());
        Ok(Some(path))
    }
}

/// Speaker that produces no audio
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    async fn speak(&self, _text: &str) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Speaker selected from configuration
pub enum SpeechBackend {
    OpenAi(OpenAiSpeech),
    Silent(SilentSpeaker),
}

impl SpeechBackend {
    pub fn from_config(config: &SpeechConfig, client: &Client<OpenAIConfig>) -> Self {
        if config.enabled {
            SpeechBackend::OpenAi(OpenAiSpeech::new(client.clone(), config.clone()))
        } else {
            log::info!("Speech synthesis disabled");
            SpeechBackend::Silent(SilentSpeaker)
        }
    }
}

impl Speaker for SpeechBackend {
    async fn speak(&self, text: &str) -> Result<Option<PathBuf>> {
        match self {
            SpeechBackend::OpenAi(s) => s.speak(text).await,
            SpeechBackend::Silent(s) => s.speak(text).await,
        }
    }
}

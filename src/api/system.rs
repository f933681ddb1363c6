//! HrSystem - top-level controller
//!
//! Owns the document store and the external-service seams. Ingestion,
//! matching and interviews are implemented in sibling modules as further
//! `impl` blocks.

use crate::config::Config;
use crate::error::Result;
use crate::llm::{ChatModel, OpenAiChat, create_client};
use crate::ml::{Embedder, EmbeddingBackend};
use crate::speech::{Speaker, SpeechBackend};
use crate::storage::DocumentStore;

/// Controller wired to OpenAI services
pub type OpenAiHrSystem = HrSystem<OpenAiChat, EmbeddingBackend, SpeechBackend>;

pub struct HrSystem<M, E, S> {
    pub(crate) config: Config,
    pub(crate) store: DocumentStore,
    pub(crate) chat: M,
    pub(crate) embedder: E,
    pub(crate) speaker: S,
}

impl<M, E, S> HrSystem<M, E, S>
where
    M: ChatModel,
    E: Embedder,
    S: Speaker,
{
    /// Open the data directory named by `config` and wire the given services
    pub fn new(config: Config, chat: M, embedder: E, speaker: S) -> Result<Self> {
        let store = DocumentStore::new(&config.data_path)?;
        log::info!(
            "Initializing HR system (data path: {}, embedder: {})",
            config.data_path.display(),
            embedder.name()
        );
        Ok(Self {
            config,
            store,
            chat,
            embedder,
            speaker,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn chat(&self) -> &M {
        &self.chat
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}

impl OpenAiHrSystem {
    /// Controller backed by the OpenAI APIs configured in `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let client = create_client(&config.llm);
        let chat = OpenAiChat::new(client.clone());
        let embedder = EmbeddingBackend::from_config(&config, &client);
        let speaker = SpeechBackend::from_config(&config.speech, &client);
        Self::new(config, chat, embedder, speaker)
    }
}

//! # neurohr
//!
//! Interview automation: vacancy and resume PDFs are parsed into structured
//! records by an LLM, embedded into flat nearest-neighbour indexes, matched
//! against each other, and candidates are interviewed through a console with
//! optional speech before an LLM-written assessment is saved.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use neurohr::{Config, OpenAiHrSystem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env().with_data_path("./data");
//!     let system = OpenAiHrSystem::from_config(config)?;
//!
//!     // Parse PDFs from data/vacancies_pdf and data/resumes_pdf
//!     system.process_pdf_files().await;
//!
//!     for result in system.search_resumes_for_vacancy("python_dev", 3).await {
//!         println!("{}. {} ({:.4})", result.rank, result.id, result.score);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod interview;
pub mod llm;
pub mod logging;
pub mod ml;
pub mod speech;
pub mod storage;
pub mod text;
pub mod utils;

// Re-export main API types
pub use api::{HrSystem, MatchResult, OpenAiHrSystem, ProcessReport};
pub use config::Config;
pub use error::{HrError, Result};

// Re-export commonly used types
pub use interview::{Console, StdConsole};
pub use llm::{ChatModel, ChatRequest, OpenAiChat};
pub use ml::{Embedder, EmbeddingBackend, HashEmbedder, VectorIndex};
pub use speech::{SilentSpeaker, Speaker, SpeechBackend};
pub use storage::{DocumentStore, IngestStats, RecordKind, ResumeRecord, VacancyRecord};
pub use text::{Chunk, ChunkKind};

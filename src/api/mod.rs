//! Top-level operations of neurohr
//!
//! [`HrSystem`] ties the document store, extraction, vector indexes and the
//! interview runner together.

pub mod ingest;
pub mod matching;
pub mod session;
pub mod system;

// Re-export main API types
pub use ingest::ProcessReport;
pub use matching::MatchResult;
pub use system::{HrSystem, OpenAiHrSystem};

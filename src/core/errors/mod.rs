//! Error handling for the chunking pipeline.

mod types;

pub use types::{ConfigError, DocumentError, OcrEngineError, PipelineError, ProcessingStage};

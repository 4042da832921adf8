//! The core module of the chunking pipeline.
//!
//! This module contains the fundamental components shared by the rest of the crate:
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//! - Traits describing the external rasterizer and OCR collaborators

pub mod config;
pub mod constants;
pub mod errors;
pub mod traits;

pub use config::{
    ChunkingConfig, ClassifierConfig, ConfigValidator, ParallelPolicy, PdfRenderSettings,
    PipelineConfig,
};
pub use constants::*;
pub use errors::{ConfigError, DocumentError, OcrEngineError, PipelineError, ProcessingStage};
pub use traits::{LazyOcrEngine, OcrEngine, Rasterizer, SharedOcrEngine};

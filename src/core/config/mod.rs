//! Configuration management for the chunking pipeline.
//!
//! This module provides configuration types and the validation trait used by
//! every configurable component.

pub mod parallel;
pub mod pipeline;

pub use parallel::ParallelPolicy;
pub use pipeline::{ChunkingConfig, ClassifierConfig, PdfRenderSettings, PipelineConfig};

use crate::core::errors::ConfigError;

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validates that a confidence threshold lies between 0.0 and 1.0.
    fn validate_confidence_threshold(
        &self,
        field: &str,
        threshold: f32,
    ) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            Err(ConfigError::invalid_field(
                field,
                "a value between 0.0 and 1.0",
                threshold,
            ))
        } else {
            Ok(())
        }
    }
}

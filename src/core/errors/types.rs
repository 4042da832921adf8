//! Core error types for the chunking pipeline.
//!
//! This module defines the error taxonomy used throughout the crate:
//! [`DocumentError`] for malformed or unreadable input documents,
//! [`OcrEngineError`] for failures of the OCR capability, [`ConfigError`] for
//! invalid settings, and the top-level [`PipelineError`] that the orchestrator
//! converts into a structured error response.

use std::path::PathBuf;
use thiserror::Error;

/// Enum representing the stages of the document pipeline.
///
/// Used to tag log records with the stage where a run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Input checks before any rasterization happens.
    Validation,
    /// Conversion of the document into page images.
    Rasterization,
    /// Per-page text recognition.
    Recognition,
    /// Grouping of classified regions into sections.
    Organization,
    /// Packing of sections into page-bounded chunks.
    Chunking,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Validation => write!(f, "validation"),
            ProcessingStage::Rasterization => write!(f, "rasterization"),
            ProcessingStage::Recognition => write!(f, "recognition"),
            ProcessingStage::Organization => write!(f, "organization"),
            ProcessingStage::Chunking => write!(f, "chunking"),
        }
    }
}

/// Errors caused by the input document itself or by turning it into page images.
///
/// Every variant aborts the pipeline: no partial chunks are produced.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input path does not carry a `.pdf` extension.
    #[error("Input file must be a '.pdf' file.")]
    NotAPdf,

    /// The input path does not exist.
    #[error("File {} does not exist.", .0.display())]
    NotFound(PathBuf),

    /// The input blob is larger than the configured limit.
    #[error("Document is {actual} bytes, exceeding the limit of {limit} bytes")]
    TooLarge {
        /// Size of the rejected document.
        actual: usize,
        /// Configured maximum size.
        limit: usize,
    },

    /// The blob could not be parsed as a PDF.
    #[error("Failed to convert PDF: {0}")]
    Load(String),

    /// The PDF parsed but contains no pages.
    #[error("Document has no pages")]
    EmptyDocument,

    /// A page could not be rendered to an image.
    #[error("Failed to convert PDF: page {page} could not be rendered: {message}")]
    Render {
        /// 1-based page number.
        page: usize,
        /// Renderer diagnostic.
        message: String,
    },

    /// The rasterization backend could not be initialized.
    #[error("PDF rasterizer unavailable: {0}")]
    RasterizerUnavailable(String),
}

/// Errors reported by an OCR capability.
#[derive(Error, Debug)]
pub enum OcrEngineError {
    /// Recognition failed for one page. The orchestrator absorbs this variant.
    #[error("OCR processing failed: {0}")]
    Recognition(String),

    /// The engine could not be constructed, so no page can be recognized.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// A model or dictionary file is missing.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The engine was configured with unsupported settings.
    #[error("Invalid OCR configuration: {0}")]
    Config(String),
}

impl OcrEngineError {
    /// Returns true when the failure is confined to a single page.
    pub fn is_page_local(&self) -> bool {
        matches!(self, OcrEngineError::Recognition(_))
    }
}

/// Error indicating an invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A field holds a value outside its accepted range.
    #[error("invalid value for field '{field}': expected {expected}, got {actual}")]
    InvalidField {
        /// Dotted path of the offending field.
        field: String,
        /// Description of the accepted values.
        expected: String,
        /// The value that was supplied.
        actual: String,
    },

    /// The configuration source could not be read or parsed.
    #[error("configuration could not be loaded: {0}")]
    Load(String),
}

impl ConfigError {
    /// Creates a configuration error for an invalid field value.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl ToString,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            expected: expected.into(),
            actual: actual.to_string(),
        }
    }
}

/// Top-level error of a pipeline run.
///
/// The public `process*` entry points never surface this type directly; they
/// render it into an error response whose message is this error's `Display`.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input document is invalid or could not be rasterized.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The OCR capability failed in a way that affects every page.
    #[error(transparent)]
    Engine(#[from] OcrEngineError),

    /// The pipeline configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error while reading the input.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// A collaborator or processing step panicked.
    #[error("Unexpected error during {stage}: {message}")]
    Internal {
        /// Stage that was running when the fault occurred.
        stage: ProcessingStage,
        /// Panic payload, when it carried a message.
        message: String,
    },
}

impl PipelineError {
    /// Returns the pipeline stage this error belongs to.
    pub fn stage(&self) -> ProcessingStage {
        match self {
            PipelineError::Document(DocumentError::Load(_))
            | PipelineError::Document(DocumentError::EmptyDocument)
            | PipelineError::Document(DocumentError::Render { .. })
            | PipelineError::Document(DocumentError::RasterizerUnavailable(_)) => {
                ProcessingStage::Rasterization
            }
            PipelineError::Document(_) | PipelineError::Io(_) | PipelineError::Config(_) => {
                ProcessingStage::Validation
            }
            PipelineError::Engine(_) => ProcessingStage::Recognition,
            PipelineError::Internal { stage, .. } => *stage,
        }
    }
}

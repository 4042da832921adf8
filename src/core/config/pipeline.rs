//! Pipeline-level configuration types.

use crate::core::config::{ConfigValidator, ParallelPolicy};
use crate::core::constants::{
    DEFAULT_MAX_DOCUMENT_BYTES, DEFAULT_MAX_PAGES_PER_CHUNK, DEFAULT_RENDER_DPI,
    DEFAULT_RENDER_MAX_DIMENSION, DEFAULT_TITLE_MAX_WORDS, DEFAULT_TITLE_MIN_CONFIDENCE,
};
use crate::core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds used to tell titles apart from body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Titles must have a confidence strictly greater than this value.
    #[serde(default = "ClassifierConfig::default_title_min_confidence")]
    pub title_min_confidence: f32,
    /// Titles must have strictly fewer words than this value.
    #[serde(default = "ClassifierConfig::default_title_max_words")]
    pub title_max_words: usize,
}

impl ClassifierConfig {
    pub fn with_title_min_confidence(mut self, confidence: f32) -> Self {
        self.title_min_confidence = confidence;
        self
    }

    pub fn with_title_max_words(mut self, words: usize) -> Self {
        self.title_max_words = words;
        self
    }

    fn default_title_min_confidence() -> f32 {
        DEFAULT_TITLE_MIN_CONFIDENCE
    }

    fn default_title_max_words() -> usize {
        DEFAULT_TITLE_MAX_WORDS
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            title_min_confidence: Self::default_title_min_confidence(),
            title_max_words: Self::default_title_max_words(),
        }
    }
}

impl ConfigValidator for ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_confidence_threshold(
            "classifier.title_min_confidence",
            self.title_min_confidence,
        )
    }
}

/// Bounds applied by the chunk packer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum number of distinct source pages one chunk may cover.
    #[serde(default = "ChunkingConfig::default_max_pages_per_chunk")]
    pub max_pages_per_chunk: usize,
}

impl ChunkingConfig {
    pub fn with_max_pages_per_chunk(mut self, max_pages: usize) -> Self {
        self.max_pages_per_chunk = max_pages;
        self
    }

    fn default_max_pages_per_chunk() -> usize {
        DEFAULT_MAX_PAGES_PER_CHUNK
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_pages_per_chunk: Self::default_max_pages_per_chunk(),
        }
    }
}

impl ConfigValidator for ChunkingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pages_per_chunk == 0 {
            return Err(ConfigError::invalid_field(
                "chunking.max_pages_per_chunk",
                "at least 1",
                self.max_pages_per_chunk,
            ));
        }
        Ok(())
    }
}

/// Configuration for PDF rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfRenderSettings {
    /// DPI for rendering (default: 200)
    #[serde(default = "PdfRenderSettings::default_dpi")]
    pub dpi: f32,
    /// Maximum dimension for rendered images (default: 4000)
    #[serde(default = "PdfRenderSettings::default_max_dimension")]
    pub max_dimension: u32,
}

impl PdfRenderSettings {
    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    fn default_dpi() -> f32 {
        DEFAULT_RENDER_DPI
    }

    fn default_max_dimension() -> u32 {
        DEFAULT_RENDER_MAX_DIMENSION
    }
}

impl Default for PdfRenderSettings {
    fn default() -> Self {
        Self {
            dpi: Self::default_dpi(),
            max_dimension: Self::default_max_dimension(),
        }
    }
}

impl ConfigValidator for PdfRenderSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(ConfigError::invalid_field(
                "render.dpi",
                "a positive number",
                self.dpi,
            ));
        }
        if self.max_dimension == 0 {
            return Err(ConfigError::invalid_field(
                "render.max_dimension",
                "at least 1",
                self.max_dimension,
            ));
        }
        Ok(())
    }
}

/// Complete configuration of a document pipeline.
///
/// Every field has a default, so a partial JSON document is a valid configuration:
///
/// ```
/// use oar_chunker::core::config::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{"chunking": {"max_pages_per_chunk": 4}}"#).unwrap();
/// assert_eq!(config.chunking.max_pages_per_chunk, 4);
/// assert_eq!(config.classifier.title_max_words, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub render: PdfRenderSettings,
    #[serde(default)]
    pub parallel: ParallelPolicy,
    /// Documents larger than this are rejected before rasterization.
    #[serde(default = "PipelineConfig::default_max_document_bytes")]
    pub max_document_bytes: usize,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_render(mut self, render: PdfRenderSettings) -> Self {
        self.render = render;
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_document_bytes(mut self, limit: usize) -> Self {
        self.max_document_bytes = limit;
        self
    }

    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    fn default_max_document_bytes() -> usize {
        DEFAULT_MAX_DOCUMENT_BYTES
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            chunking: ChunkingConfig::default(),
            render: PdfRenderSettings::default(),
            parallel: ParallelPolicy::default(),
            max_document_bytes: Self::default_max_document_bytes(),
        }
    }
}

impl ConfigValidator for PipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.validate()?;
        self.chunking.validate()?;
        self.render.validate()?;
        self.parallel.validate()?;
        if self.max_document_bytes == 0 {
            return Err(ConfigError::invalid_field(
                "max_document_bytes",
                "at least 1",
                self.max_document_bytes,
            ));
        }
        Ok(())
    }
}

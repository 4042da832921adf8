//! Configuration types for the chunker CLI.

use clap::{Args, ValueEnum};
use oar_chunker::core::config::{ConfigValidator, PipelineConfig};
use oar_chunker::core::errors::ConfigError;
use std::path::PathBuf;

/// Configuration for OCR processing
#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Path to the text detection model
    #[arg(long = "det-model", env = "OAR_DET_MODEL")]
    pub det_model: PathBuf,

    /// Path to the text recognition model
    #[arg(long = "rec-model", env = "OAR_REC_MODEL")]
    pub rec_model: PathBuf,

    /// Path to the character dictionary
    #[arg(long = "dict-path", env = "OAR_DICT_PATH")]
    pub dict_path: PathBuf,

    /// Device to use (only cpu is supported)
    #[arg(long, default_value = "cpu", env = "OAR_DEVICE")]
    pub device: String,
}

#[cfg(feature = "oar-engine")]
impl From<ModelArgs> for oar_chunker::oarocr::OcrModelConfig {
    fn from(args: ModelArgs) -> Self {
        Self {
            det_model: args.det_model,
            rec_model: args.rec_model,
            dict_path: args.dict_path,
            device: args.device,
        }
    }
}

/// Pipeline settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct PipelineArgs {
    /// JSON file with pipeline settings
    #[arg(long, env = "OAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of pages a chunk may span
    #[arg(long, env = "OAR_MAX_PAGES_PER_CHUNK")]
    pub max_pages_per_chunk: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,
}

impl PipelineArgs {
    /// Loads the configuration file, if any, and applies command-line overrides.
    pub fn load(&self) -> Result<PipelineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(max_pages) = self.max_pages_per_chunk {
            config.chunking.max_pages_per_chunk = max_pages;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The response envelope as a single JSON line
    Json,
    /// Only the chunk texts
    Text,
    /// Human-readable summary
    Pretty,
}

//! OAR Chunker CLI
//!
//! Splits scanned PDF documents into section-aware, page-bounded text chunks.
//!
//! # Usage
//!
//! ## Full pipeline (requires the `oar-engine` feature)
//! ```bash
//! oar-chunker process --file prescription.pdf --det-model models/det.onnx --rec-model models/rec.onnx --dict-path models/dict.txt
//! ```
//!
//! ## Chunking of already recognized pages
//! ```bash
//! oar-chunker replay --regions pages.json --max-pages-per-chunk 4 --output json
//! ```

mod cli;
mod config;

use clap::{Parser, Subcommand};
use config::{ModelArgs, PipelineArgs};
use oar_chunker::core::config::ConfigValidator;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "oar-chunker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Section-aware chunking of scanned PDF documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rasterize, recognize and chunk a PDF file
    Process {
        /// Local PDF file to process
        #[arg(long)]
        file: PathBuf,

        #[command(flatten)]
        models: ModelArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Rendering resolution of PDF pages
        #[arg(long)]
        dpi: Option<f32>,

        /// Recognize pages concurrently on this many worker threads
        #[arg(long, env = "OAR_WORKERS")]
        workers: Option<usize>,
    },
    /// Chunk pre-recognized OCR output
    Replay {
        /// JSON file with recognized lines per page
        #[arg(long)]
        regions: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    oar_chunker::utils::init_tracing();

    let cli = Cli::parse();

    let success = match cli.command {
        Commands::Process {
            file,
            models,
            pipeline,
            dpi,
            workers,
        } => {
            let mut config = pipeline.load()?;
            if let Some(dpi) = dpi {
                config.render = config.render.with_dpi(dpi);
            }
            if let Some(workers) = workers {
                config.parallel = config
                    .parallel
                    .with_max_threads(Some(workers))
                    .with_parallel_pages(true);
            }
            config.validate()?;

            if let Err(e) = config.parallel.install_global_thread_pool() {
                warn!("Failed to configure worker threads: {}", e);
            }

            info!("Processing file: {}", file.display());
            cli::process_file(&file, models, config, pipeline.output)?
        }
        Commands::Replay { regions, pipeline } => {
            let config = pipeline.load()?;
            info!("Replaying recognized pages: {}", regions.display());
            cli::replay_file(&regions, config, pipeline.output)?
        }
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}

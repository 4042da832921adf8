//! CLI commands of the chunker.

use crate::config::{ModelArgs, OutputFormat};
use oar_chunker::core::config::PipelineConfig;
use oar_chunker::oarocr::{DocumentChunker, ProcessResponse, RecognizedDocument};
use std::path::Path;
use std::time::Instant;
use tracing::info;

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Run the full pipeline over a PDF file and print the response.
///
/// Returns whether the run succeeded.
#[cfg(feature = "oar-engine")]
pub fn process_file(
    path: &Path,
    models: ModelArgs,
    config: PipelineConfig,
    format: OutputFormat,
) -> CliResult<bool> {
    use oar_chunker::core::traits::{LazyOcrEngine, SharedOcrEngine};
    use oar_chunker::oarocr::{DocumentPipeline, OarOcrEngine, OcrModelConfig};
    use oar_chunker::pdf::PdfRasterizer;
    use std::sync::Arc;

    let start = Instant::now();

    info!("Initializing PDF processor...");
    let rasterizer = match PdfRasterizer::new(config.render.clone()) {
        Ok(rasterizer) => rasterizer,
        Err(err) => return output_response(&ProcessResponse::error(err.to_string()), format),
    };

    // Models are loaded on the first page, after the document has been validated.
    let models = OcrModelConfig::from(models);
    let engine: SharedOcrEngine =
        Arc::new(LazyOcrEngine::new(move || OarOcrEngine::new(&models)));

    let pipeline = DocumentPipeline::new(rasterizer, engine, config)?;
    let response = pipeline.process_file(path);
    info!("Processed in {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);

    output_response(&response, format)
}

/// Without an OCR engine the command can only report that it is unavailable.
#[cfg(not(feature = "oar-engine"))]
pub fn process_file(
    path: &Path,
    models: ModelArgs,
    _config: PipelineConfig,
    format: OutputFormat,
) -> CliResult<bool> {
    use oar_chunker::core::errors::OcrEngineError;

    tracing::error!(
        path = %path.display(),
        det_model = %models.det_model.display(),
        "OCR engine requested but not compiled in"
    );
    let err = OcrEngineError::Unavailable(
        "this binary was built without the `oar-engine` feature".to_string(),
    );
    output_response(&ProcessResponse::error(err.to_string()), format)
}

/// Run classification, section organization and chunking over recognized pages.
///
/// Returns whether the run succeeded.
pub fn replay_file(path: &Path, config: PipelineConfig, format: OutputFormat) -> CliResult<bool> {
    let start = Instant::now();

    info!("Loading recognized pages from {}...", path.display());
    let json = std::fs::read_to_string(path)?;
    let response = match serde_json::from_str::<RecognizedDocument>(&json) {
        Ok(document) => {
            info!("Loaded {} page(s)", document.pages.len());
            DocumentChunker::new(&config)?.replay(document)
        }
        Err(err) => ProcessResponse::error(format!("Invalid recognized pages: {}", err)),
    };
    info!("Chunked in {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);

    output_response(&response, format)
}

/// Output the response in the specified format
fn output_response(response: &ProcessResponse, format: OutputFormat) -> CliResult<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(response)?);
        }
        OutputFormat::Text => match &response.data {
            Some(result) => {
                for (idx, chunk) in result.chunks.iter().enumerate() {
                    if idx > 0 {
                        println!("\n--- Chunk {} ---\n", idx + 1);
                    }
                    println!("{}", chunk);
                }
            }
            None => eprintln!("Error: {}", response.message),
        },
        OutputFormat::Pretty => {
            println!("\n=== Chunking Results ===");
            println!("Status: {}", if response.is_success() { "success" } else { "error" });
            println!("Message: {}", response.message);

            if let Some(result) = &response.data {
                println!();
                print!("{}", result);
            }
        }
    }

    Ok(response.is_success())
}

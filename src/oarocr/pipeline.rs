//! Document pipeline orchestration.
//!
//! [`DocumentPipeline`] drives the external collaborators (rasterizer and OCR
//! engine) and hands the page-tagged recognition output to a
//! [`DocumentChunker`], which classifies regions, organizes them into sections
//! and packs the sections into page-bounded chunks.
//!
//! Failure policy:
//! - An invalid or unrenderable document aborts the run and yields an error response.
//! - A page whose recognition fails contributes zero regions. The failure is
//!   logged and the remaining pages are still processed.
//! - An engine that cannot be constructed at all aborts the run.
//! - A panic in the rasterizer or in the chunking stage aborts the run with an
//!   error response instead of unwinding into the caller.

use crate::core::config::{ConfigValidator, PipelineConfig};
use crate::core::errors::{
    ConfigError, DocumentError, OcrEngineError, PipelineError, ProcessingStage,
};
use crate::core::traits::{OcrEngine, Rasterizer, SharedOcrEngine};
use crate::oarocr::{
    PrescriptionResult, ProcessResponse, RecognizedDocument, RecognizedLine, TextRegion,
};
use crate::pdf::validate_pdf_path;
use crate::processors::{ChunkPacker, RegionClassifier, organize_sections};
use image::RgbImage;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Classification, section organization and chunk packing of recognized pages.
///
/// This stage needs no collaborator, so it also serves pre-recognized OCR output.
#[derive(Debug, Clone, Default)]
pub struct DocumentChunker {
    classifier: RegionClassifier,
    packer: ChunkPacker,
}

impl DocumentChunker {
    /// Creates a chunker from a validated configuration.
    pub fn new(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            classifier: RegionClassifier::new(config.classifier.clone()),
            packer: ChunkPacker::new(config.chunking.clone()),
        })
    }

    /// Classifies every recognized line and tags it with its 1-based page number.
    ///
    /// The result is one flat sequence: page 1's regions in emission order,
    /// then page 2's, and so on.
    pub fn tag_regions(&self, pages: Vec<Vec<RecognizedLine>>) -> Vec<TextRegion> {
        pages
            .into_iter()
            .enumerate()
            .flat_map(|(index, lines)| {
                let page = index + 1;
                lines
                    .into_iter()
                    .map(move |line| TextRegion::from_recognized(line, page, &self.classifier))
            })
            .collect()
    }

    /// Builds the final payload from per-page recognition output.
    ///
    /// `pages.len()` is the total page count, including pages that yielded no lines.
    pub fn assemble(&self, pages: Vec<Vec<RecognizedLine>>) -> PrescriptionResult {
        let total_pages = pages.len();
        let regions = self.tag_regions(pages);
        let titles = regions.iter().filter(|region| region.is_title()).count();

        let sections = organize_sections(&regions);
        debug!(
            stage = %ProcessingStage::Organization,
            regions = regions.len(),
            titles,
            sections = sections.len(),
            "Organized regions into sections"
        );

        let chunks = self.packer.chunk(&sections, total_pages);
        debug!(
            stage = %ProcessingStage::Chunking,
            chunks = chunks.len(),
            max_pages_per_chunk = self.packer.max_pages_per_chunk(),
            "Packed sections into chunks"
        );

        PrescriptionResult::new(total_pages, chunks)
    }

    /// Runs classification, organization and chunking over pre-recognized OCR output.
    pub fn replay(&self, document: RecognizedDocument) -> ProcessResponse {
        let document_id = Uuid::new_v4();
        let result = if document.pages.is_empty() {
            Err(DocumentError::EmptyDocument.into())
        } else {
            guard_stage(ProcessingStage::Organization, || Ok(self.assemble(document.pages)))
        };
        respond(document_id, result)
    }
}

/// End-to-end pipeline from a PDF blob to page-bounded text chunks.
pub struct DocumentPipeline {
    rasterizer: Box<dyn Rasterizer>,
    engine: SharedOcrEngine,
    chunker: DocumentChunker,
    config: PipelineConfig,
}

impl DocumentPipeline {
    /// Creates a pipeline around the given collaborators.
    pub fn new(
        rasterizer: impl Rasterizer + 'static,
        engine: SharedOcrEngine,
        config: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        let chunker = DocumentChunker::new(&config)?;
        Ok(Self {
            rasterizer: Box::new(rasterizer),
            engine,
            chunker,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn chunker(&self) -> &DocumentChunker {
        &self.chunker
    }

    /// Processes a PDF blob. Every failure is reported inside the response.
    pub fn process(&self, document: &[u8]) -> ProcessResponse {
        let document_id = Uuid::new_v4();
        respond(document_id, self.run_document(document, document_id))
    }

    /// Validates, reads and processes a PDF file.
    pub fn process_file(&self, path: &Path) -> ProcessResponse {
        let document_id = Uuid::new_v4();
        info!(%document_id, path = %path.display(), "Processing file");
        let result = read_document(path).and_then(|bytes| self.run_document(&bytes, document_id));
        respond(document_id, result)
    }

    /// Processes a PDF blob, returning failures as errors.
    pub fn try_process(&self, document: &[u8]) -> Result<PrescriptionResult, PipelineError> {
        self.run_document(document, Uuid::new_v4())
    }

    /// Processes already rasterized pages, first page first.
    pub fn process_pages(&self, pages: &[RgbImage]) -> Result<PrescriptionResult, PipelineError> {
        self.run_pages(pages, Uuid::new_v4())
    }

    fn run_document(
        &self,
        document: &[u8],
        document_id: Uuid,
    ) -> Result<PrescriptionResult, PipelineError> {
        if document.len() > self.config.max_document_bytes {
            return Err(DocumentError::TooLarge {
                actual: document.len(),
                limit: self.config.max_document_bytes,
            }
            .into());
        }

        let start = Instant::now();
        info!(%document_id, bytes = document.len(), "Rendering PDF pages to images...");
        let pages = guard_stage(ProcessingStage::Rasterization, || {
            Ok(self.rasterizer.render(document)?)
        })?;
        if pages.is_empty() {
            return Err(DocumentError::EmptyDocument.into());
        }
        info!(
            %document_id,
            pages = pages.len(),
            render_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rendered pages"
        );

        self.run_pages(&pages, document_id)
    }

    fn run_pages(
        &self,
        pages: &[RgbImage],
        document_id: Uuid,
    ) -> Result<PrescriptionResult, PipelineError> {
        if pages.is_empty() {
            return Err(DocumentError::EmptyDocument.into());
        }

        let start = Instant::now();
        let recognized = self.recognize_pages(pages, document_id)?;
        let lines: usize = recognized.iter().map(Vec::len).sum();
        info!(
            %document_id,
            pages = pages.len(),
            lines,
            ocr_ms = start.elapsed().as_secs_f64() * 1000.0,
            "OCR completed"
        );

        let result = guard_stage(ProcessingStage::Organization, || {
            Ok(self.chunker.assemble(recognized))
        })?;
        info!(
            %document_id,
            total_pages = result.total_pages,
            chunks = result.chunks.len(),
            "Document chunked"
        );
        Ok(result)
    }

    /// Recognizes every page, absorbing page-local OCR failures.
    fn recognize_pages(
        &self,
        pages: &[RgbImage],
        document_id: Uuid,
    ) -> Result<Vec<Vec<RecognizedLine>>, PipelineError> {
        let engine: &dyn OcrEngine = self.engine.as_ref();

        // Outcomes are collected in page order in both branches.
        let outcomes: Vec<Result<Vec<RecognizedLine>, OcrEngineError>> =
            if self.config.parallel.should_parallelize(pages.len()) {
                debug!(%document_id, pages = pages.len(), "Recognizing pages in parallel");
                pages.par_iter().map(|page| recognize_page(engine, page)).collect()
            } else {
                pages.iter().map(|page| recognize_page(engine, page)).collect()
            };

        let mut recognized = Vec::with_capacity(outcomes.len());
        for (index, outcome) in outcomes.into_iter().enumerate() {
            let page = index + 1;
            match outcome {
                Ok(lines) => {
                    debug!(%document_id, page, lines = lines.len(), "Page recognized");
                    recognized.push(lines);
                }
                Err(err) if err.is_page_local() => {
                    warn!(
                        %document_id,
                        page,
                        engine = engine.name(),
                        error = %err,
                        "OCR failed for page, continuing without its regions"
                    );
                    recognized.push(Vec::new());
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(recognized)
    }
}

impl std::fmt::Debug for DocumentPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentPipeline")
            .field("engine", &self.engine.name())
            .field("chunker", &self.chunker)
            .field("config", &self.config)
            .finish()
    }
}

/// Recognizes one page, converting a panic inside the engine into a page failure.
fn recognize_page(
    engine: &dyn OcrEngine,
    page: &RgbImage,
) -> Result<Vec<RecognizedLine>, OcrEngineError> {
    panic::catch_unwind(AssertUnwindSafe(|| engine.recognize(page))).unwrap_or_else(|payload| {
        Err(OcrEngineError::Recognition(format!(
            "engine panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

/// Runs one stage, converting a panic into [`PipelineError::Internal`].
fn guard_stage<T>(
    stage: ProcessingStage,
    run: impl FnOnce() -> Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        Err(PipelineError::Internal {
            stage,
            message: panic_message(payload.as_ref()).to_string(),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

fn read_document(path: &Path) -> Result<Vec<u8>, PipelineError> {
    validate_pdf_path(path)?;
    Ok(std::fs::read(path)?)
}

fn respond(
    document_id: Uuid,
    result: Result<PrescriptionResult, PipelineError>,
) -> ProcessResponse {
    match result {
        Ok(result) => ProcessResponse::success(result),
        Err(err) => {
            error!(
                %document_id,
                stage = %err.stage(),
                error = %err,
                "Error processing PDF"
            );
            ProcessResponse::error(err.to_string())
        }
    }
}

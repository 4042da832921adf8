//! End-to-end tests of the document pipeline with in-memory collaborators.
//!
//! The fake rasterizer renders page `n` as an image `n` pixels wide, which lets
//! the fake OCR engine tell pages apart without any real document.

use image::RgbImage;
use oar_chunker::core::config::{ChunkingConfig, ParallelPolicy, PipelineConfig};
use oar_chunker::core::errors::{DocumentError, OcrEngineError};
use oar_chunker::core::traits::{LazyOcrEngine, OcrEngine, Rasterizer, SharedOcrEngine};
use oar_chunker::oarocr::{
    DocumentChunker, DocumentPipeline, RecognizedDocument, RecognizedLine, ResponseStatus,
};
use oar_chunker::processors::BoundingBox;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Renders one image per page, or fails with a load error.
struct FakeRasterizer {
    pages: Result<usize, String>,
    calls: Arc<AtomicUsize>,
}

impl FakeRasterizer {
    fn with_pages(count: usize) -> Self {
        Self {
            pages: Ok(count),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            pages: Err(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Rasterizer for FakeRasterizer {
    fn render(&self, _document: &[u8]) -> Result<Vec<RgbImage>, DocumentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.pages {
            Ok(count) => Ok((1..=*count as u32).map(|n| RgbImage::new(n, 1)).collect()),
            Err(reason) => Err(DocumentError::Load(reason.clone())),
        }
    }
}

enum PageOutcome {
    Lines(Vec<RecognizedLine>),
    Fail(&'static str),
    Panic,
}

/// OCR engine answering from a table keyed by page number.
#[derive(Default)]
struct FakeOcr {
    pages: HashMap<u32, PageOutcome>,
    delay_per_page: Option<Duration>,
}

impl FakeOcr {
    /// Every page holds one title followed by one body line.
    fn titled_pages(count: u32) -> Self {
        let pages = (1..=count)
            .map(|n| {
                (
                    n,
                    PageOutcome::Lines(vec![
                        line(&format!("Heading {n}"), 0.99),
                        line(&format!("details for page {n}"), 0.8),
                    ]),
                )
            })
            .collect();
        Self {
            pages,
            delay_per_page: None,
        }
    }

    fn with_outcome(mut self, page: u32, outcome: PageOutcome) -> Self {
        self.pages.insert(page, outcome);
        self
    }
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, page: &RgbImage) -> Result<Vec<RecognizedLine>, OcrEngineError> {
        let number = page.width();
        if let Some(delay) = self.delay_per_page {
            // Earlier pages finish last when run concurrently.
            std::thread::sleep(delay * (20 - number.min(20)));
        }
        match self.pages.get(&number) {
            Some(PageOutcome::Lines(lines)) => Ok(lines.clone()),
            Some(PageOutcome::Fail(reason)) => Err(OcrEngineError::Recognition(reason.to_string())),
            Some(PageOutcome::Panic) => panic!("model crashed on page {number}"),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn line(text: &str, confidence: f32) -> RecognizedLine {
    RecognizedLine::new(text, BoundingBox::from_coords(0.0, 0.0, 100.0, 20.0), confidence)
}

fn pipeline(
    rasterizer: FakeRasterizer,
    engine: FakeOcr,
    config: PipelineConfig,
) -> DocumentPipeline {
    DocumentPipeline::new(rasterizer, Arc::new(engine), config).unwrap()
}

fn headings(chunk: &str) -> usize {
    chunk.lines().filter(|line| line.starts_with("Heading")).count()
}

#[test]
fn test_short_document_yields_single_chunk() {
    let pipeline = pipeline(
        FakeRasterizer::with_pages(3),
        FakeOcr::titled_pages(3),
        PipelineConfig::default(),
    );

    let response = pipeline.process(b"%PDF-1.7");

    assert_eq!(response.status, ResponseStatus::Success);
    assert_eq!(response.message, "Successfully processed 3 page(s)");
    let data = response.data.unwrap();
    assert_eq!(data.total_pages, 3);
    assert_eq!(
        data.chunks,
        vec![
            "Heading 1\ndetails for page 1\nHeading 2\ndetails for page 2\nHeading 3\ndetails for page 3"
                .to_string()
        ]
    );
    assert_eq!(data.raw_text, data.chunks[0]);
}

#[test]
fn test_ten_single_page_sections_split_six_and_four() {
    let pipeline = pipeline(
        FakeRasterizer::with_pages(10),
        FakeOcr::titled_pages(10),
        PipelineConfig::default(),
    );

    let data = pipeline.process(b"%PDF-1.7").data.unwrap();

    assert_eq!(data.total_pages, 10);
    assert_eq!(data.chunks.len(), 2);
    assert_eq!(headings(&data.chunks[0]), 6);
    assert_eq!(headings(&data.chunks[1]), 4);
    assert!(data.chunks[0].ends_with("details for page 6"));
    assert!(data.chunks[1].starts_with("Heading 7\n"));
    assert_eq!(data.raw_text, data.chunks.join("\n"));
}

#[test]
fn test_failed_page_is_skipped() {
    let engine = FakeOcr::titled_pages(3).with_outcome(2, PageOutcome::Fail("image too blurry"));
    let pipeline = pipeline(FakeRasterizer::with_pages(3), engine, PipelineConfig::default());

    let response = pipeline.process(b"%PDF-1.7");

    assert!(response.is_success());
    let data = response.data.unwrap();
    assert_eq!(data.total_pages, 3);
    assert!(data.raw_text.contains("details for page 1"));
    assert!(data.raw_text.contains("details for page 3"));
    assert!(!data.raw_text.contains("page 2"));
}

#[test]
fn test_panicking_page_is_skipped() {
    let engine = FakeOcr::titled_pages(3).with_outcome(2, PageOutcome::Panic);
    let pipeline = pipeline(FakeRasterizer::with_pages(3), engine, PipelineConfig::default());

    let data = pipeline.process(b"%PDF-1.7").data.unwrap();

    assert_eq!(data.total_pages, 3);
    assert_eq!(headings(&data.raw_text), 2);
}

#[test]
fn test_rasterization_failure_yields_error_response() {
    let pipeline = pipeline(
        FakeRasterizer::failing("trailer dictionary missing"),
        FakeOcr::titled_pages(3),
        PipelineConfig::default(),
    );

    let response = pipeline.process(b"%PDF-1.7");

    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.data.is_none());
    assert!(response.message.contains("trailer dictionary missing"), "{}", response.message);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["data"].is_null());
}

/// Rasterizer that crashes inside the PDF library.
struct PanickingRasterizer;

impl Rasterizer for PanickingRasterizer {
    fn render(&self, _document: &[u8]) -> Result<Vec<RgbImage>, DocumentError> {
        panic!("pdfium: malformed xref");
    }
}

#[test]
fn test_rasterizer_panic_yields_error_response() {
    let lazy = Arc::new(LazyOcrEngine::new(|| Ok(FakeOcr::titled_pages(1))));
    let pipeline =
        DocumentPipeline::new(PanickingRasterizer, lazy.clone(), PipelineConfig::default())
            .unwrap();

    let response = pipeline.process(b"%PDF-1.7");

    assert_eq!(response.status, ResponseStatus::Error);
    assert!(response.data.is_none());
    assert!(response.message.contains("rasterization"), "{}", response.message);
    assert!(response.message.contains("malformed xref"), "{}", response.message);
    assert!(!lazy.is_initialized());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    std::fs::write(&path, b"%PDF-1.4\n").unwrap();
    let response = pipeline.process_file(&path);
    assert!(!response.is_success());
    assert!(response.message.contains("malformed xref"), "{}", response.message);
}

#[test]
fn test_document_without_pages_is_rejected() {
    let pipeline = pipeline(
        FakeRasterizer::with_pages(0),
        FakeOcr::default(),
        PipelineConfig::default(),
    );

    let response = pipeline.process(b"%PDF-1.7");

    assert!(!response.is_success());
    assert_eq!(response.message, "Document has no pages");
}

#[test]
fn test_oversized_document_is_rejected_before_rendering() {
    let rasterizer = FakeRasterizer::with_pages(1);
    let calls = rasterizer.calls.clone();
    let pipeline = pipeline(
        rasterizer,
        FakeOcr::titled_pages(1),
        PipelineConfig::default().with_max_document_bytes(4),
    );

    let response = pipeline.process(b"%PDF-1.7 and more");

    assert!(!response.is_success());
    assert!(response.message.contains("exceeding the limit of 4 bytes"), "{}", response.message);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unavailable_engine_aborts_run() {
    let engine: LazyOcrEngine<FakeOcr> =
        LazyOcrEngine::new(|| Err(OcrEngineError::ModelNotFound("det.onnx".to_string())));
    let pipeline = DocumentPipeline::new(
        FakeRasterizer::with_pages(2),
        Arc::new(engine),
        PipelineConfig::default(),
    )
    .unwrap();

    let response = pipeline.process(b"%PDF-1.7");

    assert!(!response.is_success());
    assert!(response.message.contains("OCR engine unavailable"), "{}", response.message);
    assert!(response.message.contains("det.onnx"), "{}", response.message);
}

#[test]
fn test_lazy_engine_is_not_built_for_unrenderable_document() {
    let lazy = Arc::new(LazyOcrEngine::new(|| Ok(FakeOcr::titled_pages(1))));
    let engine: SharedOcrEngine = lazy.clone();
    let pipeline = DocumentPipeline::new(
        FakeRasterizer::failing("not a PDF"),
        engine,
        PipelineConfig::default(),
    )
    .unwrap();

    assert!(!pipeline.process(b"plain text").is_success());
    assert!(!lazy.is_initialized());

    let pipeline = DocumentPipeline::new(
        FakeRasterizer::with_pages(1),
        lazy.clone(),
        PipelineConfig::default(),
    )
    .unwrap();
    assert!(pipeline.process(b"%PDF-1.7").is_success());
    assert!(lazy.is_initialized());
}

#[test]
fn test_parallel_recognition_keeps_page_order() {
    let chunking = ChunkingConfig::default().with_max_pages_per_chunk(10);
    let mut engine = FakeOcr::titled_pages(8);
    engine.delay_per_page = Some(Duration::from_millis(2));

    let sequential = pipeline(
        FakeRasterizer::with_pages(8),
        FakeOcr::titled_pages(8),
        PipelineConfig::default().with_chunking(chunking.clone()),
    );
    let parallel = pipeline(
        FakeRasterizer::with_pages(8),
        engine,
        PipelineConfig::default()
            .with_chunking(chunking)
            .with_parallel(ParallelPolicy::new().with_parallel_pages(true)),
    );

    let expected = sequential.process(b"%PDF-1.7").data.unwrap();
    let actual = parallel.process(b"%PDF-1.7").data.unwrap();

    assert_eq!(actual, expected);
    assert!(actual.raw_text.starts_with("Heading 1\n"));
}

#[test]
fn test_process_file_validates_path() {
    let pipeline = pipeline(
        FakeRasterizer::with_pages(1),
        FakeOcr::titled_pages(1),
        PipelineConfig::default(),
    );

    let response = pipeline.process_file(Path::new("/tmp/prescription.docx"));
    assert_eq!(response.message, "Input file must be a '.pdf' file.");
    assert!(response.data.is_none());

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.pdf");
    let response = pipeline.process_file(&missing);
    assert!(!response.is_success());
    assert!(response.message.ends_with("missing.pdf does not exist."), "{}", response.message);

    let present = dir.path().join("scan.pdf");
    std::fs::write(&present, b"%PDF-1.4\n").unwrap();
    let response = pipeline.process_file(&present);
    assert!(response.is_success(), "{}", response.message);
    assert_eq!(response.data.unwrap().chunks, vec!["Heading 1\ndetails for page 1".to_string()]);
}

#[test]
fn test_replay_of_recognized_pages() {
    let document: RecognizedDocument = serde_json::from_str(
        r#"{"pages": [
            [{"text": "patient: J. Doe", "confidence": 0.90},
             {"text": "Rx", "confidence": 0.99}],
            [{"text": "Ibuprofen 200 mg", "confidence": 0.88}]
        ]}"#,
    )
    .unwrap();

    let response = DocumentChunker::default().replay(document);

    let data = response.data.unwrap();
    assert_eq!(data.total_pages, 2);
    assert_eq!(
        data.chunks,
        vec!["Unnamed Section\npatient: J. Doe\nRx\nIbuprofen 200 mg".to_string()]
    );
}

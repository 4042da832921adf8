//! Interfaces of the external collaborators driven by the pipeline.
//!
//! The pipeline never talks to pdfium or an OCR model directly. It receives a
//! [`Rasterizer`] and an [`OcrEngine`] at construction time, which keeps the
//! classification and chunking logic testable with in-memory fakes.

use crate::core::errors::{DocumentError, OcrEngineError};
use crate::oarocr::RecognizedLine;
use image::RgbImage;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Converts a binary document into an ordered sequence of page images.
pub trait Rasterizer {
    /// Renders every page of `document`, first page first.
    ///
    /// Fails with a [`DocumentError`] when the blob is not a well-formed document
    /// or has no pages.
    fn render(&self, document: &[u8]) -> Result<Vec<RgbImage>, DocumentError>;
}

/// Recognizes text lines on a single page image.
///
/// Implementations may return an empty sequence. Emission order is trusted as
/// reading order by the pipeline.
pub trait OcrEngine: Send + Sync {
    /// Recognizes the text lines of one page.
    fn recognize(&self, page: &RgbImage) -> Result<Vec<RecognizedLine>, OcrEngineError>;

    /// Short name used in log records.
    fn name(&self) -> &str {
        "ocr"
    }
}

impl<E: OcrEngine + ?Sized> OcrEngine for Arc<E> {
    fn recognize(&self, page: &RgbImage) -> Result<Vec<RecognizedLine>, OcrEngineError> {
        (**self).recognize(page)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Shared handle to an OCR capability.
pub type SharedOcrEngine = Arc<dyn OcrEngine>;

type EngineFactory<E> = Box<dyn Fn() -> Result<E, OcrEngineError> + Send + Sync>;

/// An OCR engine that is constructed on first use.
///
/// Model loading is expensive, so the engine is built once, the first time a
/// page is recognized, and reused for every later page and document. If
/// construction fails, every call reports [`OcrEngineError::Unavailable`].
pub struct LazyOcrEngine<E> {
    factory: EngineFactory<E>,
    engine: OnceLock<Result<E, String>>,
}

impl<E: OcrEngine> LazyOcrEngine<E> {
    /// Wraps a factory that builds the engine.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<E, OcrEngineError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            engine: OnceLock::new(),
        }
    }

    /// Returns true once the factory has run, whether or not it succeeded.
    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    fn get(&self) -> Result<&E, OcrEngineError> {
        self.engine
            .get_or_init(|| {
                tracing::info!("Initializing OCR engine...");
                (self.factory)().map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|message| OcrEngineError::Unavailable(message.clone()))
    }
}

impl<E: OcrEngine> OcrEngine for LazyOcrEngine<E> {
    fn recognize(&self, page: &RgbImage) -> Result<Vec<RecognizedLine>, OcrEngineError> {
        self.get()?.recognize(page)
    }

    fn name(&self) -> &str {
        match self.engine.get() {
            Some(Ok(engine)) => engine.name(),
            _ => "lazy-ocr",
        }
    }
}

impl<E> fmt::Debug for LazyOcrEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyOcrEngine")
            .field("initialized", &self.engine.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::BoundingBox;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoEngine;

    impl OcrEngine for EchoEngine {
        fn recognize(&self, page: &RgbImage) -> Result<Vec<RecognizedLine>, OcrEngineError> {
            Ok(vec![RecognizedLine::new(
                format!("width {}", page.width()),
                BoundingBox::from_coords(0.0, 0.0, 1.0, 1.0),
                0.5,
            )])
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_lazy_engine_builds_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let engine = LazyOcrEngine::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(EchoEngine)
        });

        assert!(!engine.is_initialized());
        assert_eq!(engine.name(), "lazy-ocr");

        let page = RgbImage::new(3, 1);
        let lines = engine.recognize(&page).unwrap();
        assert_eq!(lines[0].text, "width 3");
        engine.recognize(&page).unwrap();

        assert!(engine.is_initialized());
        assert_eq!(engine.name(), "echo");
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lazy_engine_failure_is_sticky() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = builds.clone();
        let engine: LazyOcrEngine<EchoEngine> = LazyOcrEngine::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(OcrEngineError::ModelNotFound("det.onnx".to_string()))
        });

        let page = RgbImage::new(1, 1);
        for _ in 0..2 {
            match engine.recognize(&page) {
                Err(OcrEngineError::Unavailable(message)) => {
                    assert!(message.contains("det.onnx"));
                }
                other => panic!("Expected Unavailable, got {other:?}"),
            }
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_arc_engine_delegates() {
        let shared: SharedOcrEngine = Arc::new(EchoEngine);
        assert_eq!(shared.name(), "echo");
        assert_eq!(shared.recognize(&RgbImage::new(7, 1)).unwrap()[0].text, "width 7");
    }
}

//! # OAR Chunker
//!
//! Section-aware chunking of scanned PDF documents.
//!
//! A document is rasterized page by page, every page goes through an OCR engine,
//! and each recognized line is classified as a section title or body text.
//! Titles open sections, sections are packed into chunks that never span more
//! than a configured number of pages, and the chunk texts are returned in a
//! `{status, message, data}` envelope.
//!
//! ## Components
//!
//! - [`core`]: configuration, errors and the collaborator traits
//! - [`processors`]: region classification, section organization and chunk packing
//! - [`oarocr`]: the pipeline and its result types
//! - [`pdf`]: PDF checks and the PDFium rasterizer
//! - [`utils`]: logging setup
//!
//! ## Example
//!
//! ```rust
//! use oar_chunker::core::config::PipelineConfig;
//! use oar_chunker::oarocr::{DocumentChunker, RecognizedDocument, RecognizedLine};
//! use oar_chunker::processors::BoundingBox;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let chunker = DocumentChunker::new(&PipelineConfig::default())?;
//! let document = RecognizedDocument {
//!     pages: vec![vec![
//!         RecognizedLine::new("Prescription", BoundingBox::default(), 0.99),
//!         RecognizedLine::new("Amoxicillin 500 mg three times daily", BoundingBox::default(), 0.91),
//!     ]],
//! };
//!
//! let response = chunker.replay(document);
//! assert!(response.is_success());
//! assert_eq!(
//!     response.data.unwrap().chunks,
//!     vec!["Prescription\nAmoxicillin 500 mg three times daily".to_string()]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! With the `oar-engine` feature, `oarocr::OarOcrEngine` recognizes pages with
//! the oar-ocr detection and recognition models.

pub mod core;
pub mod oarocr;
pub mod pdf;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::config::{ConfigValidator, PipelineConfig};
    pub use crate::core::errors::{DocumentError, OcrEngineError, PipelineError};
    pub use crate::core::traits::{LazyOcrEngine, OcrEngine, Rasterizer, SharedOcrEngine};
    #[cfg(feature = "oar-engine")]
    pub use crate::oarocr::{OarOcrEngine, OcrModelConfig};
    pub use crate::oarocr::{
        DocumentChunker, DocumentPipeline, PrescriptionResult, ProcessResponse, RecognizedLine,
    };
    pub use crate::pdf::PdfRasterizer;
    pub use crate::processors::{BoundingBox, RegionKind, Section};
}

//! The document pipeline module.
//!
//! This module ties the rasterizer, the OCR engine and the region processors
//! together and defines the result types handed back to callers.
//!
//! # Main APIs
//!
//! - [`DocumentPipeline`] - From a PDF blob to page-bounded chunks
//! - [`DocumentChunker`] - From recognized pages to page-bounded chunks
//! - [`ProcessResponse`] - The `{status, message, data}` envelope of a run

#[cfg(feature = "oar-engine")]
pub mod engine;
pub mod pipeline;
pub mod result;

#[cfg(feature = "oar-engine")]
pub use engine::{OarOcrEngine, OcrModelConfig};
pub use pipeline::{DocumentChunker, DocumentPipeline};
pub use result::{
    PrescriptionResult, ProcessResponse, RecognizedDocument, RecognizedLine, ResponseStatus,
    TextRegion,
};

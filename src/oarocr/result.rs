//! Result types for the document pipeline.

use crate::processors::{BoundingBox, RegionClassifier, RegionKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A text line as reported by an OCR engine, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    /// The recognized text.
    pub text: String,
    /// Polygon enclosing the line on the page image.
    #[serde(default)]
    pub bounding_box: BoundingBox,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox, confidence: f32) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            confidence,
        }
    }
}

/// A classified text region tagged with its 1-based source page.
///
/// Regions are built once, with the page already known, and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Title or body text.
    #[serde(rename = "type")]
    pub kind: RegionKind,
    /// The recognized text.
    pub text: String,
    /// Polygon enclosing the region on its page.
    pub bounding_box: BoundingBox,
    /// Recognition confidence the classification was based on.
    pub confidence: f32,
    /// 1-based page number.
    pub page: usize,
}

impl TextRegion {
    pub fn new(
        kind: RegionKind,
        text: impl Into<String>,
        bounding_box: BoundingBox,
        confidence: f32,
        page: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            bounding_box,
            confidence,
            page,
        }
    }

    /// Classifies a recognized line and tags it with `page`.
    pub fn from_recognized(
        line: RecognizedLine,
        page: usize,
        classifier: &RegionClassifier,
    ) -> Self {
        let kind = classifier.classify(&line.text, line.confidence);
        Self::new(kind, line.text, line.bounding_box, line.confidence, page)
    }

    /// Returns true if this region is a section title.
    pub fn is_title(&self) -> bool {
        self.kind == RegionKind::Title
    }
}

/// Pre-recognized OCR output of a whole document, one entry per page.
///
/// This is the input format of the `replay` command:
///
/// ```json
/// {"pages": [[{"text": "Patient", "confidence": 0.99}], []]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedDocument {
    pub pages: Vec<Vec<RecognizedLine>>,
}

/// Final payload of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionResult {
    /// Number of pages the document was rasterized into, including pages whose OCR failed.
    pub total_pages: usize,
    /// Page-bounded chunk texts, in document order.
    pub chunks: Vec<String>,
    /// All chunks joined by newlines.
    pub raw_text: String,
}

impl PrescriptionResult {
    pub fn new(total_pages: usize, chunks: Vec<String>) -> Self {
        let raw_text = chunks.join("\n");
        Self {
            total_pages,
            chunks,
            raw_text,
        }
    }
}

impl fmt::Display for PrescriptionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total pages: {}", self.total_pages)?;
        writeln!(f, "Chunks: {}", self.chunks.len())?;

        for (index, chunk) in self.chunks.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "========== Chunk {} ==========", index + 1)?;
            writeln!(f, "{chunk}")?;
        }

        Ok(())
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Structured result returned to callers. Failures never escape as `Err`.
///
/// On error `data` is serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub data: Option<PrescriptionResult>,
}

impl ProcessResponse {
    pub fn success(result: PrescriptionResult) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: format!("Successfully processed {} page(s)", result.total_pages),
            data: Some(result),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

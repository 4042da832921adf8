//! Title versus body text classification of recognized regions.
//!
//! Headers in scanned documents tend to be short and printed large, so they are
//! recognized with high confidence. The classifier uses exactly that proxy and
//! needs no layout analysis.

use crate::core::config::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a recognized text region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// A section header.
    Title,
    /// Body text.
    Text,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Title => write!(f, "title"),
            RegionKind::Text => write!(f, "text"),
        }
    }
}

/// Labels regions as titles or body text.
#[derive(Debug, Clone, Default)]
pub struct RegionClassifier {
    config: ClassifierConfig,
}

impl RegionClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies a region from its text and recognition confidence.
    ///
    /// A region is a title iff `confidence > title_min_confidence` and its
    /// whitespace-delimited word count is `< title_max_words`. The function is
    /// total and deterministic.
    pub fn classify(&self, text: &str, confidence: f32) -> RegionKind {
        if confidence > self.config.title_min_confidence
            && text.split_whitespace().count() < self.config.title_max_words
        {
            RegionKind::Title
        } else {
            RegionKind::Text
        }
    }
}

/// Classifies a region with the default thresholds (0.95 confidence, 10 words).
pub fn classify(text: &str, confidence: f32) -> RegionKind {
    RegionClassifier::default().classify(text, confidence)
}

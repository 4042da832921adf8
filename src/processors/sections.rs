//! Grouping of classified regions into titled sections.
//!
//! Organization is a single forward fold over the page-ordered region stream.
//! The accumulator ([`SectionFold`]) holds the finished sections plus the one
//! section still open. A title closes the open section and starts a new one,
//! while body text extends the open section.

use crate::core::constants::UNNAMED_SECTION_TITLE;
use crate::oarocr::TextRegion;
use crate::processors::RegionKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A title with the body text blocks that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section header text, or `"Unnamed Section"` for leading body text.
    pub title: String,
    /// Body text blocks in OCR emission order.
    pub text_blocks: Vec<String>,
    /// Distinct source pages contributing to this section. Never empty.
    pub pages: BTreeSet<usize>,
}

impl Section {
    /// Opens a section from a title region.
    pub fn titled(title: impl Into<String>, page: usize) -> Self {
        Self {
            title: title.into(),
            text_blocks: Vec::new(),
            pages: BTreeSet::from([page]),
        }
    }

    /// Opens the implicit section for body text that precedes any title.
    pub fn unnamed(first_block: impl Into<String>, page: usize) -> Self {
        Self {
            title: UNNAMED_SECTION_TITLE.to_string(),
            text_blocks: vec![first_block.into()],
            pages: BTreeSet::from([page]),
        }
    }

    /// Appends a body text block found on `page`.
    pub fn push_block(&mut self, text: impl Into<String>, page: usize) {
        self.text_blocks.push(text.into());
        self.pages.insert(page);
    }

    /// Renders the title line followed by one line per text block.
    ///
    /// A section without text blocks renders as its title plus a trailing newline.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.title, self.text_blocks.join("\n"))
    }
}

/// Accumulator of the section fold.
#[derive(Debug, Default)]
pub struct SectionFold {
    finished: Vec<Section>,
    current: Option<Section>,
}

impl SectionFold {
    /// Folds one region into the accumulator.
    pub fn push(mut self, region: &TextRegion) -> Self {
        match region.kind {
            RegionKind::Title => {
                if let Some(done) = self.current.take() {
                    self.finished.push(done);
                }
                self.current = Some(Section::titled(region.text.as_str(), region.page));
            }
            RegionKind::Text => {
                if let Some(section) = self.current.as_mut() {
                    section.push_block(region.text.as_str(), region.page);
                } else {
                    self.current = Some(Section::unnamed(region.text.as_str(), region.page));
                }
            }
        }
        self
    }

    /// Sections closed so far.
    pub fn finished(&self) -> &[Section] {
        &self.finished
    }

    /// The section currently accepting text blocks, if any.
    pub fn open_section(&self) -> Option<&Section> {
        self.current.as_ref()
    }

    /// Closes the open section and returns every section in input order.
    pub fn finish(mut self) -> Vec<Section> {
        if let Some(done) = self.current.take() {
            self.finished.push(done);
        }
        self.finished
    }
}

/// Groups an ordered region stream into sections.
///
/// Sections come out in input order and every region lands in exactly one section.
pub fn organize_sections<'a, I>(regions: I) -> Vec<Section>
where
    I: IntoIterator<Item = &'a TextRegion>,
{
    regions
        .into_iter()
        .fold(SectionFold::default(), SectionFold::push)
        .finish()
}

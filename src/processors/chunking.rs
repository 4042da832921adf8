//! Repacking of sections into page-bounded chunks.
//!
//! Sections are the atomic unit: a chunk always holds whole sections, taken as
//! a contiguous run of the input. Packing is greedy and single-pass: a section
//! joins the current chunk unless the union of page sets would exceed the
//! limit, in which case the current chunk is flushed first. A section whose own
//! page set is already over the limit is emitted alone, unsplit.

use crate::core::config::ChunkingConfig;
use crate::processors::Section;
use std::collections::BTreeSet;
use std::ops::Range;
use tracing::debug;

/// A run of consecutive sections packed into one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedChunk<'a> {
    sections: &'a [Section],
    pages: BTreeSet<usize>,
}

impl<'a> PackedChunk<'a> {
    fn new(sections: &'a [Section]) -> Self {
        let pages = sections
            .iter()
            .flat_map(|section| section.pages.iter().copied())
            .collect();
        Self { sections, pages }
    }

    /// Sections packed into this chunk, in input order.
    pub fn sections(&self) -> &'a [Section] {
        self.sections
    }

    /// Union of the page sets of this chunk's sections.
    pub fn pages(&self) -> &BTreeSet<usize> {
        &self.pages
    }

    /// Renders the chunk text: each section rendered in order, joined by newlines.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(Section::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Accumulator of the packing fold.
#[derive(Debug, Default)]
struct ChunkFold {
    flushed: Vec<Range<usize>>,
    start: usize,
    len: usize,
    pages: BTreeSet<usize>,
}

impl ChunkFold {
    fn push(mut self, index: usize, section: &Section, max_pages: usize) -> Self {
        let merged: BTreeSet<usize> = self.pages.union(&section.pages).copied().collect();

        if merged.len() > max_pages && self.len > 0 {
            self.flushed.push(self.start..self.start + self.len);
            self.start = index;
            self.len = 1;
            self.pages = section.pages.clone();
        } else {
            self.len += 1;
            self.pages = merged;
        }
        self
    }

    fn finish(mut self) -> Vec<Range<usize>> {
        if self.len > 0 {
            self.flushed.push(self.start..self.start + self.len);
        }
        self.flushed
    }
}

/// Packs sections into chunks covering a bounded number of distinct pages.
#[derive(Debug, Clone, Default)]
pub struct ChunkPacker {
    config: ChunkingConfig,
}

impl ChunkPacker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn max_pages_per_chunk(&self) -> usize {
        self.config.max_pages_per_chunk
    }

    /// Groups `sections` into chunks.
    ///
    /// When the whole document has at most `max_pages_per_chunk` pages, every
    /// section goes into a single chunk, even when there are no sections at all.
    pub fn pack<'a>(&self, sections: &'a [Section], num_pages: usize) -> Vec<PackedChunk<'a>> {
        let max_pages = self.config.max_pages_per_chunk;

        if num_pages <= max_pages {
            debug!(num_pages, max_pages, "Document fits a single chunk");
            return vec![PackedChunk::new(sections)];
        }

        let chunks: Vec<PackedChunk<'a>> = sections
            .iter()
            .enumerate()
            .fold(ChunkFold::default(), |fold, (index, section)| {
                fold.push(index, section, max_pages)
            })
            .finish()
            .into_iter()
            .map(|range| PackedChunk::new(&sections[range]))
            .collect();

        for (index, chunk) in chunks.iter().enumerate() {
            debug!(
                chunk = index,
                sections = chunk.sections().len(),
                pages = chunk.pages().len(),
                "Packed chunk"
            );
        }

        chunks
    }

    /// Packs and renders `sections` into chunk texts.
    pub fn chunk(&self, sections: &[Section], num_pages: usize) -> Vec<String> {
        self.pack(sections, num_pages)
            .iter()
            .map(PackedChunk::render)
            .collect()
    }
}

/// Packs and renders sections with an explicit page bound.
pub fn chunk_sections(
    sections: &[Section],
    num_pages: usize,
    max_pages_per_chunk: usize,
) -> Vec<String> {
    ChunkPacker::new(ChunkingConfig::default().with_max_pages_per_chunk(max_pages_per_chunk))
        .chunk(sections, num_pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(title: &str, pages: &[usize]) -> Section {
        let mut section = Section::titled(title, pages[0]);
        for page in pages {
            section.push_block(format!("{title} body p{page}"), *page);
        }
        section
    }

    fn one_section_per_page(count: usize) -> Vec<Section> {
        (1..=count).map(|page| section(&format!("S{page}"), &[page])).collect()
    }

    #[test]
    fn test_small_document_is_single_chunk() {
        let sections = one_section_per_page(3);
        let chunks = chunk_sections(&sections, 3, 6);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("S1\n"));
        assert!(chunks[0].contains("S3 body p3"));
    }

    #[test]
    fn test_fast_path_ignores_section_page_sets() {
        // Page numbers beyond num_pages do not matter on the fast path
        let sections = vec![section("Wide", &[1, 2, 3, 4, 5, 6, 7, 8])];
        assert_eq!(chunk_sections(&sections, 6, 6).len(), 1);
    }

    #[test]
    fn test_fast_path_without_sections_yields_one_empty_chunk() {
        assert_eq!(chunk_sections(&[], 2, 6), vec![String::new()]);
    }

    #[test]
    fn test_general_path_without_sections_yields_nothing() {
        assert!(chunk_sections(&[], 10, 6).is_empty());
    }

    #[test]
    fn test_ten_single_page_sections_split_six_and_four() {
        let sections = one_section_per_page(10);
        let packer = ChunkPacker::default();
        let chunks = packer.pack(&sections, 10);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].sections().len(), 6);
        assert_eq!(chunks[0].pages(), &(1..=6).collect::<BTreeSet<_>>());
        assert_eq!(chunks[1].sections().len(), 4);
        assert_eq!(chunks[1].pages(), &(7..=10).collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_sections_sharing_pages_stay_together() {
        // Three sections all on pages 1-2 fit alongside later single-page sections
        let sections = vec![
            section("A", &[1, 2]),
            section("B", &[2]),
            section("C", &[1, 2]),
            section("D", &[3]),
            section("E", &[4]),
        ];
        let chunks = ChunkPacker::new(ChunkingConfig::default().with_max_pages_per_chunk(3))
            .pack(&sections, 4);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].sections().len(), 4);
        assert_eq!(chunks[1].sections()[0].title, "E");
    }

    #[test]
    fn test_oversized_section_stands_alone() {
        let sections = vec![
            section("Intro", &[1]),
            section("Appendix", &[2, 3, 4]),
            section("Outro", &[5]),
        ];
        let chunks = ChunkPacker::new(ChunkingConfig::default().with_max_pages_per_chunk(2))
            .pack(&sections, 5);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].sections().len(), 1);
        assert_eq!(chunks[1].sections()[0].title, "Appendix");
        assert_eq!(chunks[1].pages().len(), 3);
    }

    #[test]
    fn test_oversized_first_section_is_not_split() {
        let sections = vec![section("Huge", &[1, 2, 3, 4]), section("Tail", &[4])];
        let chunks = ChunkPacker::new(ChunkingConfig::default().with_max_pages_per_chunk(2))
            .pack(&sections, 4);

        // Tail adds no new page, but the union already exceeds the bound
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].sections()[0].title, "Huge");
        assert_eq!(chunks[1].sections()[0].title, "Tail");
    }

    #[test]
    fn test_page_bound_holds_for_every_multi_section_chunk() {
        let sections: Vec<Section> = (1..=20)
            .map(|i| section(&format!("S{i}"), &[i, (i % 7) + 1]))
            .collect();
        let max = 4;
        let chunks = ChunkPacker::new(ChunkingConfig::default().with_max_pages_per_chunk(max))
            .pack(&sections, 20);

        let total: usize = chunks.iter().map(|c| c.sections().len()).sum();
        assert_eq!(total, sections.len());
        for chunk in &chunks {
            if chunk.sections().len() > 1 {
                assert!(chunk.pages().len() <= max, "pages: {:?}", chunk.pages());
            }
        }
    }

    #[test]
    fn test_render_joins_sections_with_newline() {
        let sections = vec![section("A", &[1]), section("B", &[1])];
        let chunks = chunk_sections(&sections, 1, 6);
        assert_eq!(chunks[0], "A\nA body p1\nB\nB body p1");
    }
}

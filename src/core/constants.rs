//! Constants shared across the chunking pipeline.

/// A region is a title only when its recognition confidence is strictly above this value.
pub const DEFAULT_TITLE_MIN_CONFIDENCE: f32 = 0.95;

/// A region is a title only when it has strictly fewer whitespace-delimited words than this.
pub const DEFAULT_TITLE_MAX_WORDS: usize = 10;

/// Default upper bound on distinct source pages covered by one chunk.
pub const DEFAULT_MAX_PAGES_PER_CHUNK: usize = 6;

/// Title given to the implicit section opened by body text that precedes any title.
pub const UNNAMED_SECTION_TITLE: &str = "Unnamed Section";

/// Largest accepted input document (16 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Default DPI used when rasterizing PDF pages.
pub const DEFAULT_RENDER_DPI: f32 = 200.0;

/// Default cap on the longest side of a rasterized page, in pixels.
pub const DEFAULT_RENDER_MAX_DIMENSION: u32 = 4000;

/// Default minimum page count before per-page OCR is fanned out to rayon.
pub const DEFAULT_PARALLEL_PAGE_THRESHOLD: usize = 2;

/// Magic bytes every PDF document starts with.
pub const PDF_MAGIC: &[u8] = b"%PDF";

//! Text-region processing: classification, section organization and chunk packing.
//!
//! These are pure functions over in-memory values. None of them touches an
//! image or an OCR model, so they can be exercised without any collaborator.

pub mod chunking;
pub mod classifier;
pub mod geometry;
pub mod sections;

pub use chunking::{ChunkPacker, PackedChunk, chunk_sections};
pub use classifier::{RegionClassifier, RegionKind, classify};
pub use geometry::{BoundingBox, Point};
pub use sections::{Section, SectionFold, organize_sections};

//! Text analysis over extracted page text.
//!
//! Everything here is pure: strings in, typed values out. The modules are
//! leaf-first:
//!
//! - [`normalize`]: page and section-body cleaning
//! - [`numbering`]: heading number recognition and nesting levels
//! - [`segment`]: the section state machine
//! - [`linker`]: parent assignment
//! - [`metadata`]: title, authors, abstract, keywords, date and venue

pub mod linker;
pub mod metadata;
pub mod normalize;
pub mod numbering;
pub mod segment;

pub use linker::{link_parents, LinkStrategy};
pub use metadata::{ExtractedMetadata, Field, MetadataExtractor};
pub use normalize::{NormalizeOptions, TextNormalizer};
pub use numbering::{level_of, parse_heading, parse_number};
pub use segment::{SectionSegmenter, SegmentLimits};

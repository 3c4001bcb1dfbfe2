//! Document model types for extracted papers.
//!
//! These types are the output of the extraction pipeline and the input of
//! rendering and persistence. They carry typed lists throughout; JSON text
//! only appears in [`PaperRecord`].

mod document;
mod page;
mod record;
mod section;

pub use document::{FieldOrigin, FieldOrigins, ParsedDocument};
pub use page::RawPage;
pub use record::PaperRecord;
pub use section::{NumberScheme, NumberToken, Section};

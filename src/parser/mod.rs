//! Page extraction and the parsing pipeline.

mod memory;
mod options;
mod paper_parser;
mod source;

pub use memory::{FixedMemory, MemoryProbe, ProcessMemory};
pub use options::{ErrorMode, ParseOptions};
pub use paper_parser::{PaperParser, ParseReport, ParseStatus, ProgressCallback};
pub use source::{check_pdf_header, LopdfSource, MemorySource, PageSource};

//! # paperparse
//!
//! Structured metadata and section extraction for academic PDFs.
//!
//! This library turns the flat text stream of a paper into a title, an
//! author list, an abstract, keywords and a nested section tree. Headings
//! are recognized across Arabic (`2.1`), bracketed (`(3)`), Roman (`IV.`),
//! Chinese (`三、`), lettered (`A.`) and all-caps (`METHODS`) numbering.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paperparse::{parse_file, render};
//!
//! fn main() -> paperparse::Result<()> {
//!     let doc = parse_file("paper.pdf")?;
//!
//!     println!("{}", render::to_outline(&doc));
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pattern-only baseline**: every field is extracted without a model
//! - **Bounded scanning**: pages are cleaned in batches under a memory guard
//! - **Optional assistance**: plug in any [`assist::TextCompletion`] to
//!   refine metadata or generate mindmaps, timelines and concept graphs
//! - **CJK support**: Chinese numbering, labels and author names
//! - **Storage records**: [`PaperRecord`] keeps list fields as JSON text

pub mod assist;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod text;

// Re-export commonly used types
pub use assist::{CompletionPolicy, GenerationKind, TextCompletion};
pub use error::{Error, Result};
pub use model::{
    FieldOrigin, FieldOrigins, NumberScheme, NumberToken, PaperRecord, ParsedDocument, RawPage,
    Section,
};
pub use parser::{
    ErrorMode, LopdfSource, MemorySource, PageSource, PaperParser, ParseOptions, ParseReport,
    ParseStatus,
};
pub use render::JsonFormat;
pub use text::{LinkStrategy, NormalizeOptions};

use std::path::Path;
use std::sync::Arc;

/// Parse a PDF file and return the extracted document.
///
/// # Example
///
/// ```no_run
/// use paperparse::parse_file;
///
/// let doc = parse_file("paper.pdf").unwrap();
/// println!("{} sections", doc.sections.len());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    PaperParser::default().parse_file(path)
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use paperparse::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new()
///     .lenient()
///     .with_memory_limit(1024);
/// let doc = parse_file_with_options("paper.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParsedDocument> {
    PaperParser::new(options).parse_file(path)
}

/// Parse pages whose text was extracted elsewhere.
///
/// # Example
///
/// ```
/// use paperparse::{parse_pages, RawPage};
///
/// let pages = vec![
///     RawPage::new(0, "1. Introduction\nWe study parsing."),
///     RawPage::new(1, "2. Method\nRules."),
/// ];
/// let doc = parse_pages(&pages)?;
/// assert_eq!(doc.sections.len(), 2);
/// # Ok::<(), paperparse::Error>(())
/// ```
pub fn parse_pages(pages: &[RawPage]) -> Result<ParsedDocument> {
    PaperParser::default().parse(pages)
}

/// Analyze already-extracted text as a single page.
///
/// # Example
///
/// ```
/// use paperparse::parse_text;
///
/// let doc = parse_text("一、引言\n研究背景。\n二、方法\n实验设计。");
/// assert_eq!(doc.sections[1].number_str(), Some("2"));
/// ```
pub fn parse_text(text: &str) -> ParsedDocument {
    PaperParser::default().parse_text(text)
}

/// Parse a PDF file on tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(
    path: P,
    options: ParseOptions,
) -> Result<ParsedDocument> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || parse_file_with_options(path, options))
        .await
        .map_err(|e| Error::Other(format!("Parse task failed: {}", e)))?
}

/// Builder for parsing papers and rendering the result.
///
/// # Example
///
/// ```no_run
/// use paperparse::Paperparse;
///
/// let outline = Paperparse::new()
///     .lenient()
///     .with_memory_limit_mb(1024)
///     .parse("paper.pdf")?
///     .to_outline();
/// # Ok::<(), paperparse::Error>(())
/// ```
pub struct Paperparse {
    parse_options: ParseOptions,
    json_format: JsonFormat,
    assistant: Option<Arc<dyn TextCompletion>>,
    progress: Option<parser::ProgressCallback>,
}

impl Paperparse {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            json_format: JsonFormat::Pretty,
            assistant: None,
            progress: None,
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set the resident memory limit in MB (0 disables the guard).
    pub fn with_memory_limit_mb(mut self, mb: u64) -> Self {
        self.parse_options = self.parse_options.with_memory_limit(mb);
        self
    }

    /// Set the page batch size.
    pub fn with_batch_size(mut self, pages: usize) -> Self {
        self.parse_options = self.parse_options.with_batch_size(pages);
        self
    }

    /// Set the parent linking strategy.
    pub fn with_link_strategy(mut self, strategy: LinkStrategy) -> Self {
        self.parse_options = self.parse_options.with_link_strategy(strategy);
        self
    }

    /// Emit compact JSON.
    pub fn compact(mut self) -> Self {
        self.json_format = JsonFormat::Compact;
        self
    }

    /// Refine metadata with a language model.
    pub fn with_assistant(mut self, assistant: Arc<dyn TextCompletion>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Report page progress.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    fn into_parser(self) -> (PaperParser, JsonFormat) {
        let mut parser = PaperParser::new(self.parse_options);
        if let Some(assistant) = self.assistant {
            parser = parser.with_shared_assistant(assistant);
        }
        if let Some(progress) = self.progress {
            parser = parser.with_progress(progress);
        }
        (parser, self.json_format)
    }

    /// Parse a PDF file.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<PaperparseResult> {
        let (parser, json_format) = self.into_parser();
        let document = parser.parse_file(path)?;
        Ok(PaperparseResult {
            document,
            json_format,
        })
    }

    /// Parse a PDF held in memory.
    pub fn parse_bytes(self, data: &[u8]) -> Result<PaperparseResult> {
        let source = LopdfSource::from_bytes(data)?;
        let (parser, json_format) = self.into_parser();
        let document = parser.parse(&source)?;
        Ok(PaperparseResult {
            document,
            json_format,
        })
    }
}

impl Default for Paperparse {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a paper.
pub struct PaperparseResult {
    /// The parsed document
    pub document: ParsedDocument,
    json_format: JsonFormat,
}

impl PaperparseResult {
    /// Convert to JSON in the builder's format.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.document, self.json_format)
    }

    /// Indented section outline.
    pub fn to_outline(&self) -> String {
        render::to_outline(&self.document)
    }

    /// Storage record with JSON-encoded list fields.
    pub fn to_record(&self) -> Result<PaperRecord> {
        self.document.to_record()
    }

    /// Get the document.
    pub fn document(&self) -> &ParsedDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let builder = Paperparse::new()
            .lenient()
            .with_memory_limit_mb(64)
            .compact();

        assert_eq!(builder.parse_options.error_mode, ErrorMode::Lenient);
        assert_eq!(builder.parse_options.memory_limit_mb, 64);
        assert_eq!(builder.json_format, JsonFormat::Compact);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_parse_bytes_empty_data() {
        let result = Paperparse::new().parse_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_parse_bytes_unknown_magic() {
        let data = b"<!DOCTYPE html><html></html>";
        assert!(matches!(
            Paperparse::new().parse_bytes(data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(matches!(
            parse_file("/nonexistent/paper.pdf"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_parse_text_without_structure() {
        let doc = parse_text("");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_pages_order() {
        let pages = vec![
            RawPage::new(0, "1. Introduction\nfirst"),
            RawPage::empty(1),
            RawPage::new(2, "1.1 Motivation\nsecond"),
        ];
        let doc = parse_pages(&pages).unwrap();
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].parent_str(), Some("1"));
    }
}

//! Paper extraction pipeline.

use std::path::Path;
use std::sync::Arc;

use crate::assist::{request_metadata, TextCompletion};
use crate::error::{Error, Result};
use crate::model::ParsedDocument;
use crate::text::{link_parents, MetadataExtractor, SectionSegmenter, TextNormalizer};

use super::memory::{MemoryProbe, ProcessMemory};
use super::options::{ErrorMode, ParseOptions};
use super::source::{LopdfSource, PageSource};

/// Progress callback, called with (pages done, pages total) after each batch.
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// How a reported parse ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    /// The document was parsed
    Parsed,
    /// The memory guard tripped; the document is empty
    ResourceExhausted,
    /// Something else failed; the document is empty
    Failed(String),
}

/// Outcome of [`PaperParser::parse_report`].
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub status: ParseStatus,
    pub document: ParsedDocument,
}

impl ParseReport {
    /// Whether the parse succeeded.
    pub fn is_parsed(&self) -> bool {
        self.status == ParseStatus::Parsed
    }
}

/// Extracts a [`ParsedDocument`] from a page source.
///
/// Pages are cleaned in batches; after each batch the memory guard runs and
/// the progress callback fires. The cleaned text then goes through metadata
/// extraction, section segmentation and parent linking, and finally through
/// the optional metadata assistant.
///
/// # Example
///
/// ```
/// use paperparse::parser::{MemorySource, PaperParser};
///
/// let source = MemorySource::from_texts(["1. Introduction\nWe study parsing."]);
/// let doc = PaperParser::default().parse(&source)?;
/// assert_eq!(doc.sections[0].title, "Introduction");
/// # Ok::<(), paperparse::Error>(())
/// ```
pub struct PaperParser {
    options: ParseOptions,
    normalizer: TextNormalizer,
    extractor: MetadataExtractor,
    memory: Box<dyn MemoryProbe>,
    progress: Option<ProgressCallback>,
    assistant: Option<Arc<dyn TextCompletion>>,
}

impl PaperParser {
    /// Create a parser with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            normalizer: TextNormalizer::new(options.normalize.clone()),
            extractor: MetadataExtractor::new(),
            memory: Box::new(ProcessMemory),
            progress: None,
            assistant: None,
            options,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Set the progress callback.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Replace the memory probe.
    pub fn with_memory_probe<M: MemoryProbe + 'static>(mut self, probe: M) -> Self {
        self.memory = Box::new(probe);
        self
    }

    /// Use a language model to refine title, authors, abstract and keywords.
    pub fn with_assistant<C: TextCompletion + 'static>(self, assistant: C) -> Self {
        self.with_shared_assistant(Arc::new(assistant))
    }

    /// Use a shared language-model client.
    pub fn with_shared_assistant(mut self, assistant: Arc<dyn TextCompletion>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Open and parse a PDF file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedDocument> {
        let source = LopdfSource::open(path)?;
        self.parse(&source)
    }

    /// Parse every page of `source`.
    ///
    /// Returns [`Error::MemoryExhausted`] when the memory guard trips and
    /// propagates page errors in [`ErrorMode::Strict`].
    pub fn parse<S: PageSource + ?Sized>(&self, source: &S) -> Result<ParsedDocument> {
        let text = self.clean_pages(source)?;
        Ok(self.analyze(&text))
    }

    /// Parse with a failure boundary: errors become a status and an empty
    /// document instead of propagating.
    pub fn parse_report<S: PageSource + ?Sized>(&self, source: &S) -> ParseReport {
        report(self.parse(source))
    }

    /// Open and parse a PDF file with a failure boundary; open errors are
    /// reported like any other failure.
    pub fn parse_file_report<P: AsRef<Path>>(&self, path: P) -> ParseReport {
        report(self.parse_file(path))
    }

    /// Analyze text that was already extracted, as a single page.
    pub fn parse_text(&self, text: &str) -> ParsedDocument {
        let cleaned = self.normalizer.clean_page(text);
        self.analyze(&cleaned)
    }

    /// Clean all pages, batch by batch, into one newline-joined text.
    fn clean_pages<S: PageSource + ?Sized>(&self, source: &S) -> Result<String> {
        self.check_file_size(source);

        let total = source.page_count();
        let batch_size = self.options.batch_size.max(1);
        let mut text = String::new();
        let mut done = 0;

        while done < total {
            let end = (done + batch_size).min(total);
            for index in done..end {
                let Some(raw) = self.page_text(source, index)? else {
                    continue;
                };
                let cleaned = self.normalizer.clean_page(&raw);
                if cleaned.is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&cleaned);
            }
            done = end;

            log::debug!("Cleaned pages {}/{}", done, total);
            self.check_memory()?;
            if let Some(progress) = &self.progress {
                progress(done, total);
            }
        }

        Ok(text)
    }

    fn page_text<S: PageSource + ?Sized>(&self, source: &S, index: usize) -> Result<Option<String>> {
        match source.page_text(index) {
            Ok(text) => Ok(text),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("Skipping page {}: {}", index + 1, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn check_file_size<S: PageSource + ?Sized>(&self, source: &S) {
        let limit_mb = self.options.max_file_size_mb;
        if let Some(bytes) = source.byte_len() {
            if limit_mb > 0 && bytes > limit_mb.saturating_mul(1024 * 1024) {
                log::warn!(
                    "Input is {} MB, above the {} MB guideline; parsing may be slow",
                    bytes / (1024 * 1024),
                    limit_mb
                );
            }
        }
    }

    fn check_memory(&self) -> Result<()> {
        let limit_mb = self.options.memory_limit_mb;
        if limit_mb == 0 {
            return Ok(());
        }
        match self.memory.resident_mb() {
            Some(used_mb) if used_mb > limit_mb => {
                Err(Error::MemoryExhausted { used_mb, limit_mb })
            }
            _ => Ok(()),
        }
    }

    /// Metadata, sections and parents from cleaned text.
    fn analyze(&self, text: &str) -> ParsedDocument {
        let mut doc = ParsedDocument::new();
        self.extractor.extract(text).apply_to(&mut doc);

        let segmenter = SectionSegmenter::new(&self.normalizer, self.options.segment_limits());
        let mut sections = segmenter.segment(text);
        link_parents(&mut sections, self.options.link_strategy);
        doc.sections = sections;

        if let Some(assistant) = &self.assistant {
            match request_metadata(assistant.as_ref(), text, self.options.assist_sample_chars) {
                Ok(assisted) => assisted.merge_into(&mut doc),
                Err(e) => log::warn!("Metadata assistant failed, keeping pattern values: {}", e),
            }
        }

        log::debug!(
            "Extracted {} sections, {} authors, {} keywords",
            doc.sections.len(),
            doc.authors.len(),
            doc.keywords.len()
        );
        doc
    }
}

impl Default for PaperParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

fn report(result: Result<ParsedDocument>) -> ParseReport {
    match result {
        Ok(document) => ParseReport {
            status: ParseStatus::Parsed,
            document,
        },
        Err(e) if e.is_resource_exhaustion() => {
            log::warn!("Parse aborted: {}", e);
            ParseReport {
                status: ParseStatus::ResourceExhausted,
                document: ParsedDocument::new(),
            }
        }
        Err(e) => {
            log::error!("Parse failed: {}", e);
            ParseReport {
                status: ParseStatus::Failed(e.to_string()),
                document: ParsedDocument::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::memory::FixedMemory;
    use crate::model::RawPage;
    use crate::parser::source::MemorySource;

    #[test]
    fn test_pages_joined_in_order() {
        let source = MemorySource::new(vec![
            Some("1. Introduction\nfirst page".to_string()),
            None,
            Some("second page\n2. Method\nthird".to_string()),
        ]);
        let doc = PaperParser::default().parse(&source).unwrap();

        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].content, "first page second page");
        assert_eq!(doc.sections[1].content, "third");
    }

    #[test]
    fn test_memory_guard() {
        let source = MemorySource::from_texts(["1. Introduction\nbody"]);
        let parser = PaperParser::new(ParseOptions::new().with_memory_limit(100))
            .with_memory_probe(FixedMemory(150));
        let err = parser.parse(&source).unwrap_err();
        assert!(matches!(
            err,
            Error::MemoryExhausted {
                used_mb: 150,
                limit_mb: 100
            }
        ));

        let unlimited = PaperParser::new(ParseOptions::new().unlimited_memory())
            .with_memory_probe(FixedMemory(u64::MAX));
        assert!(unlimited.parse(&source).is_ok());
    }

    #[test]
    fn test_report_statuses() {
        let source = MemorySource::from_texts(["1. Introduction\nbody"]);

        let ok = PaperParser::default()
            .with_memory_probe(FixedMemory(1))
            .parse_report(&source);
        assert!(ok.is_parsed());
        assert_eq!(ok.document.sections.len(), 1);

        let exhausted = PaperParser::default()
            .with_memory_probe(FixedMemory(10_000))
            .parse_report(&source);
        assert_eq!(exhausted.status, ParseStatus::ResourceExhausted);
        assert!(exhausted.document.is_empty());

        let missing = PaperParser::default().parse_file_report("/nonexistent/paper.pdf");
        assert!(matches!(missing.status, ParseStatus::Failed(_)));
        assert!(missing.document.is_empty());
    }

    #[test]
    fn test_raw_page_slice_source() {
        let pages = vec![RawPage::new(0, "1. Scope\ntext"), RawPage::empty(1)];
        let doc = PaperParser::default().parse(pages.as_slice()).unwrap();
        assert_eq!(doc.sections[0].title, "Scope");
    }

    #[test]
    fn test_parse_text() {
        let doc = PaperParser::default().parse_text("1. Introduction\r\nbody\r\n1.1 Scope\r\nmore");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[1].parent_str(), Some("1"));
    }

    #[test]
    fn test_empty_source() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let parser = PaperParser::default().with_progress(move |_, _| {
            seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });
        let doc = parser.parse(&MemorySource::default()).unwrap();
        assert!(doc.is_empty());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}

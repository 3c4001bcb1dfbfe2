//! Page text sources.
//!
//! The extractor only ever asks for "the text of page N"; where that text
//! comes from is behind [`PageSource`]. [`LopdfSource`] reads PDFs through
//! lopdf, [`MemorySource`] serves pre-extracted text.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};
use crate::model::RawPage;

/// Per-page text extraction capability.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Text of the page at zero-based `index`, or `None` when the page has
    /// no text layer.
    fn page_text(&self, index: usize) -> Result<Option<String>>;

    /// Size of the underlying file in bytes, when known.
    fn byte_len(&self) -> Option<u64> {
        None
    }

    /// Fetch a page as a [`RawPage`].
    fn raw_page(&self, index: usize) -> Result<RawPage> {
        Ok(match self.page_text(index)? {
            Some(text) => RawPage::new(index, text),
            None => RawPage::empty(index),
        })
    }
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        (**self).page_text(index)
    }

    fn byte_len(&self) -> Option<u64> {
        (**self).byte_len()
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        (**self).page_text(index)
    }

    fn byte_len(&self) -> Option<u64> {
        (**self).byte_len()
    }
}

/// Pages already in memory, in slice order.
impl PageSource for [RawPage] {
    fn page_count(&self) -> usize {
        self.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        self.get(index)
            .map(|page| page.text.clone())
            .ok_or(Error::PageOutOfRange(index, self.len()))
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Check the `%PDF-x.y` header and return the version string.
pub fn check_pdf_header(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN])
        .to_string();
    let bytes = version.as_bytes();
    let valid = bytes.len() == 3
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit();
    if !valid {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    /// lopdf page numbers (1-based) in page order
    page_numbers: Vec<u32>,
    byte_len: Option<u64>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut header = Vec::with_capacity(16);
        File::open(path)?.take(16).read_to_end(&mut header)?;
        check_pdf_header(&header)?;

        let byte_len = std::fs::metadata(path).ok().map(|m| m.len());
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc, byte_len))
    }

    /// Load a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        check_pdf_header(data)?;
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc, Some(data.len() as u64)))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument, byte_len: Option<u64>) -> Self {
        if doc.is_encrypted() {
            log::warn!("Document is encrypted; text extraction may return nothing");
        }
        let pages: BTreeMap<u32, _> = doc.get_pages();
        Self {
            page_numbers: pages.keys().copied().collect(),
            doc,
            byte_len,
        }
    }

    /// PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        let page_num = *self
            .page_numbers
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.page_numbers.len()))?;

        let text = self
            .doc
            .extract_text(&[page_num])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))?;

        Ok(if text.trim().is_empty() { None } else { Some(text) })
    }

    fn byte_len(&self) -> Option<u64> {
        self.byte_len
    }
}

/// [`PageSource`] over text already in memory, one entry per page.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Option<String>>,
}

impl MemorySource {
    /// Create a source from per-page text; `None` is a page without text.
    pub fn new(pages: Vec<Option<String>>) -> Self {
        Self { pages }
    }

    /// Create a source where every page has text.
    pub fn from_texts<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(|p| Some(p.into())).collect(),
        }
    }

    /// Append a page.
    pub fn push(&mut self, text: Option<String>) {
        self.pages.push(text);
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }

    fn byte_len(&self) -> Option<u64> {
        Some(self.pages.iter().flatten().map(|p| p.len() as u64).sum())
    }
}

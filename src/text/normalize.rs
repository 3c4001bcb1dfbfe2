//! Text normalization for extracted page text and section bodies.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Maximum characters kept in a cleaned section body.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Marker appended to truncated section bodies.
pub const ELLIPSIS: &str = "...";

lazy_static! {
    static ref INLINE_SPACE_RUN: Regex = Regex::new(r"[ \t]{2,}").unwrap();
    static ref CONTENT_CHAR: Regex =
        Regex::new(r"[\p{Alphabetic}\p{Nd}\p{Han}\p{Hiragana}\p{Katakana}\p{Hangul}]").unwrap();
}

/// Options for page-level cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Collapse runs of spaces/tabs inside a line to one space
    pub collapse_inline_space: bool,

    /// Maximum characters kept in a cleaned section body
    pub max_content_chars: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            collapse_inline_space: true,
            max_content_chars: MAX_CONTENT_CHARS,
        }
    }
}

impl NormalizeOptions {
    /// Only the mandatory cleaning steps.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: false,
            fix_ligatures: false,
            remove_replacement_char: false,
            collapse_inline_space: false,
            max_content_chars: MAX_CONTENT_CHARS,
        }
    }
}

/// Cleans page text and section bodies.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    options: NormalizeOptions,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl TextNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            ligature_map: vec![
                ("\u{FB00}", "ff"),  // ﬀ
                ("\u{FB01}", "fi"),  // ﬁ
                ("\u{FB02}", "fl"),  // ﬂ
                ("\u{FB03}", "ffi"), // ﬃ
                ("\u{FB04}", "ffl"), // ﬄ
                ("\u{FB05}", "st"),  // ﬅ (long s + t)
                ("\u{FB06}", "st"),  // ﬆ
            ],
        }
    }

    /// Options in use.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Clean the raw text of one page.
    ///
    /// Line structure is kept: the result holds one cleaned line per
    /// source line that carries any letter, digit or CJK character.
    pub fn clean_page(&self, raw: &str) -> String {
        let mut text = strip_page_controls(raw);

        if self.options.normalize_unicode {
            text = text.nfc().collect();
        }

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                text = text.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            text = text.replace('\u{FFFD}', "");
        }

        let mut lines = Vec::new();
        for line in split_page_lines(&text) {
            let mut line = normalize_spaces(line);
            if self.options.collapse_inline_space {
                line = INLINE_SPACE_RUN.replace_all(&line, " ").into_owned();
            }
            let line = line.trim();
            if has_content_char(line) {
                lines.push(line.to_string());
            }
        }

        lines.join("\n")
    }

    /// Clean a section body.
    ///
    /// Blank lines separate paragraphs; the lines of a paragraph are joined
    /// with single spaces and paragraphs with a blank line. Bodies longer
    /// than the configured maximum are cut and end with [`ELLIPSIS`].
    /// Cleaning an already-clean body returns it unchanged.
    pub fn clean_content(&self, raw: &str) -> String {
        let text: String = normalize_spaces(raw)
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect();

        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        truncate_with_ellipsis(&paragraphs.join("\n\n"), self.options.max_content_chars)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

/// Remove the control characters that PDF text layers leak, keeping tab,
/// line feed and carriage return for line splitting.
fn strip_page_controls(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !matches!(code, 0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F..=0x9F)
        })
        .collect()
}

/// Split page text into lines on `\n`, `\r\n` or a lone `\r`.
fn split_page_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').flat_map(|line| {
        let line = line.strip_suffix('\r').unwrap_or(line);
        line.split('\r')
    })
}

/// Map full-width and non-breaking spaces and in-line separators to ASCII space.
fn normalize_spaces(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3000}' | '\u{00A0}' | '\u{2028}' | '\u{2029}' => ' ',
            _ => c,
        })
        .collect()
}

/// Whether a line carries at least one letter, digit or CJK character.
pub fn has_content_char(line: &str) -> bool {
    CONTENT_CHAR.is_match(line)
}

/// Cut `text` to at most `max_chars` characters, ending with [`ELLIPSIS`]
/// when anything was removed.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.chars().count());
    let cut: String = text.chars().take(keep).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Cut `text` to at most `max_chars` characters without a marker.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Collapse every whitespace run (newlines included) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Pattern-based bibliographic metadata extraction.
//!
//! Every extractor is best-effort. A miss is reported as
//! [`Field::NotFound`], a candidate that fails validation as
//! [`Field::Rejected`]; neither is an error and both collapse to empty
//! values in the document.

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::{collapse_whitespace, truncate_chars};
use super::numbering::parse_heading;
use crate::model::{FieldOrigin, ParsedDocument};

/// Maximum number of authors kept.
pub const MAX_AUTHORS: usize = 10;
/// Maximum number of keywords kept on the pattern path.
pub const MAX_KEYWORDS: usize = 10;
/// Maximum abstract length in characters.
pub const MAX_ABSTRACT_CHARS: usize = 2000;
/// An abstract must be longer than this to be accepted.
pub const MIN_ABSTRACT_CHARS: usize = 50;

const TITLE_SCAN_LINES: usize = 10;
const AUTHOR_SCAN_LINES: usize = 60;
const AUTHOR_LOOKBACK_LINES: usize = 5;
const NAME_SCAN_CHARS: usize = 500;
const ABSTRACT_FALLBACK_LINES: usize = 20;
const MAX_KEYWORD_CHARS: usize = 30;

lazy_static! {
    static ref LETTER_RUN: Regex = Regex::new(r"\p{Alphabetic}{3,}").unwrap();
    static ref FRONT_MATTER_MARKER: Regex = Regex::new(
        r"(?i)^(?:abstract|keywords?|key\s+words|index\s+terms|introduction|摘\s*要|关键词|关键字|引言)"
    )
    .unwrap();

    static ref EMAIL: Regex = Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+").unwrap();
    static ref INSTITUTION: Regex = Regex::new(
        r"(?i)universit|institut|department|\bdept\b|college|school|laborator|\blab\b|academy|\bcent(?:er|re)\b|faculty|corporation|\binc\b|大学|学院|研究所|研究院|实验室|研究中心|公司"
    )
    .unwrap();
    static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"[,;、，；&]|\s+and\s+").unwrap();
    static ref FOOTNOTE_MARKER: Regex =
        Regex::new(r"(?:[\d*†‡§¶¹²³⁴⁵⁶⁷⁸⁹⁰]|\s)+$").unwrap();
    static ref LATIN_NAME: Regex = Regex::new(
        r"^\p{Lu}[\p{Ll}'’-]+(?:\s+\p{Lu}\.?)*(?:\s+\p{Lu}[\p{Ll}'’-]+){1,3}$"
    )
    .unwrap();
    static ref CJK_NAME: Regex = Regex::new(r"^\p{Han}{2,4}$").unwrap();

    static ref ABSTRACT_EN_LABEL: Regex = Regex::new(r"(?i)\babstract\s*[:：.—–-]\s*").unwrap();
    static ref ABSTRACT_EN_STOP: Regex = Regex::new(
        r"(?i)\n\s*(?:keywords?\b|key\s+words|index\s+terms|introduction\b|1\.?\s+\p{L}|I\.\s+\p{L})"
    )
    .unwrap();
    static ref ABSTRACT_ZH_LABEL: Regex = Regex::new(r"摘\s*要\s*[:：]?\s*").unwrap();
    static ref ABSTRACT_ZH_STOP: Regex =
        Regex::new(r"\n\s*(?:关键词|关键字|引言|一、|1\.?\s*\p{L})").unwrap();
    static ref ABSTRACT_ANY_LABEL: Regex = Regex::new(r"(?i)(?:abstract|摘要)\s*").unwrap();
    static ref ABSTRACT_ANY_STOP: Regex = Regex::new(
        r"(?i)\n\s*(?:keywords?\b|key\s+words|index\s+terms|introduction\b|关键词|关键字|引言|一、|1\.?\s*\p{L}|I\.\s+\p{L})"
    )
    .unwrap();
    static ref CITATION_MARKER: Regex =
        Regex::new(r"\[\d+(?:\s*[,–-]\s*\d+)*\]").unwrap();

    static ref KEYWORD_LABEL: Regex = Regex::new(
        r"(?im)^\s*(?:keywords?|key\s+words|index\s+terms|关键词|关键字)\s*[:：—–-]\s*"
    )
    .unwrap();
    static ref KEYWORD_STOP: Regex = Regex::new(
        r"(?i)\n\s*\d+(?:\.\d+)*\.?\s|\n\s*[IVX]+\.\s|\n\s*一、|introduction|引言"
    )
    .unwrap();
    static ref KEYWORD_SEPARATOR: Regex = Regex::new(r"[,;，；、\n]").unwrap();

    static ref DATE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\d{4}\s*年\s*\d{1,2}\s*月\s*\d{1,2}\s*日").unwrap(),
        Regex::new(r"\b\d{4}[-/]\d{1,2}[-/]\d{1,2}\b").unwrap(),
        Regex::new(
            r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}\b"
        )
        .unwrap(),
    ];
    static ref SOURCE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"Proceedings\s+of\s+([^,\n]+)").unwrap(),
        Regex::new(r"Published\s+in\s+([^,\n]+)").unwrap(),
        Regex::new(r"Journal\s+of\s+([^,\n]+)").unwrap(),
        Regex::new(r"([A-Z][A-Z ]+Conference)").unwrap(),
    ];
}

/// Outcome of a single best-effort extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// A value passed validation
    Found(T),
    /// No candidate was present
    NotFound,
    /// A candidate was present but failed validation
    Rejected(String),
}

impl<T> Field<T> {
    /// Whether a value was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Field::Found(_))
    }

    /// The found value, if any.
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Found(value) => Some(value),
            _ => None,
        }
    }

    /// The found value, or `T::default()` for misses and rejections.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.into_option().unwrap_or_default()
    }

    /// Borrow the found value.
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Found(value) => Field::Found(value),
            Field::NotFound => Field::NotFound,
            Field::Rejected(reason) => Field::Rejected(reason.clone()),
        }
    }
}

/// All pattern-extracted metadata of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub title: Field<String>,
    pub authors: Field<Vec<String>>,
    pub abstract_text: Field<String>,
    pub keywords: Field<Vec<String>>,
    pub publish_date: Field<String>,
    pub source: Field<String>,
}

impl ExtractedMetadata {
    /// Write the found values into `doc`, marking their origin as
    /// [`FieldOrigin::Pattern`]. Misses leave the document fields untouched.
    pub fn apply_to(self, doc: &mut ParsedDocument) {
        if let Field::Found(title) = self.title {
            doc.title = title;
            doc.origins.title = FieldOrigin::Pattern;
        }
        if let Field::Found(authors) = self.authors {
            doc.authors = authors;
            doc.origins.authors = FieldOrigin::Pattern;
        }
        if let Field::Found(abstract_text) = self.abstract_text {
            doc.abstract_text = abstract_text;
            doc.origins.abstract_text = FieldOrigin::Pattern;
        }
        if let Field::Found(keywords) = self.keywords {
            doc.keywords = keywords;
            doc.origins.keywords = FieldOrigin::Pattern;
        }
        if let Field::Found(date) = self.publish_date {
            doc.publish_date = date;
        }
        if let Field::Found(source) = self.source {
            doc.source = source;
        }
    }
}

/// Regex-only extractor for title, authors, abstract, keywords, date and venue.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    max_authors: usize,
    max_keywords: usize,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self {
            max_authors: MAX_AUTHORS,
            max_keywords: MAX_KEYWORDS,
        }
    }
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every extractor over the cleaned document text.
    pub fn extract(&self, text: &str) -> ExtractedMetadata {
        let title = self.title(text);
        let authors = self.authors(text, title.as_ref().into_option().map(String::as_str));

        let metadata = ExtractedMetadata {
            title,
            authors,
            abstract_text: self.abstract_text(text),
            keywords: self.keywords(text),
            publish_date: self.publish_date(text),
            source: self.source(text),
        };

        for (name, rejected) in [
            ("title", &metadata.title),
            ("abstract", &metadata.abstract_text),
        ] {
            if let Field::Rejected(reason) = rejected {
                log::debug!("Rejected {} candidate: {}", name, reason);
            }
        }

        metadata
    }

    /// First plausible title line among the first ten non-empty lines.
    pub fn title(&self, text: &str) -> Field<String> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(TITLE_SCAN_LINES)
            .find(|line| is_title_candidate(line))
            .map(|line| Field::Found(line.to_string()))
            .unwrap_or(Field::NotFound)
    }

    /// Author names from the lines around the first e-mail address, plus a
    /// scan of the first page region for name lists.
    ///
    /// `title` is excluded from the candidates.
    pub fn authors(&self, text: &str, title: Option<&str>) -> Field<Vec<String>> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(AUTHOR_SCAN_LINES)
            .collect();

        let mut candidates: Vec<String> = Vec::new();

        if let Some(email_idx) = first_email_line(&lines) {
            let start = email_idx.saturating_sub(AUTHOR_LOOKBACK_LINES);
            for line in &lines[start..email_idx] {
                if line.contains('@') || is_excluded_author_line(line, title) {
                    continue;
                }
                candidates.extend(split_author_line(line));
            }

            // "Ada Lovelace (ada@cam.ac.uk)" names its author in place
            let remainder = EMAIL.replace_all(lines[email_idx], " ");
            let remainder = remainder.trim_matches(|c: char| {
                c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>' | '{' | '}' | ',' | ';')
            });
            if !remainder.is_empty() && !is_excluded_author_line(remainder, title) {
                candidates.extend(split_author_line(remainder));
            }
        }

        let head = truncate_chars(text, NAME_SCAN_CHARS);
        for line in head.lines().map(str::trim) {
            if line.is_empty() || is_excluded_author_line(line, title) {
                continue;
            }
            candidates.extend(name_run(line));
        }

        let authors = dedupe(candidates, self.max_authors);
        if authors.is_empty() {
            Field::NotFound
        } else {
            Field::Found(authors)
        }
    }

    /// Abstract body, collapsed to a single line.
    pub fn abstract_text(&self, text: &str) -> Field<String> {
        let layered = [
            (&*ABSTRACT_EN_LABEL, &*ABSTRACT_EN_STOP),
            (&*ABSTRACT_ZH_LABEL, &*ABSTRACT_ZH_STOP),
            (&*ABSTRACT_ANY_LABEL, &*ABSTRACT_ANY_STOP),
        ];

        let mut rejected = None;
        for (label, stop) in layered {
            let Some(candidate) = labelled_block(text, label, stop) else {
                continue;
            };
            match accept_abstract(&candidate) {
                Ok(abstract_text) => return Field::Found(abstract_text),
                Err(reason) => rejected = Some(reason),
            }
        }

        if let Some(candidate) = standalone_abstract(text) {
            match accept_abstract(&candidate) {
                Ok(abstract_text) => return Field::Found(abstract_text),
                Err(reason) => rejected = Some(reason),
            }
        }

        match rejected {
            Some(reason) => Field::Rejected(reason),
            None => Field::NotFound,
        }
    }

    /// Keyword list following a `Keywords:` style label.
    pub fn keywords(&self, text: &str) -> Field<Vec<String>> {
        let Some(label) = KEYWORD_LABEL.find(text) else {
            return Field::NotFound;
        };
        let rest = &text[label.end()..];
        let block = match KEYWORD_STOP.find(rest) {
            Some(stop) => &rest[..stop.start()],
            None => rest,
        };

        let entries = KEYWORD_SEPARATOR
            .split(block)
            .map(|k| k.trim().trim_end_matches(['.', '。']).trim())
            .filter(|k| is_keyword(k))
            .map(str::to_string)
            .collect();

        let keywords = dedupe(entries, self.max_keywords);
        if keywords.is_empty() {
            Field::Rejected("no usable keyword entries".to_string())
        } else {
            Field::Found(keywords)
        }
    }

    /// Literal of the first date found, trying the patterns in order.
    pub fn publish_date(&self, text: &str) -> Field<String> {
        DATE_PATTERNS
            .iter()
            .find_map(|pattern| pattern.find(text))
            .map(|m| Field::Found(m.as_str().to_string()))
            .unwrap_or(Field::NotFound)
    }

    /// Journal or proceedings name.
    pub fn source(&self, text: &str) -> Field<String> {
        SOURCE_PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .map(Field::Found)
            .unwrap_or(Field::NotFound)
    }
}

fn is_title_candidate(line: &str) -> bool {
    let len = line.chars().count();
    if !(5..200).contains(&len) {
        return false;
    }
    if line.starts_with(|c: char| c.is_ascii_digit()) || line.contains('@') {
        return false;
    }
    if FRONT_MATTER_MARKER.is_match(line) {
        return false;
    }
    line.chars().any(char::is_alphabetic) && LETTER_RUN.is_match(line)
}

fn first_email_line(lines: &[&str]) -> Option<usize> {
    let academic = lines.iter().position(|line| {
        EMAIL
            .find_iter(line)
            .any(|m| m.as_str().to_lowercase().contains(".edu"))
    });
    academic.or_else(|| lines.iter().position(|line| EMAIL.is_match(line)))
}

fn is_excluded_author_line(line: &str, title: Option<&str>) -> bool {
    INSTITUTION.is_match(line)
        || FRONT_MATTER_MARKER.is_match(line)
        || title.is_some_and(|t| t == line)
}

/// Split an author line into trimmed names without footnote markers.
fn split_author_line(line: &str) -> Vec<String> {
    AUTHOR_SEPARATOR
        .split(line)
        .map(|part| {
            let part = part.trim();
            let part = part.strip_prefix("and ").unwrap_or(part);
            FOOTNOTE_MARKER.replace(part, "").trim().to_string()
        })
        .filter(|name| is_plausible_name(name))
        .collect()
}

fn is_plausible_name(name: &str) -> bool {
    let len = name.chars().count();
    (2..=60).contains(&len)
        && !name.contains('@')
        && name.chars().any(char::is_alphabetic)
        && !INSTITUTION.is_match(name)
}

/// A line that is entirely a list of personal names: two or more
/// capitalized Latin names separated by commas, or two or more 2-4
/// character CJK names.
fn name_run(line: &str) -> Vec<String> {
    let latin: Vec<String> = AUTHOR_SEPARATOR
        .split(line)
        .map(|part| FOOTNOTE_MARKER.replace(part.trim(), "").trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    if latin.len() >= 2 && latin.iter().all(|name| LATIN_NAME.is_match(name)) {
        return latin;
    }

    let cjk: Vec<String> = line
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '，' | '、' | ';' | '；'))
        .map(|part| FOOTNOTE_MARKER.replace(part, "").to_string())
        .filter(|part| !part.is_empty())
        .collect();
    if cjk.len() >= 2 && cjk.iter().all(|name| CJK_NAME.is_match(name)) {
        return cjk;
    }

    Vec::new()
}

/// Text between a label match and the first stop match after it.
fn labelled_block(text: &str, label: &Regex, stop: &Regex) -> Option<String> {
    let label = label.find(text)?;
    let rest = &text[label.end()..];
    let end = stop.find(rest)?;
    Some(rest[..end.start()].to_string())
}

/// Body of a standalone "Abstract" heading line, up to the next heading.
fn standalone_abstract(text: &str) -> Option<String> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    lines.find(|line| {
        let bare = line.trim_end_matches([':', '：']).trim().to_lowercase();
        bare == "abstract" || bare == "摘要"
    })?;

    let body: Vec<&str> = lines
        .take(ABSTRACT_FALLBACK_LINES)
        .take_while(|line| parse_heading(line).is_none() && !KEYWORD_LABEL.is_match(line))
        .collect();
    Some(body.join(" "))
}

fn accept_abstract(candidate: &str) -> std::result::Result<String, String> {
    let collapsed = collapse_whitespace(candidate);
    let stripped = collapse_whitespace(&CITATION_MARKER.replace_all(&collapsed, ""));
    let len = stripped.chars().count();
    if len <= MIN_ABSTRACT_CHARS {
        return Err(format!("abstract candidate too short ({} chars)", len));
    }
    Ok(truncate_chars(&stripped, MAX_ABSTRACT_CHARS))
}

fn is_keyword(entry: &str) -> bool {
    let len = entry.chars().count();
    if len == 0 || len >= MAX_KEYWORD_CHARS {
        return false;
    }
    // a lone letter ("A, B, C") is a keyword, a lone symbol is not
    len > 1 || entry.chars().all(char::is_alphanumeric)
}

/// Keep the first occurrence of each entry, comparing case- and
/// whitespace-insensitively, up to `cap` entries.
pub(crate) fn dedupe(entries: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(collapse_whitespace(entry).to_lowercase()))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYNTHETIC: &str = "Abstract: This paper studies X. It shows Y and Z in detail for at least fifty characters total.\nKeywords: alpha, beta, gamma\n1. Introduction";

    #[test]
    fn test_abstract_and_keywords_from_labels() {
        let extractor = MetadataExtractor::new();
        let abstract_text = extractor.abstract_text(SYNTHETIC).unwrap_or_default();
        assert!(abstract_text.contains("This paper studies X"));
        assert!(!abstract_text.contains("Keywords"));

        assert_eq!(
            extractor.keywords(SYNTHETIC),
            Field::Found(vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string()
            ])
        );
    }

    #[test]
    fn test_title_rules() {
        let extractor = MetadataExtractor::new();
        let text = "2024\nabc\nAbstract shows things\nreviewer@example.org\nGraph Methods for Citation Analysis\nAlice Smith";
        assert_eq!(
            extractor.title(text),
            Field::Found("Graph Methods for Citation Analysis".to_string())
        );

        assert_eq!(extractor.title("基于图的文献分析方法"), Field::Found("基于图的文献分析方法".to_string()));
        assert_eq!(extractor.title("1. Introduction\n-- -- --"), Field::NotFound);
        assert_eq!(extractor.title(""), Field::NotFound);
    }

    #[test]
    fn test_title_only_scans_first_lines() {
        let extractor = MetadataExtractor::new();
        let mut text = "12\n".repeat(10);
        text.push_str("A Late Title Line");
        assert_eq!(extractor.title(&text), Field::NotFound);
    }

    #[test]
    fn test_authors_above_email() {
        let extractor = MetadataExtractor::new();
        let text = "Deep Parsing of Papers\nAlice Smith1, Bob Jones*\nDepartment of Computing, Example University\nalice@cs.example.edu, bob@cs.example.edu\nAbstract: ...";
        let authors = extractor
            .authors(text, Some("Deep Parsing of Papers"))
            .unwrap_or_default();
        assert_eq!(authors, vec!["Alice Smith".to_string(), "Bob Jones".to_string()]);
    }

    #[test]
    fn test_authors_on_email_line() {
        let extractor = MetadataExtractor::new();
        let text = "SOME TITLE HERE\nAda Lovelace (ada@math.example.edu)\nAbstract: short";
        let authors = extractor.authors(text, Some("SOME TITLE HERE")).unwrap_or_default();
        assert_eq!(authors, vec!["Ada Lovelace".to_string()]);
    }

    #[test]
    fn test_authors_from_name_runs() {
        let extractor = MetadataExtractor::new();
        let text = "A Title For Testing\nGrace Hopper, Alan Turing, Grace Hopper\n张三 李四\n引言";
        let authors = extractor.authors(text, None).unwrap_or_default();
        assert_eq!(
            authors,
            vec![
                "Grace Hopper".to_string(),
                "Alan Turing".to_string(),
                "张三".to_string(),
                "李四".to_string()
            ]
        );
    }

    #[test]
    fn test_authors_capped_and_missing() {
        let extractor = MetadataExtractor::new();
        let mut names = Vec::new();
        for last in ["Lee", "Kim", "Roe"] {
            for first in ["Ann", "Ben", "Cat", "Dan", "Eve"] {
                names.push(format!("{} {}", first, last));
            }
        }
        let text = format!("{}\nteam@lab.example.edu", names.join(", "));
        let authors = extractor.authors(&text, None).unwrap_or_default();
        assert_eq!(authors.len(), MAX_AUTHORS);

        assert_eq!(extractor.authors("no names here", None), Field::NotFound);
    }

    #[test]
    fn test_abstract_chinese_label() {
        let extractor = MetadataExtractor::new();
        let body = "本文研究了学术论文的结构化抽取问题，提出了一种基于规则的章节识别方法，并在多个数据集上验证了其有效性和鲁棒性，结果表明该方法优于基线。";
        let text = format!("摘要：{}\n关键词：抽取；论文；结构\n一、引言", body);
        assert_eq!(extractor.abstract_text(&text), Field::Found(body.to_string()));
        assert_eq!(
            extractor.keywords(&text).unwrap_or_default(),
            vec!["抽取".to_string(), "论文".to_string(), "结构".to_string()]
        );
    }

    #[test]
    fn test_abstract_strips_citations_and_caps() {
        let extractor = MetadataExtractor::new();
        let long = "word ".repeat(600);
        let text = format!("Abstract: Prior work [1] and [2, 3] is extended. {}\nKeywords: x", long);
        let abstract_text = extractor.abstract_text(&text).unwrap_or_default();
        assert!(abstract_text.starts_with("Prior work and is extended."));
        assert_eq!(abstract_text.chars().count(), MAX_ABSTRACT_CHARS);
    }

    #[test]
    fn test_abstract_too_short_is_rejected() {
        let extractor = MetadataExtractor::new();
        let text = "Abstract: Too short.\nKeywords: a, b";
        assert!(matches!(extractor.abstract_text(text), Field::Rejected(_)));
        assert_eq!(extractor.abstract_text("no labels at all"), Field::NotFound);
    }

    #[test]
    fn test_abstract_standalone_heading() {
        let extractor = MetadataExtractor::new();
        let text = "Title Of Paper\nAbstract\nWe present a parser for scholarly documents\nthat recovers section trees from flat text streams.\nMETHODS\nBody";
        let abstract_text = extractor.abstract_text(text).unwrap_or_default();
        assert_eq!(
            abstract_text,
            "We present a parser for scholarly documents that recovers section trees from flat text streams."
        );
    }

    #[test]
    fn test_keyword_filters() {
        let extractor = MetadataExtractor::new();
        let text = "Index Terms—A, B, C, -, graph theory., Graph Theory, this entry is far too long to be a keyword\n1. Introduction";
        assert_eq!(
            extractor.keywords(text).unwrap_or_default(),
            vec!["A", "B", "C", "graph theory"]
        );

        assert_eq!(extractor.keywords("no label here"), Field::NotFound);
        assert!(matches!(
            extractor.keywords("Keywords: -\n1. Introduction"),
            Field::Rejected(_)
        ));
    }

    #[test]
    fn test_keywords_capped() {
        let extractor = MetadataExtractor::new();
        let list: Vec<String> = (0..15).map(|i| format!("topic{}", i)).collect();
        let text = format!("Keywords: {}\n2. Method", list.join(", "));
        assert_eq!(extractor.keywords(&text).unwrap_or_default().len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_publish_date() {
        let extractor = MetadataExtractor::new();
        assert_eq!(
            extractor.publish_date("收稿日期：2023年 5月 12日"),
            Field::Found("2023年 5月 12日".to_string())
        );
        assert_eq!(
            extractor.publish_date("Received 2022/11/03; accepted March 3, 2023"),
            Field::Found("2022/11/03".to_string())
        );
        assert_eq!(
            extractor.publish_date("Published: January 15, 2024"),
            Field::Found("January 15, 2024".to_string())
        );
        assert_eq!(extractor.publish_date("no date"), Field::NotFound);
    }

    #[test]
    fn test_source() {
        let extractor = MetadataExtractor::new();
        assert_eq!(
            extractor.source("In Proceedings of the 2023 ACM Symposium, pages 1-10"),
            Field::Found("the 2023 ACM Symposium".to_string())
        );
        assert_eq!(
            extractor.source("Journal of Machine Learning Research\n2021"),
            Field::Found("Machine Learning Research".to_string())
        );
        assert_eq!(
            extractor.source("Presented at the INTERNATIONAL Conference"),
            Field::Found("INTERNATIONAL Conference".to_string())
        );
        assert_eq!(extractor.source("nothing"), Field::NotFound);
    }

    #[test]
    fn test_apply_to_document() {
        let extractor = MetadataExtractor::new();
        let mut doc = ParsedDocument::new();
        extractor.extract(SYNTHETIC).apply_to(&mut doc);

        assert_eq!(doc.keywords.len(), 3);
        assert_eq!(doc.origins.keywords, FieldOrigin::Pattern);
        assert_eq!(doc.origins.abstract_text, FieldOrigin::Pattern);
        assert!(doc.title.is_empty());
        assert_eq!(doc.origins.title, FieldOrigin::Missing);
    }
}

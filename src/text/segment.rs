//! Section segmentation over cleaned document lines.

use crate::model::{NumberToken, Section};

use super::normalize::TextNormalizer;
use super::numbering::{level_of, parse_heading, parse_relaxed_heading};

/// Limits applied while segmenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLimits {
    /// Buffered body length (chars) at which a section is emitted early
    pub split_threshold_chars: usize,

    /// Maximum sections kept, earliest first
    pub max_sections: usize,
}

impl Default for SegmentLimits {
    fn default() -> Self {
        Self {
            split_threshold_chars: 3000,
            max_sections: 20,
        }
    }
}

/// Where the scanner is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Looking for headings, no open section
    Scanning,
    /// Inside the abstract; headings are not detected
    InAbstract,
    /// Collecting the body of an open section
    InSection,
}

/// Section being accumulated.
struct OpenSection {
    number: NumberToken,
    title: String,
    content: String,
}

impl OpenSection {
    fn new(number: NumberToken, title: String) -> Self {
        Self {
            number,
            title,
            content: String::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(line);
    }

    fn content_chars(&self) -> usize {
        self.content.chars().count()
    }

    fn into_section(self) -> Section {
        let mut section = Section::new(Some(self.number), self.title);
        section.content = self.content;
        section
    }
}

/// Splits cleaned document text into a flat, ordered section list.
///
/// Levels are filled in; parents are left for
/// [`link_parents`](super::link_parents).
pub struct SectionSegmenter<'a> {
    normalizer: &'a TextNormalizer,
    limits: SegmentLimits,
}

impl<'a> SectionSegmenter<'a> {
    /// Create a segmenter that cleans bodies with `normalizer`.
    pub fn new(normalizer: &'a TextNormalizer, limits: SegmentLimits) -> Self {
        Self { normalizer, limits }
    }

    /// Segment `text` into sections.
    pub fn segment(&self, text: &str) -> Vec<Section> {
        let mut sections = self.scan(text);
        let mut relaxed = false;

        if sections.is_empty() {
            sections = self.scan_relaxed(text);
            relaxed = true;
            if !sections.is_empty() {
                log::debug!(
                    "No formatted headings found; relaxed pass found {} sections",
                    sections.len()
                );
            }
        }

        sections.retain(|s| s.title.chars().count() > 1);

        for section in &mut sections {
            section.level = if relaxed {
                1
            } else {
                level_of(section.number.as_ref())
            };
            section.content = self.normalizer.clean_content(&section.content);
        }

        sections.truncate(self.limits.max_sections);
        sections
    }

    /// Main pass: the abstract-aware state machine.
    fn scan(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut state = ScanState::Scanning;
        let mut current: Option<OpenSection> = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match state {
                ScanState::InAbstract => {
                    if ends_abstract(line) {
                        state = ScanState::Scanning;
                    }
                    continue;
                }
                _ if starts_abstract(line) => {
                    emit(&mut sections, current.take());
                    state = ScanState::InAbstract;
                    continue;
                }
                _ => {}
            }

            if let Some((number, title)) = parse_heading(line) {
                emit(&mut sections, current.take());
                current = Some(OpenSection::new(number, title));
                state = ScanState::InSection;
                continue;
            }

            if let Some(open) = current.as_mut() {
                open.push_line(line);
                if open.content_chars() > self.limits.split_threshold_chars {
                    emit(&mut sections, current.take());
                    state = ScanState::Scanning;
                }
            }
        }

        emit(&mut sections, current.take());
        sections
    }

    /// Fallback pass for documents without formatted headings: every line
    /// opening with a number starts a section.
    fn scan_relaxed(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current: Option<OpenSection> = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some((number, title)) = parse_relaxed_heading(line) {
                emit(&mut sections, current.take());
                current = Some(OpenSection::new(number, title));
            } else if let Some(open) = current.as_mut() {
                open.push_line(line);
                if open.content_chars() > self.limits.split_threshold_chars {
                    emit(&mut sections, current.take());
                }
            }
        }

        emit(&mut sections, current.take());
        sections
    }
}

fn emit(sections: &mut Vec<Section>, open: Option<OpenSection>) {
    if let Some(open) = open {
        if !open.title.is_empty() {
            sections.push(open.into_section());
        }
    }
}

/// A line that labels the abstract: the bare word, or the word followed by
/// a separator and the first words of the abstract.
fn starts_abstract(line: &str) -> bool {
    let lower = line.to_lowercase();
    let label = lower.trim_end_matches([':', '：', '.']).trim_end();
    if label == "abstract" || label == "摘要" {
        return true;
    }
    ["abstract:", "abstract：", "abstract.", "abstract—", "摘要：", "摘要:"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

fn ends_abstract(line: &str) -> bool {
    let lower = line.to_lowercase();
    ["keywords", "关键词", "introduction", "引言"]
        .iter()
        .any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Vec<Section> {
        let normalizer = TextNormalizer::default();
        SectionSegmenter::new(&normalizer, SegmentLimits::default()).segment(text)
    }

    fn numbers(sections: &[Section]) -> Vec<&str> {
        sections.iter().filter_map(|s| s.number_str()).collect()
    }

    #[test]
    fn test_basic_sections() {
        let text = "1. Introduction\nWe study parsing.\nIt is hard.\n2. Method\nWe use rules.\n2.1 Details\nMore rules.";
        let sections = segment(text);

        assert_eq!(numbers(&sections), vec!["1", "2", "2.1"]);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].content, "We study parsing. It is hard.");
        assert_eq!(
            sections.iter().map(|s| s.level).collect::<Vec<_>>(),
            vec![1, 1, 2]
        );
        assert!(sections.iter().all(|s| s.parent.is_none()));
    }

    #[test]
    fn test_abstract_is_not_section_content() {
        let text = "A Title Line\nAbstract\n1. This looks numbered but is abstract text\nKeywords: a, b\n1. Introduction\nBody.";
        let sections = segment(text);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].content, "Body.");
    }

    #[test]
    fn test_abstract_ends_on_introduction_line() {
        // The line that closes the abstract is consumed, not a heading.
        let text = "Abstract: short\n1. Introduction\nintro body\n2. Related Work\nrelated body";
        let sections = segment(text);
        assert_eq!(numbers(&sections), vec!["2"]);
    }

    #[test]
    fn test_abstract_word_inside_section_is_content() {
        let text = "1. Background\nWe build an abstract syntax tree.\nThen we walk it.\n2. Results\nGood.";
        let sections = segment(text);
        assert_eq!(numbers(&sections), vec!["1", "2"]);
        assert!(sections[0].content.contains("abstract syntax tree"));
    }

    #[test]
    fn test_abstract_after_heading_like_front_matter() {
        // The author line reads as a lettered heading; the abstract must
        // still be skipped rather than appended to it.
        let text = "Structure Recovery for Papers\nJ. Smith, K. Lee\nAbstract\n\
                    In this work we study things at length and detail.\n\
                    Keywords: a, b\n1. Introduction\nBody.";
        let sections = segment(text);

        assert!(sections.iter().all(|s| !s.content.contains("In this work")));
        assert!(sections.iter().all(|s| !s.content.contains("Keywords")));
        let intro = sections.iter().find(|s| s.title == "Introduction").unwrap();
        assert_eq!(intro.content, "Body.");
    }

    #[test]
    fn test_abstract_after_banner_line() {
        let text = "PREPRINT\n摘要：本文研究论文结构。\n关键词：结构\n1. Introduction\nBody.";
        let sections = segment(text);

        assert!(sections.iter().all(|s| !s.content.contains("本文研究")));
        assert_eq!(sections.last().unwrap().title, "Introduction");
    }

    #[test]
    fn test_abstract_label_shapes() {
        assert!(starts_abstract("Abstract"));
        assert!(starts_abstract("ABSTRACT:"));
        assert!(starts_abstract("Abstract: We present"));
        assert!(starts_abstract("Abstract. We present"));
        assert!(starts_abstract("摘要"));
        assert!(starts_abstract("摘要：本文"));
        assert!(!starts_abstract("We build an abstract syntax tree."));
        assert!(!starts_abstract("Abstraction layers"));
        assert!(!starts_abstract("An abstract model of the parser"));
    }

    #[test]
    fn test_abstract_word_after_split_keeps_headings() {
        let filler = "lorem ipsum dolor sit amet ".repeat(4);
        let mut text = String::from("1. Long\n");
        for _ in 0..40 {
            text.push_str(&filler);
            text.push('\n');
        }
        text.push_str("we then use an abstract syntax tree\n2. Next\nshort body\n3. Last\nend");

        let sections = segment(&text);
        assert_eq!(numbers(&sections), vec!["1", "2", "3"]);
        assert_eq!(sections[1].content, "short body");
    }

    #[test]
    fn test_title_only_sections_are_kept() {
        let text = "1. Contents\n2. Overview\nBody text.";
        let sections = segment(text);
        assert_eq!(numbers(&sections), vec!["1", "2"]);
        assert!(sections[0].content.is_empty());
    }

    #[test]
    fn test_long_section_is_split_and_tail_dropped() {
        let filler = "lorem ipsum dolor sit amet ".repeat(4);
        let mut text = String::from("1. Long\n");
        for _ in 0..40 {
            text.push_str(&filler);
            text.push('\n');
        }
        text.push_str("2. Next\nshort body");

        let sections = segment(&text);
        assert_eq!(numbers(&sections), vec!["1", "2"]);
        let first = sections[0].content.chars().count();
        assert!(first > 3000 && first <= 5000, "got {}", first);
        assert_eq!(sections[1].content, "short body");
    }

    #[test]
    fn test_relaxed_fallback() {
        let text = "Some preface\n1 Overview\nbody one\n2 Findings\nbody two";
        let sections = segment(text);
        assert_eq!(numbers(&sections), vec!["1", "2"]);
        assert!(sections.iter().all(|s| s.level == 1));
        assert_eq!(sections[1].content, "body two");
    }

    #[test]
    fn test_no_headings_yields_empty() {
        let sections = segment("just prose\nwith no numbering at all\n");
        assert!(sections.is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_truncates_to_max_sections() {
        let text: String = (1..=30)
            .map(|i| format!("{}. Heading {}\nbody {}\n", i, i, i))
            .collect();
        let sections = segment(&text);
        assert_eq!(sections.len(), 20);
        assert_eq!(sections[0].number_str(), Some("1"));
        assert_eq!(sections[19].number_str(), Some("20"));
    }

    #[test]
    fn test_mixed_schemes() {
        let text = "一、引言\n研究背景。\n二、方法\nA. Setup\ndetails\nMETHODS\ntext";
        let sections = segment(text);
        assert_eq!(numbers(&sections), vec!["1", "2", "A", "METHODS"]);
        assert_eq!(
            sections.iter().map(|s| s.level).collect::<Vec<_>>(),
            vec![1, 1, 2, 1]
        );
    }
}

//! Heading number recognition and hierarchy classification.
//!
//! A heading line such as `2.1 Details`, `(3) Setup`, `IV. Results`,
//! `三、实验` or `METHODS` is split into a canonical [`NumberToken`] and the
//! remaining title. Patterns are tried strongest first because the weaker
//! ones (single letters, capitalized words) would otherwise claim lines the
//! stronger ones should own.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{NumberScheme, NumberToken};

lazy_static! {
    /// `1. Intro`, `1.2. Scope`, and multi-level `2.1 Details`
    static ref DOTTED_ARABIC: Regex =
        Regex::new(r"^(\d{1,3}(?:\.\d{1,3})*)\.\s+(\S.*)$").unwrap();
    static ref DOTTED_ARABIC_BARE: Regex =
        Regex::new(r"^(\d{1,3}(?:\.\d{1,3})+)\s+(\S.*)$").unwrap();
    /// `(1) Setup`, `[2] Data`, `（3）实验`
    static ref BRACKETED_ARABIC: Regex =
        Regex::new(r"^(?:\((\d{1,3})\)|\[(\d{1,3})\]|（(\d{1,3})）)\s*(\S.*)$").unwrap();
    static ref ROMAN: Regex = Regex::new(r"^([IVXLCDM]+)\.\s+(\S.*)$").unwrap();
    static ref CHINESE: Regex =
        Regex::new(r"^([一二三四五六七八九十]+)[、.．]\s*(\S.*)$").unwrap();
    /// Whole-line upper-case word, optionally `WORD: title`
    static ref UPPER_WORD: Regex =
        Regex::new(r"^([A-Z]{3,})(?:\s*[:：]\s*(.*))?$").unwrap();
    static ref LETTER: Regex =
        Regex::new(r"^[\(\[]?([A-Za-z])[\)\]]?\.\s+(\S.*)$").unwrap();
    /// Relaxed fallback: `3 Results`, `3.Results`
    static ref RELAXED_DIGIT: Regex = Regex::new(r"^(\d+)[\s.]+(\S.*)$").unwrap();
}

/// Minimum title length (in characters) for a line to count as a heading.
pub const MIN_TITLE_CHARS: usize = 2;

/// Split a trimmed line into its numbering token and title.
///
/// Returns `(None, line)` when no numbering scheme matches.
///
/// # Example
///
/// ```
/// use paperparse::text::parse_number;
///
/// let (token, title) = parse_number("一、引言");
/// assert_eq!(token.unwrap().as_str(), "1");
/// assert_eq!(title, "引言");
/// ```
pub fn parse_number(line: &str) -> (Option<NumberToken>, String) {
    let line = line.trim();

    if let Some(caps) = DOTTED_ARABIC
        .captures(line)
        .or_else(|| DOTTED_ARABIC_BARE.captures(line))
    {
        return (
            Some(NumberToken::arabic(&caps[1])),
            caps[2].trim().to_string(),
        );
    }

    if let Some(caps) = BRACKETED_ARABIC.captures(line) {
        let digits = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        return (
            Some(NumberToken::arabic(digits)),
            caps[4].trim().to_string(),
        );
    }

    if let Some(caps) = ROMAN.captures(line) {
        if is_valid_roman(&caps[1]) {
            return (
                Some(NumberToken::new(&caps[1], NumberScheme::Roman)),
                caps[2].trim().to_string(),
            );
        }
    }

    if let Some(caps) = CHINESE.captures(line) {
        let value = chinese_numeral_value(&caps[1]);
        if value > 0 {
            return (
                Some(NumberToken::new(value.to_string(), NumberScheme::Chinese)),
                caps[2].trim().to_string(),
            );
        }
    }

    if let Some(caps) = UPPER_WORD.captures(line) {
        let word = caps[1].to_string();
        let title = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| word.clone());
        return (Some(NumberToken::new(word, NumberScheme::Acronym)), title);
    }

    if let Some(caps) = LETTER.captures(line) {
        return (
            Some(NumberToken::new(&caps[1], NumberScheme::Letter)),
            caps[2].trim().to_string(),
        );
    }

    (None, line.to_string())
}

/// Heading-mode recognition: a numbering token plus a title of at least
/// [`MIN_TITLE_CHARS`] characters.
pub fn parse_heading(line: &str) -> Option<(NumberToken, String)> {
    match parse_number(line) {
        (Some(token), title) if title.chars().count() >= MIN_TITLE_CHARS => Some((token, title)),
        _ => None,
    }
}

/// Relaxed recognition used when a document has no formatted headings:
/// any line starting with digits followed by whitespace or a period.
pub fn parse_relaxed_heading(line: &str) -> Option<(NumberToken, String)> {
    let caps = RELAXED_DIGIT.captures(line.trim())?;
    let title = caps[2].trim().to_string();
    if title.chars().count() < MIN_TITLE_CHARS {
        return None;
    }
    Some((NumberToken::arabic(&caps[1]), title))
}

/// Nesting depth of a heading token.
///
/// Dotted numeric paths nest by segment count; plain numbers, Roman
/// numerals and upper-case words are top level; single letters sit one
/// level below.
pub fn level_of(token: Option<&NumberToken>) -> u32 {
    let Some(token) = token else {
        return 1;
    };
    let value = token.as_str();

    if token.is_numeric_path() {
        return value.split('.').count() as u32;
    }
    if is_valid_roman(value) {
        return 1;
    }
    let mut chars = value.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_alphabetic() {
            return 2;
        }
    }
    if value.chars().count() > 2 && value.chars().all(|c| c.is_uppercase()) {
        return 1;
    }
    1
}

/// Value of a Roman digit.
fn roman_digit(c: char) -> Option<u32> {
    match c {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Check that `s` is an upper-case Roman numeral obeying the subtractive
/// rule: scanning right to left, a digit smaller than its right neighbour
/// must be I, X or C and at most ten times smaller. Numerals that only add
/// up under a non-canonical spelling (`IIX`, `VX`) are rejected.
pub fn is_valid_roman(s: &str) -> bool {
    roman_value(s).is_some()
}

/// Decimal value of an upper-case Roman numeral, if valid.
pub fn roman_value(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }

    let mut total: u32 = 0;
    let mut prev: u32 = 0;
    for c in s.chars().rev() {
        let value = roman_digit(c)?;
        if value < prev {
            if !matches!(value, 1 | 10 | 100) || value * 10 < prev {
                return None;
            }
            total = total.checked_sub(value)?;
        } else {
            total += value;
        }
        prev = value;
    }

    (total > 0 && total < 4000 && to_roman(total) == s).then_some(total)
}

/// Canonical Roman spelling of `n` (1..=3999).
fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// Decimal value of a Chinese numeral between 一 (1) and 十九 (19).
///
/// Returns 0 for anything outside that range.
pub fn chinese_numeral_value(s: &str) -> u32 {
    fn digit(c: char) -> Option<u32> {
        match c {
            '一' => Some(1),
            '二' => Some(2),
            '三' => Some(3),
            '四' => Some(4),
            '五' => Some(5),
            '六' => Some(6),
            '七' => Some(7),
            '八' => Some(8),
            '九' => Some(9),
            '十' => Some(10),
            _ => None,
        }
    }

    let chars: Vec<char> = s.chars().collect();
    match chars[..] {
        [c] => digit(c).unwrap_or(0),
        ['十', c] => match digit(c) {
            Some(d) if d < 10 => 10 + d,
            _ => 0,
        },
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> (Option<String>, String) {
        let (token, title) = parse_number(line);
        (token.map(|t| t.value), title)
    }

    #[test]
    fn test_parse_arabic() {
        assert_eq!(
            parsed("1. Introduction"),
            (Some("1".to_string()), "Introduction".to_string())
        );
        assert_eq!(
            parsed("1.1. Background"),
            (Some("1.1".to_string()), "Background".to_string())
        );
        assert_eq!(
            parsed("2.1 Details"),
            (Some("2.1".to_string()), "Details".to_string())
        );
        assert_eq!(
            parsed("(3) Setup"),
            (Some("3".to_string()), "Setup".to_string())
        );
        assert_eq!(
            parsed("[4] Data"),
            (Some("4".to_string()), "Data".to_string())
        );
    }

    #[test]
    fn test_parse_roman() {
        let (token, title) = parse_number("I. Background");
        let token = token.unwrap();
        assert_eq!(token.as_str(), "I");
        assert_eq!(token.scheme, NumberScheme::Roman);
        assert_eq!(title, "Background");

        assert_eq!(parsed("XIV. Appendix").0, Some("XIV".to_string()));
    }

    #[test]
    fn test_invalid_roman_falls_through() {
        // "IC" breaks the subtractive rule; the letter pattern does not apply
        // to multi-letter prefixes either.
        assert_eq!(parsed("IC. Something").0, None);
        assert!(!is_valid_roman("VX"));
        assert!(!is_valid_roman("IIX"));
        assert!(is_valid_roman("MCMXCIV"));
        assert_eq!(roman_value("MCMXCIV"), Some(1994));
        assert_eq!(roman_value("IX"), Some(9));
    }

    #[test]
    fn test_parse_chinese() {
        assert_eq!(
            parsed("一、引言"),
            (Some("1".to_string()), "引言".to_string())
        );
        assert_eq!(
            parsed("十二．相关工作"),
            (Some("12".to_string()), "相关工作".to_string())
        );
        assert_eq!(chinese_numeral_value("十"), 10);
        assert_eq!(chinese_numeral_value("十九"), 19);
        assert_eq!(chinese_numeral_value("二十"), 0);
        // unmapped numerals are ordinary text
        assert_eq!(parsed("二十、结论").0, None);
    }

    #[test]
    fn test_parse_upper_word() {
        let (token, title) = parse_number("INTRODUCTION");
        let token = token.unwrap();
        assert_eq!(token.as_str(), "INTRODUCTION");
        assert_eq!(token.scheme, NumberScheme::Acronym);
        assert_eq!(title, "INTRODUCTION");

        assert_eq!(
            parsed("CNN: convolutional baseline"),
            (Some("CNN".to_string()), "convolutional baseline".to_string())
        );
        // mid-sentence acronyms are not headings
        assert_eq!(parsed("CNN models perform well").0, None);
    }

    #[test]
    fn test_parse_letter() {
        assert_eq!(
            parsed("A. Proofs"),
            (Some("A".to_string()), "Proofs".to_string())
        );
        assert_eq!(
            parsed("(b). Extra runs"),
            (Some("b".to_string()), "Extra runs".to_string())
        );
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(parsed("plain text"), (None, "plain text".to_string()));
        assert_eq!(parsed("2019 was a good year").0, None);
    }

    #[test]
    fn test_heading_mode_requires_title() {
        assert!(parse_heading("1. X").is_none());
        assert!(parse_heading("1. Xy").is_some());
        assert!(parse_heading("plain text").is_none());
    }

    #[test]
    fn test_relaxed_heading() {
        let (token, title) = parse_relaxed_heading("3 Results").unwrap();
        assert_eq!(token.as_str(), "3");
        assert_eq!(title, "Results");
        assert!(parse_relaxed_heading("3.Results").is_some());
        assert!(parse_relaxed_heading("Results 3").is_none());
    }

    #[test]
    fn test_level_of_dotted() {
        for (value, level) in [("4", 1), ("2.3", 2), ("2.3.1", 3), ("1.2.3.4", 4)] {
            assert_eq!(level_of(Some(&NumberToken::arabic(value))), level, "{}", value);
        }
    }

    #[test]
    fn test_level_of_other_schemes() {
        assert_eq!(level_of(None), 1);
        assert_eq!(level_of(Some(&NumberToken::new("IV", NumberScheme::Roman))), 1);
        assert_eq!(level_of(Some(&NumberToken::new("b", NumberScheme::Letter))), 2);
        assert_eq!(
            level_of(Some(&NumberToken::new("METHODS", NumberScheme::Acronym))),
            1
        );
        assert_eq!(level_of(Some(&NumberToken::new("x-1", NumberScheme::None))), 1);
    }
}

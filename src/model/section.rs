//! Section-level types: numbering tokens and sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The numbering scheme a heading token was recognized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberScheme {
    /// `1.`, `2.1`, `(3)`, `[4]`
    Arabic,
    /// `IV.`
    Roman,
    /// `三、`, `十二.`
    Chinese,
    /// `A.`, `(b).`
    Letter,
    /// All-uppercase heading words such as `INTRODUCTION`
    Acronym,
    /// Undecorated text
    #[default]
    None,
}

impl NumberScheme {
    /// Short lowercase tag for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberScheme::Arabic => "arabic",
            NumberScheme::Roman => "roman",
            NumberScheme::Chinese => "chinese",
            NumberScheme::Letter => "letter",
            NumberScheme::Acronym => "acronym",
            NumberScheme::None => "none",
        }
    }
}

/// Canonical form of a heading's numbering prefix.
///
/// Two tokens are equal when their canonical values are equal, whatever
/// scheme produced them: `一、` and `1.` both canonicalize to `"1"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberToken {
    /// Canonical string ("1.1", "IV", "A", "METHODS")
    pub value: String,

    /// Scheme the token was recognized in
    pub scheme: NumberScheme,
}

impl NumberToken {
    /// Create a new token.
    pub fn new(value: impl Into<String>, scheme: NumberScheme) -> Self {
        Self {
            value: value.into(),
            scheme,
        }
    }

    /// Create an Arabic-scheme token.
    pub fn arabic(value: impl Into<String>) -> Self {
        Self::new(value, NumberScheme::Arabic)
    }

    /// Canonical value.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Whether the value is a dotted-decimal path with more than one segment.
    pub fn is_dotted(&self) -> bool {
        self.value.contains('.') && self.is_numeric_path()
    }

    /// Whether every dot-separated segment is a non-empty run of ASCII digits.
    pub fn is_numeric_path(&self) -> bool {
        !self.value.is_empty()
            && self
                .value
                .split('.')
                .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_digit()))
    }

    /// Whether this token's dotted value sits strictly under `ancestor`,
    /// e.g. `2.1.3` under `2` or `2.1`.
    pub fn is_nested_under(&self, ancestor: &NumberToken) -> bool {
        self.is_dotted()
            && self
                .value
                .strip_prefix(ancestor.value.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

impl PartialEq for NumberToken {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for NumberToken {}

impl Hash for NumberToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for NumberToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A detected document section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Numbering token, if the heading carried one
    pub number: Option<NumberToken>,

    /// Heading title (at least two characters)
    pub title: String,

    /// Cleaned body text
    pub content: String,

    /// Nesting depth (1 = top level)
    pub level: u32,

    /// Number of the enclosing section, by value
    pub parent: Option<NumberToken>,
}

impl Section {
    /// Create a new top-level section with empty content.
    pub fn new(number: Option<NumberToken>, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            content: String::new(),
            level: 1,
            parent: None,
        }
    }

    /// Canonical number as a string slice, if any.
    pub fn number_str(&self) -> Option<&str> {
        self.number.as_ref().map(NumberToken::as_str)
    }

    /// Parent number as a string slice, if any.
    pub fn parent_str(&self) -> Option<&str> {
        self.parent.as_ref().map(NumberToken::as_str)
    }

    /// Heading as it would be printed: number and title.
    pub fn heading(&self) -> String {
        match &self.number {
            Some(number) if number.value != self.title => format!("{} {}", number, self.title),
            _ => self.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_equality_ignores_scheme() {
        let a = NumberToken::new("1", NumberScheme::Chinese);
        let b = NumberToken::arabic("1");
        assert_eq!(a, b);
        assert_ne!(a, NumberToken::arabic("2"));
    }

    #[test]
    fn test_token_nesting() {
        let child = NumberToken::arabic("2.1");
        assert!(child.is_nested_under(&NumberToken::arabic("2")));
        assert!(!child.is_nested_under(&NumberToken::arabic("1")));
        // "21.1" must not nest under "2"
        assert!(!NumberToken::arabic("21.1").is_nested_under(&NumberToken::arabic("2")));
        assert!(!NumberToken::arabic("2").is_nested_under(&NumberToken::arabic("2")));
    }

    #[test]
    fn test_numeric_path() {
        assert!(NumberToken::arabic("1.2.3").is_numeric_path());
        assert!(NumberToken::arabic("4").is_numeric_path());
        assert!(!NumberToken::arabic("4").is_dotted());
        assert!(!NumberToken::new("IV", NumberScheme::Roman).is_numeric_path());
        assert!(!NumberToken::arabic("1..2").is_numeric_path());
    }

    #[test]
    fn test_section_heading() {
        let section = Section::new(Some(NumberToken::arabic("3")), "Conclusion");
        assert_eq!(section.heading(), "3 Conclusion");

        let caps = Section::new(
            Some(NumberToken::new("METHODS", NumberScheme::Acronym)),
            "METHODS",
        );
        assert_eq!(caps.heading(), "METHODS");
    }
}

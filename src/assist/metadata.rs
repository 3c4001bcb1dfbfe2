//! Model-assisted title, author, abstract and keyword extraction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{complete_with_retry, strip_code_fence, TextCompletion};
use crate::error::{Error, Result};
use crate::model::{FieldOrigin, ParsedDocument};
use crate::text::metadata::{dedupe, MAX_ABSTRACT_CHARS, MAX_AUTHORS};
use crate::text::normalize::{collapse_whitespace, truncate_chars};

/// Maximum number of keywords kept from an assisted reply.
pub const MAX_ASSISTED_KEYWORDS: usize = 20;

/// Bibliographic fields supplied by the language model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistedMetadata {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: Vec<String>,
}

/// Prompt asking for the four fields as a JSON object.
pub fn metadata_prompt(sample: &str) -> String {
    format!(
        "Extract the bibliographic metadata of the academic paper below.\n\
         \n\
         Return a single JSON object with exactly these fields:\n\
         - \"title\": the paper title (string)\n\
         - \"authors\": author names (array of strings)\n\
         - \"abstract\": the abstract (string)\n\
         - \"keywords\": keywords (array of strings)\n\
         \n\
         Use an empty string or empty array for anything not present. \
         Return only the JSON, no explanation.\n\
         \n\
         Paper text:\n{}",
        sample
    )
}

/// Ask `client` for metadata using the first `sample_chars` characters of
/// the cleaned document text.
pub fn request_metadata(
    client: &dyn TextCompletion,
    text: &str,
    sample_chars: usize,
) -> Result<AssistedMetadata> {
    let sample = truncate_chars(text, sample_chars);
    let reply = complete_with_retry(client, &metadata_prompt(&sample))?;
    AssistedMetadata::parse_reply(&reply)
}

impl AssistedMetadata {
    /// Parse a model reply.
    ///
    /// Accepts fenced JSON, `abstract` or `abstract_text` keys, and author
    /// or keyword lists given either as arrays or as one delimited string.
    pub fn parse_reply(reply: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(strip_code_fence(reply))
            .map_err(|e| Error::Completion(format!("metadata reply is not JSON: {}", e)))?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::Completion("metadata reply is not a JSON object".to_string()))?;

        let text_field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(|s| collapse_whitespace(s))
                .unwrap_or_default()
        };
        let abstract_text = match text_field("abstract") {
            s if s.is_empty() => text_field("abstract_text"),
            s => s,
        };

        Ok(Self {
            title: text_field("title"),
            authors: object.get("authors").map(string_list).unwrap_or_default(),
            abstract_text,
            keywords: object.get("keywords").map(string_list).unwrap_or_default(),
        })
    }

    /// Whether the reply carried nothing usable.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.authors.is_empty()
            && self.abstract_text.is_empty()
            && self.keywords.is_empty()
    }

    /// Overlay non-empty fields on `doc`; empty fields keep the pattern
    /// values.
    pub fn merge_into(self, doc: &mut ParsedDocument) {
        if !self.title.is_empty() {
            doc.title = self.title;
            doc.origins.title = FieldOrigin::Assisted;
        }

        let authors = dedupe(self.authors, MAX_AUTHORS);
        if !authors.is_empty() {
            doc.authors = authors;
            doc.origins.authors = FieldOrigin::Assisted;
        }

        if !self.abstract_text.is_empty() {
            doc.abstract_text = truncate_chars(&self.abstract_text, MAX_ABSTRACT_CHARS);
            doc.origins.abstract_text = FieldOrigin::Assisted;
        }

        let keywords = dedupe(self.keywords, MAX_ASSISTED_KEYWORDS);
        if !keywords.is_empty() {
            doc.keywords = keywords;
            doc.origins.keywords = FieldOrigin::Assisted;
        }
    }
}

/// Non-empty trimmed strings from an array, or from a string split on
/// the usual list separators.
fn string_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::String(s) => s
            .split([',', ';', '，', '；', '、'])
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|s| collapse_whitespace(&s))
        .filter(|s| !s.is_empty())
        .collect()
}

//! Persistence-boundary record.
//!
//! Storage layers keep list- and tree-valued fields as JSON text columns.
//! [`PaperRecord`] is that flat shape; converting to and from it is the only
//! place where those fields are serialized or deserialized.

use serde::{Deserialize, Serialize};

use super::{FieldOrigins, ParsedDocument, Section};
use crate::error::Result;

/// Flat, storage-ready form of a [`ParsedDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    /// JSON array of strings
    pub authors: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// JSON array of strings
    pub keywords: String,
    /// JSON array of section objects
    pub sections: String,
    pub publish_date: String,
    pub source: String,
}

impl ParsedDocument {
    /// Serialize list-valued fields for storage.
    pub fn to_record(&self) -> Result<PaperRecord> {
        Ok(PaperRecord {
            title: self.title.clone(),
            authors: serde_json::to_string(&self.authors)?,
            abstract_text: self.abstract_text.clone(),
            keywords: serde_json::to_string(&self.keywords)?,
            sections: serde_json::to_string(&self.sections)?,
            publish_date: self.publish_date.clone(),
            source: self.source.clone(),
        })
    }
}

impl PaperRecord {
    /// Rebuild the typed document from a stored record.
    ///
    /// Empty columns read back as empty lists. Field provenance is not
    /// stored and comes back as missing.
    pub fn into_document(self) -> Result<ParsedDocument> {
        Ok(ParsedDocument {
            title: self.title,
            authors: decode_list(&self.authors)?,
            abstract_text: self.abstract_text,
            keywords: decode_list(&self.keywords)?,
            sections: decode_list::<Section>(&self.sections)?,
            publish_date: self.publish_date,
            source: self.source,
            origins: FieldOrigins::default(),
        })
    }
}

fn decode_list<T: serde::de::DeserializeOwned>(column: &str) -> Result<Vec<T>> {
    if column.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(column)?)
}

//! Intent catalog: canned responses keyed by intent tag.
//!
//! Parsed from the `intents.json` document used to train the classifier:
//!
//! ```json
//! {"intents": [{"tag": "migraine", "patterns": ["..."], "responses": ["..."]}]}
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One intent entry as it appears on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentEntry {
    pub tag: String,
    /// Training utterances. Kept for completeness; unused at inference time.
    #[serde(default)]
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub intents: Vec<IntentEntry>,
}

/// Read-only mapping from intent tag to its candidate responses.
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    entries: Vec<IntentEntry>,
    by_tag: HashMap<String, usize>,
}

impl IntentCatalog {
    /// Build a catalog. Every intent needs at least one response and tags must be unique.
    pub fn new(entries: Vec<IntentEntry>) -> Result<Self> {
        let mut by_tag = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if entry.responses.is_empty() {
                return Err(Error::invalid(
                    "intent catalog",
                    format!("intent {:?} has no responses", entry.tag),
                ));
            }
            if by_tag.insert(entry.tag.clone(), i).is_some() {
                return Err(Error::invalid(
                    "intent catalog",
                    format!("duplicate intent tag {:?}", entry.tag),
                ));
            }
        }
        Ok(Self { entries, by_tag })
    }

    pub fn from_document(doc: CatalogDocument) -> Result<Self> {
        Self::new(doc.intents)
    }

    /// Candidate responses for `tag`, or `None` if the tag is unknown.
    pub fn responses(&self, tag: &str) -> Option<&[String]> {
        self.by_tag
            .get(tag)
            .map(|&i| self.entries[i].responses.as_slice())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.tag.as_str())
    }
}

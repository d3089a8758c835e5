//! Fixed, index-aligned word and label lists.
//!
//! Both lists are ordered and distinct. The vocabulary defines the feature
//! vector layout; the label set defines the classifier output layout.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Ordered list of known word tokens. Position `i` is feature index `i`.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary, rejecting empty lists and duplicate words.
    pub fn new(words: Vec<String>) -> Result<Self> {
        let index = build_index("vocabulary", &words)?;
        Ok(Self { words, index })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Ordered list of intent identifiers, aligned with classifier output.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelSet {
    /// Build a label set, rejecting empty lists and duplicate labels.
    pub fn new(labels: Vec<String>) -> Result<Self> {
        let index = build_index("label set", &labels)?;
        Ok(Self { labels, index })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

fn build_index(artifact: &'static str, items: &[String]) -> Result<HashMap<String, usize>> {
    if items.is_empty() {
        return Err(Error::invalid(artifact, "empty list"));
    }

    let mut index = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if let Some(prev) = index.insert(item.clone(), i) {
            return Err(Error::invalid(
                artifact,
                format!("duplicate entry {item:?} at positions {prev} and {i}"),
            ));
        }
    }
    Ok(index)
}

//! Text normalization: word splitting, case folding, and noun lemmatization.
//!
//! The output tokens are compared verbatim against the vocabulary, so the
//! rules here must match the ones the vocabulary was built with. A mismatch
//! does not fail; it just produces empty feature vectors.

use std::collections::{HashMap, HashSet};

use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};
use tracing::warn;
use triage_core::Vocabulary;

/// Irregular plurals. Applied unless the surface form is itself a known lemma.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("appendices", "appendix"),
    ("bacteria", "bacterium"),
    ("calves", "calf"),
    ("children", "child"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("feet", "foot"),
    ("fungi", "fungus"),
    ("geese", "goose"),
    ("halves", "half"),
    ("indices", "index"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lice", "louse"),
    ("lives", "life"),
    ("men", "man"),
    ("mice", "mouse"),
    ("nuclei", "nucleus"),
    ("people", "person"),
    ("phenomena", "phenomenon"),
    ("prognoses", "prognosis"),
    ("stimuli", "stimulus"),
    ("teeth", "tooth"),
    ("vertebrae", "vertebra"),
    ("wives", "wife"),
    ("women", "woman"),
];

/// Regular noun suffix substitutions, tried in order.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// How letter case is treated before lemmatization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Lowercase every token.
    #[default]
    Fold,
    /// Keep tokens exactly as typed.
    Preserve,
}

/// English noun lemmatizer.
///
/// Suffix rules only fire when the resulting base form is a known lemma;
/// otherwise the word passes through unchanged.
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<&'static str, &'static str>,
    lexicon: HashSet<String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    /// Lemmatizer with only the irregular-plural table.
    pub fn new() -> Self {
        Self {
            exceptions: IRREGULAR_NOUNS.iter().copied().collect(),
            lexicon: HashSet::new(),
        }
    }

    /// Lemmatizer whose known lemmas are the given words.
    pub fn with_lexicon<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lemmatizer = Self::new();
        lemmatizer.lexicon.extend(words.into_iter().map(Into::into));
        lemmatizer
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }

    /// Reduce `word` to its base form.
    pub fn lemmatize(&self, word: &str) -> String {
        if self.is_known(word) {
            return word.to_string();
        }
        if let Some(base) = self.exceptions.get(word) {
            return (*base).to_string();
        }

        // Shortest known candidate wins; ties keep rule order.
        let mut best: Option<String> = None;
        for (suffix, replacement) in NOUN_SUFFIX_RULES {
            if word.len() <= suffix.len() || !word.ends_with(suffix) {
                continue;
            }
            let candidate = format!("{}{}", &word[..word.len() - suffix.len()], replacement);
            if self.is_known(&candidate)
                && best.as_ref().is_none_or(|b| candidate.len() < b.len())
            {
                best = Some(candidate);
            }
        }
        best.unwrap_or_else(|| word.to_string())
    }
}

/// Splits raw text into normalized word tokens.
#[derive(Debug, Clone)]
pub struct Normalizer {
    lemmatizer: Lemmatizer,
    case_mode: CaseMode,
}

impl Normalizer {
    pub fn new(lemmatizer: Lemmatizer, case_mode: CaseMode) -> Self {
        Self {
            lemmatizer,
            case_mode,
        }
    }

    /// Normalizer whose lemma lexicon is the vocabulary itself.
    pub fn for_vocabulary(vocabulary: &Vocabulary, case_mode: CaseMode) -> Self {
        Self::new(Lemmatizer::with_lexicon(vocabulary.iter()), case_mode)
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case_mode
    }

    /// Tokenize, case-fold, and lemmatize `text`.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        split_words(text)
            .into_iter()
            .map(|token| match self.case_mode {
                CaseMode::Fold => self.lemmatizer.lemmatize(&token.to_lowercase()),
                CaseMode::Preserve => self.lemmatizer.lemmatize(&token),
            })
            .collect()
    }
}

/// Split on whitespace and punctuation. Punctuation characters become their own tokens.
pub fn split_words(text: &str) -> Vec<String> {
    let mut pretokenized = PreTokenizedString::from(text);
    if let Err(e) = BertPreTokenizer.pre_tokenize(&mut pretokenized) {
        warn!(error = %e, "pre-tokenizer failed, splitting on whitespace");
        return text.split_whitespace().map(str::to_string).collect();
    }
    pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(word, _, _)| word.to_string())
        .collect()
}

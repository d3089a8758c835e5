//! Bag-of-words feature encoding against a fixed vocabulary.

use triage_core::{FeatureVector, Vocabulary};

/// Encode tokens as a binary presence vector of length `vocabulary.len()`.
///
/// Tokens outside the vocabulary are ignored. Repeated tokens set the same bit.
pub fn encode<S: AsRef<str>>(tokens: &[S], vocabulary: &Vocabulary) -> FeatureVector {
    let mut features = FeatureVector::zeros(vocabulary.len());
    for token in tokens {
        if let Some(i) = vocabulary.index_of(token.as_ref()) {
            features.set(i);
        }
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new(vec!["fever".into(), "cough".into(), "headache".into()]).unwrap()
    }

    #[test]
    fn marks_present_words() {
        let v = encode(&["i", "have", "a", "bad", "headache"], &vocab());
        assert_eq!(v.as_slice(), &[0, 0, 1]);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let tokens: [&str; 0] = [];
        let v = encode(&tokens, &vocab());
        assert_eq!(v.len(), 3);
        assert!(v.is_all_zero());
    }

    #[test]
    fn duplicates_collapse() {
        let v = encode(&["cough", "cough", "fever", "cough"], &vocab());
        assert_eq!(v.as_slice(), &[1, 1, 0]);
    }

    #[test]
    fn unknown_tokens_set_nothing() {
        let v = encode(&["sneezing", "rash", "", "!"], &vocab());
        assert_eq!(v.len(), 3);
        assert!(v.is_all_zero());
    }

    #[test]
    fn match_is_exact() {
        let v = encode(&["Fever", "coughs"], &vocab());
        assert!(v.is_all_zero());
    }
}

//! Per-call values: feature vectors, ranked predictions, and pipeline results.

use serde::{Deserialize, Serialize};

/// Binary presence vector over the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    bits: Vec<u8>,
}

impl FeatureVector {
    /// All-zero vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self { bits: vec![0; len] }
    }

    /// Mark index `i` as present. Out-of-range indices are ignored.
    pub fn set(&mut self, i: usize) {
        if let Some(bit) = self.bits.get_mut(i) {
            *bit = 1;
        }
    }

    pub fn get(&self, i: usize) -> Option<u8> {
        self.bits.get(i).copied()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Number of vocabulary words present.
    pub fn active_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    pub fn is_all_zero(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Float view for model input.
    pub fn as_f32(&self) -> Vec<f32> {
        self.bits.iter().map(|&b| f32::from(b)).collect()
    }
}

/// A candidate intent with its classifier probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub intent: String,
    /// Serialized as a string, e.g. `"0.9"`.
    #[serde(with = "probability_string")]
    pub probability: f32,
}

impl Prediction {
    pub fn new(intent: impl Into<String>, probability: f32) -> Self {
        Self {
            intent: intent.into(),
            probability,
        }
    }
}

/// Outcome of one pipeline call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub input: String,
    pub predictions: Vec<Prediction>,
    pub response: String,
}

impl PipelineResult {
    /// Highest-ranked prediction, if any intent cleared the threshold.
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }
}

mod probability_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

//! Threshold filtering and ranking of classifier output.

use std::cmp::Ordering;

use triage_core::{LabelSet, Prediction};

/// Minimum probability, exclusive, for an intent to count as confident.
pub const DEFAULT_THRESHOLD: f32 = 0.25;

/// Keep labels scoring strictly above `threshold`, highest first.
///
/// The sort is stable, so equal probabilities stay in label-index order.
/// Probabilities past the end of the label set are ignored. An empty result
/// means no confident intent.
pub fn rank(probabilities: &[f32], labels: &LabelSet, threshold: f32) -> Vec<Prediction> {
    let mut kept: Vec<(usize, f32)> = probabilities
        .iter()
        .copied()
        .enumerate()
        .take(labels.len())
        .filter(|&(_, p)| p > threshold)
        .collect();

    kept.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    kept.into_iter()
        .filter_map(|(i, p)| labels.get(i).map(|label| Prediction::new(label, p)))
        .collect()
}

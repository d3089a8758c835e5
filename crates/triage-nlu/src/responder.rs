//! Maps the top-ranked intent to one of its canned responses.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::warn;
use triage_core::{IntentCatalog, Prediction};

/// Returned when no intent cleared the threshold.
pub const CLARIFICATION_MESSAGE: &str =
    "I'm not sure I understand. Could you please rephrase that?";

/// Returned when the top intent has no catalog entry.
pub const FALLBACK_MESSAGE: &str = "I'm not sure how to respond to that.";

/// Pick a response for `predictions`, drawing uniformly from the top intent's responses.
pub fn select<R: Rng + ?Sized>(
    predictions: &[Prediction],
    catalog: &IntentCatalog,
    rng: &mut R,
) -> String {
    let Some(top) = predictions.first() else {
        return CLARIFICATION_MESSAGE.to_string();
    };

    match catalog
        .responses(&top.intent)
        .and_then(|responses| responses.choose(rng))
    {
        Some(response) => response.clone(),
        None => {
            warn!(intent = %top.intent, "predicted intent missing from catalog");
            FALLBACK_MESSAGE.to_string()
        }
    }
}

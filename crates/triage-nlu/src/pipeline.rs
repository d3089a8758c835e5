//! Text-to-response pipeline.
//!
//! Composes normalization, encoding, inference, ranking, and response
//! selection over artifacts loaded once at startup.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};
use triage_core::{ArtifactPaths, Artifacts, Error, FeatureVector, PipelineResult, Result};

use crate::encoder::encode;
use crate::model::{IntentModel, load_model};
use crate::normalize::{CaseMode, Normalizer};
use crate::ranker::{DEFAULT_THRESHOLD, rank};
use crate::responder::select;

/// Tunables fixed for the lifetime of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub threshold: f32,
    pub case_mode: CaseMode,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            case_mode: CaseMode::default(),
        }
    }
}

/// Single-turn intent pipeline. Immutable after construction; share it by reference.
pub struct Pipeline {
    artifacts: Arc<Artifacts>,
    model: Box<dyn IntentModel>,
    normalizer: Normalizer,
    threshold: f32,
}

impl Pipeline {
    /// Assemble a pipeline, checking the model's shape against the artifacts.
    pub fn new(
        artifacts: Arc<Artifacts>,
        model: Box<dyn IntentModel>,
        options: PipelineOptions,
    ) -> Result<Self> {
        if let Some(inputs) = model.input_dim()
            && inputs != artifacts.vocabulary.len()
        {
            return Err(Error::ShapeMismatch {
                what: "model input",
                expected: artifacts.vocabulary.len(),
                actual: inputs,
            });
        }
        if let Some(outputs) = model.output_dim()
            && outputs != artifacts.labels.len()
        {
            return Err(Error::ShapeMismatch {
                what: "model output",
                expected: artifacts.labels.len(),
                actual: outputs,
            });
        }

        let normalizer = Normalizer::for_vocabulary(&artifacts.vocabulary, options.case_mode);
        Ok(Self {
            artifacts,
            model,
            normalizer,
            threshold: options.threshold,
        })
    }

    /// Load every artifact from disk and assemble the pipeline.
    pub fn load(paths: &ArtifactPaths, options: PipelineOptions) -> Result<Self> {
        let artifacts = Artifacts::load(paths)?;
        let model = load_model(&paths.model)?;
        let pipeline = Self::new(artifacts, model, options)?;
        info!(
            threshold = pipeline.threshold,
            case_mode = ?options.case_mode,
            "pipeline ready"
        );
        Ok(pipeline)
    }

    pub fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Classify `text` and pick a response using the thread-local RNG.
    pub fn process(&self, text: &str) -> Result<PipelineResult> {
        self.process_with_rng(text, &mut rand::rng())
    }

    /// Classify `text` and pick a response with the supplied RNG.
    ///
    /// Only a classifier backend fault returns `Err`; "no confident intent"
    /// and catalog gaps produce normal results.
    pub fn process_with_rng<R: Rng + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> Result<PipelineResult> {
        let tokens = self.normalizer.normalize(text);
        let features = encode(&tokens, &self.artifacts.vocabulary);

        if no_vocabulary_match(text, &features) {
            warn!(
                tokens = tokens.len(),
                "no vocabulary words in non-empty input; check normalization rules"
            );
        }

        let probabilities = self.model.infer(&features)?;
        let predictions = rank(&probabilities, &self.artifacts.labels, self.threshold);
        let response = select(&predictions, &self.artifacts.catalog, rng);

        debug!(
            tokens = tokens.len(),
            active = features.active_count(),
            predictions = predictions.len(),
            top = predictions.first().map(|p| p.intent.as_str()),
            "processed input"
        );

        Ok(PipelineResult {
            input: text.to_string(),
            predictions,
            response,
        })
    }
}

/// Non-empty input that set no feature bit, a sign of a normalization mismatch.
fn no_vocabulary_match(text: &str, features: &FeatureVector) -> bool {
    features.is_all_zero() && !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activation, DenseLayer, DenseModel};
    use crate::responder::{CLARIFICATION_MESSAGE, FALLBACK_MESSAGE};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Mutex;
    use triage_core::{IntentCatalog, IntentEntry, LabelSet, Vocabulary};

    /// Returns a fixed probability vector and records what it was given.
    struct FixedModel {
        probabilities: Vec<f32>,
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl FixedModel {
        fn new(probabilities: Vec<f32>) -> Self {
            Self {
                probabilities,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl IntentModel for FixedModel {
        fn input_dim(&self) -> Option<usize> {
            None
        }

        fn output_dim(&self) -> Option<usize> {
            None
        }

        fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>> {
            self.seen.lock().unwrap().push(features.as_slice().to_vec());
            Ok(self.probabilities.clone())
        }
    }

    struct FailingModel;

    impl IntentModel for FailingModel {
        fn input_dim(&self) -> Option<usize> {
            None
        }

        fn output_dim(&self) -> Option<usize> {
            None
        }

        fn infer(&self, _: &FeatureVector) -> Result<Vec<f32>> {
            Err(Error::Inference("backend crashed".into()))
        }
    }

    fn artifacts(catalog_tags: &[&str]) -> Arc<Artifacts> {
        let vocabulary = Vocabulary::new(vec!["fever".into(), "cough".into(), "headache".into()])
            .unwrap();
        let labels = LabelSet::new(vec!["flu".into(), "migraine".into()]).unwrap();
        let catalog = IntentCatalog::new(
            catalog_tags
                .iter()
                .map(|tag| IntentEntry {
                    tag: tag.to_string(),
                    patterns: vec![],
                    responses: vec![format!("{tag} A"), format!("{tag} B")],
                })
                .collect(),
        )
        .unwrap();
        Arc::new(Artifacts::new(vocabulary, labels, catalog))
    }

    #[test]
    fn worked_example() {
        let model = Arc::new(FixedModel::new(vec![0.1, 0.9]));
        let pipeline = Pipeline::new(
            artifacts(&["flu", "migraine"]),
            Box::new(SharedModel(model.clone())),
            PipelineOptions::default(),
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let result = pipeline
            .process_with_rng("I have a bad headache", &mut rng)
            .unwrap();

        assert_eq!(model.seen.lock().unwrap()[0], vec![0, 0, 1]);
        assert_eq!(result.input, "I have a bad headache");
        assert_eq!(result.predictions.len(), 1);
        assert_eq!(result.predictions[0].intent, "migraine");
        assert!((result.predictions[0].probability - 0.9).abs() < 1e-6);
        assert!(result.response == "migraine A" || result.response == "migraine B");
    }

    #[test]
    fn plural_and_case_still_match() {
        let model = Arc::new(FixedModel::new(vec![0.0, 0.0]));
        let pipeline = Pipeline::new(
            artifacts(&["flu"]),
            Box::new(SharedModel(model.clone())),
            PipelineOptions::default(),
        )
        .unwrap();

        pipeline.process("Fevers and HEADACHES!").unwrap();
        assert_eq!(model.seen.lock().unwrap()[0], vec![1, 0, 1]);
    }

    #[test]
    fn all_zero_diagnostic_only_for_non_empty_input() {
        let artifacts = artifacts(&["flu"]);
        let normalizer = Normalizer::for_vocabulary(&artifacts.vocabulary, CaseMode::Fold);
        let features = |text: &str| encode(&normalizer.normalize(text), &artifacts.vocabulary);

        for blank in ["", "   \t\n"] {
            assert!(!no_vocabulary_match(blank, &features(blank)));
        }
        let unknown = "sore elbow";
        assert!(no_vocabulary_match(unknown, &features(unknown)));
        let known = "dry coughs";
        assert!(!no_vocabulary_match(known, &features(known)));
    }

    #[test]
    fn no_confident_intent_asks_for_clarification() {
        let pipeline = Pipeline::new(
            artifacts(&["flu", "migraine"]),
            Box::new(FixedModel::new(vec![0.2, 0.25])),
            PipelineOptions::default(),
        )
        .unwrap();

        let result = pipeline.process("something odd").unwrap();
        assert!(result.predictions.is_empty());
        assert_eq!(result.response, CLARIFICATION_MESSAGE);
    }

    #[test]
    fn empty_input_is_total() {
        let pipeline = Pipeline::new(
            artifacts(&["flu", "migraine"]),
            Box::new(FixedModel::new(vec![0.0, 0.0])),
            PipelineOptions::default(),
        )
        .unwrap();

        let result = pipeline.process("").unwrap();
        assert_eq!(result.input, "");
        assert_eq!(result.response, CLARIFICATION_MESSAGE);
    }

    #[test]
    fn uncatalogued_intent_falls_back() {
        let pipeline = Pipeline::new(
            artifacts(&["flu"]),
            Box::new(FixedModel::new(vec![0.1, 0.9])),
            PipelineOptions::default(),
        )
        .unwrap();

        let result = pipeline.process("headache").unwrap();
        assert_eq!(result.predictions[0].intent, "migraine");
        assert_eq!(result.response, FALLBACK_MESSAGE);
    }

    #[test]
    fn custom_threshold_applies() {
        let pipeline = Pipeline::new(
            artifacts(&["flu", "migraine"]),
            Box::new(FixedModel::new(vec![0.3, 0.45])),
            PipelineOptions {
                threshold: 0.4,
                ..Default::default()
            },
        )
        .unwrap();

        let result = pipeline.process("fever").unwrap();
        assert_eq!(result.predictions.len(), 1);
        assert_eq!(result.predictions[0].intent, "migraine");
    }

    #[test]
    fn backend_fault_is_runtime_error() {
        let pipeline = Pipeline::new(
            artifacts(&["flu"]),
            Box::new(FailingModel),
            PipelineOptions::default(),
        )
        .unwrap();

        let err = pipeline.process("fever").unwrap_err();
        assert!(!err.is_startup());
    }

    #[test]
    fn rejects_model_with_wrong_input_width() {
        let model = DenseModel::new(vec![DenseLayer {
            weights: vec![vec![0.0, 0.0]; 4],
            bias: vec![0.0, 0.0],
            activation: Activation::Softmax,
        }])
        .unwrap();

        let err = Pipeline::new(
            artifacts(&["flu"]),
            Box::new(model),
            PipelineOptions::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                what: "model input",
                expected: 3,
                actual: 4
            }
        ));
    }

    #[test]
    fn rejects_model_with_wrong_output_width() {
        let model = DenseModel::new(vec![DenseLayer {
            weights: vec![vec![0.0; 3]; 3],
            bias: vec![0.0; 3],
            activation: Activation::Softmax,
        }])
        .unwrap();

        let err = Pipeline::new(
            artifacts(&["flu"]),
            Box::new(model),
            PipelineOptions::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                what: "model output",
                ..
            }
        ));
    }

    #[test]
    fn seeded_runs_repeat() {
        let pipeline = Pipeline::new(
            artifacts(&["flu", "migraine"]),
            Box::new(FixedModel::new(vec![0.1, 0.9])),
            PipelineOptions::default(),
        )
        .unwrap();

        let run = || {
            let mut rng = StdRng::seed_from_u64(11);
            (0..5)
                .map(|_| pipeline.process_with_rng("headache", &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
    }

    /// Lets a test keep a handle on the model after handing it to the pipeline.
    struct SharedModel(Arc<FixedModel>);

    impl IntentModel for SharedModel {
        fn input_dim(&self) -> Option<usize> {
            self.0.input_dim()
        }

        fn output_dim(&self) -> Option<usize> {
            self.0.output_dim()
        }

        fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>> {
            self.0.infer(features)
        }
    }
}

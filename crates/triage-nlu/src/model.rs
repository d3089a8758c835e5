//! Classifier adapters: feature vector in, one probability per label out.
//!
//! The trained model is opaque to the pipeline. [`DenseModel`] evaluates a
//! small feed-forward network exported as JSON; `OnnxModel` (feature `onnx`)
//! runs an exported graph through ONNX Runtime.

use std::path::Path;

use serde::Deserialize;
use tracing::info;
use triage_core::artifacts::read_json;
use triage_core::{Error, FeatureVector, Result};

/// A loaded classifier.
///
/// Implementations must be deterministic for a fixed artifact. They are shared
/// across callers, so any non-reentrant backing resource is serialized inside.
pub trait IntentModel: Send + Sync {
    /// Expected feature vector length, if the artifact declares one.
    fn input_dim(&self) -> Option<usize>;

    /// Number of probabilities produced, if the artifact declares it.
    fn output_dim(&self) -> Option<usize>;

    /// Run inference on one feature vector.
    fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>>;
}

/// Load a model artifact, picking the backend from the file extension.
///
/// `.onnx` requires the `onnx` feature; anything else is read as a [`DenseModel`].
pub fn load_model(path: &Path) -> Result<Box<dyn IntentModel>> {
    match path.extension().and_then(|e| e.to_str()) {
        #[cfg(feature = "onnx")]
        Some("onnx") => Ok(Box::new(crate::onnx::OnnxModel::load(path)?)),
        #[cfg(not(feature = "onnx"))]
        Some("onnx") => Err(Error::ModelUnavailable(format!(
            "{}: ONNX support not compiled in (enable the `onnx` feature)",
            path.display()
        ))),
        _ => Ok(Box::new(DenseModel::load(path)?)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Sigmoid,
    Softmax,
    #[default]
    Linear,
}

/// Fully connected layer. `weights[i][j]` connects input `i` to output `j`.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub activation: Activation,
}

#[derive(Debug, Deserialize)]
struct DenseModelFile {
    layers: Vec<DenseLayer>,
}

/// Feed-forward network evaluated in pure Rust. Re-entrant.
#[derive(Debug, Clone)]
pub struct DenseModel {
    layers: Vec<DenseLayer>,
}

impl DenseModel {
    /// Build from layers, checking that shapes chain.
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::ModelUnavailable("model has no layers".into()));
        }

        let mut prev_out: Option<usize> = None;
        for (n, layer) in layers.iter().enumerate() {
            let outputs = layer.bias.len();
            if layer.weights.is_empty() || outputs == 0 {
                return Err(Error::ModelUnavailable(format!("layer {n} is empty")));
            }
            if let Some(row) = layer.weights.iter().position(|r| r.len() != outputs) {
                return Err(Error::ModelUnavailable(format!(
                    "layer {n}: weight row {row} has {} columns, bias has {outputs}",
                    layer.weights[row].len()
                )));
            }
            if let Some(prev) = prev_out
                && prev != layer.weights.len()
            {
                return Err(Error::ModelUnavailable(format!(
                    "layer {n} expects {} inputs but layer {} produces {prev}",
                    layer.weights.len(),
                    n - 1
                )));
            }
            prev_out = Some(outputs);
        }

        Ok(Self { layers })
    }

    /// Load a `{"layers": [...]}` JSON artifact.
    pub fn load(path: &Path) -> Result<Self> {
        let file: DenseModelFile = read_json(path)
            .map_err(|e| Error::ModelUnavailable(format!("{}: {e}", path.display())))?;
        let model = Self::new(file.layers)?;
        info!(
            layers = model.layers.len(),
            inputs = model.inputs(),
            outputs = model.outputs(),
            model = %path.display(),
            "loaded dense model"
        );
        Ok(model)
    }

    fn inputs(&self) -> usize {
        self.layers[0].weights.len()
    }

    fn outputs(&self) -> usize {
        self.layers[self.layers.len() - 1].bias.len()
    }

    /// Forward pass over a float input.
    pub fn forward(&self, input: &[f32]) -> Result<Vec<f32>> {
        if input.len() != self.inputs() {
            return Err(Error::Inference(format!(
                "expected {} inputs, got {}",
                self.inputs(),
                input.len()
            )));
        }

        let mut x = input.to_vec();
        for layer in &self.layers {
            let mut y = layer.bias.clone();
            for (xi, row) in x.iter().zip(&layer.weights) {
                if *xi == 0.0 {
                    continue;
                }
                for (yj, w) in y.iter_mut().zip(row) {
                    *yj += xi * w;
                }
            }
            activate(layer.activation, &mut y);
            x = y;
        }
        Ok(x)
    }
}

impl IntentModel for DenseModel {
    fn input_dim(&self) -> Option<usize> {
        Some(self.inputs())
    }

    fn output_dim(&self) -> Option<usize> {
        Some(self.outputs())
    }

    fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        self.forward(&features.as_f32())
    }
}

fn activate(activation: Activation, v: &mut [f32]) {
    match activation {
        Activation::Linear => {}
        Activation::Relu => {
            for x in v.iter_mut() {
                *x = x.max(0.0);
            }
        }
        Activation::Sigmoid => {
            for x in v.iter_mut() {
                *x = 1.0 / (1.0 + (-*x).exp());
            }
        }
        Activation::Softmax => softmax(v),
    }
}

/// In-place softmax, shifted by the max for stability.
fn softmax(v: &mut [f32]) {
    let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0f32;
    for x in v.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    if sum > 0.0 {
        for x in v.iter_mut() {
            *x /= sum;
        }
    }
}

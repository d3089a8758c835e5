//! ONNX Runtime classifier adapter.
//!
//! Expects a graph with one float32 input of shape `[batch, vocabulary]` and
//! a first output of shape `[batch, labels]` holding class probabilities.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::{Tensor, ValueType};
use tracing::info;
use triage_core::{Error, FeatureVector, Result};

use crate::model::IntentModel;

/// ONNX Runtime session behind a lock; one inference at a time.
pub struct OnnxModel {
    session: Mutex<Session>,
    input_dim: Option<usize>,
    output_dim: Option<usize>,
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ModelUnavailable(format!(
                "{} not found",
                path.display()
            )));
        }

        let session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| Error::ModelUnavailable(format!("{}: {e}", path.display())))?;

        let input_dim = session.inputs().first().and_then(|i| last_dim(i.dtype()));
        let output_dim = session
            .outputs()
            .first()
            .and_then(|o| last_dim(o.dtype()));

        info!(
            ?input_dim,
            ?output_dim,
            model = %path.display(),
            "loaded onnx model"
        );
        Ok(Self {
            session: Mutex::new(session),
            input_dim,
            output_dim,
        })
    }
}

impl IntentModel for OnnxModel {
    fn input_dim(&self) -> Option<usize> {
        self.input_dim
    }

    fn output_dim(&self) -> Option<usize> {
        self.output_dim
    }

    fn infer(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let shape = [1i64, features.len() as i64];
        let input = Tensor::from_array((shape, features.as_f32().into_boxed_slice()))
            .map_err(|e| Error::Inference(format!("build input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| Error::Inference("session lock poisoned".into()))?;
        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| Error::Inference(e.to_string()))?;

        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(format!("extract output: {e}")))?;
        Ok(data.to_vec())
    }
}

/// Last dimension of a tensor type, if static.
fn last_dim(value_type: &ValueType) -> Option<usize> {
    match value_type {
        ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

//! Intent pipeline: normalization, bag-of-words encoding, classifier adapters,
//! ranking, and response selection.

pub mod encoder;
pub mod model;
pub mod normalize;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod pipeline;
pub mod ranker;
pub mod responder;

pub use encoder::encode;
pub use model::{DenseModel, IntentModel, load_model};
pub use normalize::{CaseMode, Lemmatizer, Normalizer};
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use pipeline::{Pipeline, PipelineOptions};
pub use ranker::{DEFAULT_THRESHOLD, rank};
pub use responder::{CLARIFICATION_MESSAGE, FALLBACK_MESSAGE, select};

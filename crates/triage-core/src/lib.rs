pub mod artifacts;
pub mod catalog;
pub mod error;
pub mod prediction;
pub mod vocabulary;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use catalog::{CatalogDocument, IntentCatalog, IntentEntry};
pub use error::{Error, Result};
pub use prediction::{FeatureVector, PipelineResult, Prediction};
pub use vocabulary::{LabelSet, Vocabulary};

//! Startup loading of the static artifacts the pipeline serves from.
//!
//! Everything here runs once, before the first request. Any missing or
//! malformed file is a startup failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::catalog::{CatalogDocument, IntentCatalog};
use crate::error::{Error, Result};
use crate::vocabulary::{LabelSet, Vocabulary};

pub const INTENTS_FILE: &str = "intents.json";
pub const WORDS_FILE: &str = "words.json";
pub const CLASSES_FILE: &str = "classes.json";
pub const MODEL_FILE: &str = "model.json";

/// Locations of the artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub intents: PathBuf,
    pub words: PathBuf,
    pub classes: PathBuf,
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            intents: dir.join(INTENTS_FILE),
            words: dir.join(WORDS_FILE),
            classes: dir.join(CLASSES_FILE),
            model: dir.join(MODEL_FILE),
        }
    }
}

/// Immutable bundle of vocabulary, labels, and catalog.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub vocabulary: Vocabulary,
    pub labels: LabelSet,
    pub catalog: IntentCatalog,
}

impl Artifacts {
    pub fn new(vocabulary: Vocabulary, labels: LabelSet, catalog: IntentCatalog) -> Self {
        Self {
            vocabulary,
            labels,
            catalog,
        }
    }

    /// Load and validate vocabulary, labels, and catalog from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Arc<Self>> {
        let words: Vec<String> = read_json(&paths.words)?;
        let vocabulary = Vocabulary::new(words)?;

        let classes: Vec<String> = read_json(&paths.classes)?;
        let labels = LabelSet::new(classes)?;

        let doc: CatalogDocument = read_json(&paths.intents)?;
        let catalog = IntentCatalog::from_document(doc)?;

        let uncatalogued = labels.iter().filter(|l| !catalog.contains(l)).count();
        if uncatalogued > 0 {
            warn!(
                uncatalogued,
                "labels without catalog entries will fall back to the default response"
            );
        }

        info!(
            words = vocabulary.len(),
            labels = labels.len(),
            intents = catalog.len(),
            "loaded artifacts"
        );
        Ok(Arc::new(Self::new(vocabulary, labels, catalog)))
    }
}

/// Read and deserialize a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::ArtifactNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

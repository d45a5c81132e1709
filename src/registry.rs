use std::collections::HashMap;

use anyhow::Error;
use tracing::warn;

use crate::predict::{IrisFeatures, PredictHandler, PredictResponse, PLACEHOLDER_PREDICTION};

/// Stand-in for a loaded model artifact.
///
/// A real deployment would keep the deserialized weights behind this handle;
/// here it only knows its identifier and answers every prediction with
/// `PLACEHOLDER_PREDICTION`.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    /// The identifier the model was registered under
    name: String,
}

impl ModelHandle {
    fn new(name: String) -> Self {
        ModelHandle { name }
    }
}

impl PredictHandler for ModelHandle {
    #[tracing::instrument(level = "trace", skip(self, _features))]
    fn run_predict(&self, _features: &IrisFeatures) -> Result<PredictResponse, Error> {
        // The measurements are deliberately ignored; see PLACEHOLDER_PREDICTION.
        Ok(PredictResponse {
            model: self.name.clone(),
            prediction: PLACEHOLDER_PREDICTION,
        })
    }
}

/// Read-only mapping from model identifier to its handle.
///
/// Built once at startup from the configured model list and shared through
/// the router state. Nothing mutates it afterwards, so concurrent reads need
/// no locking.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelHandle>,
}

impl ModelRegistry {
    #[tracing::instrument(level = "debug", skip(names))]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut models = HashMap::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                warn!("Skipping model with an empty identifier");
                continue;
            }
            if models.contains_key(&name) {
                warn!("Skipping duplicate model {}", name);
                continue;
            }
            models.insert(name.clone(), ModelHandle::new(name));
        }
        ModelRegistry { models }
    }

    pub fn get(&self, name: &str) -> Option<&ModelHandle> {
        self.models.get(name)
    }

    /// Registered identifiers, sorted so listings are deterministic.
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

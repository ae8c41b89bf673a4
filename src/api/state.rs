use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::model::RecommenderModel;

/// Shared application state
///
/// The model is loaded once at startup and never replaced: either it is
/// present and every handler reads it concurrently without locking, or the
/// load failed and the slot stays empty until the process is restarted.
#[derive(Clone)]
pub struct AppState {
    model: Option<Arc<dyn RecommenderModel>>,
    function_key: Option<String>,
}

impl AppState {
    /// State for a process whose model loaded successfully.
    pub fn with_model(model: Arc<dyn RecommenderModel>) -> Self {
        Self {
            model: Some(model),
            function_key: None,
        }
    }

    /// State for a process whose model failed to load. Recommendation
    /// requests fail fast with a Model-Unavailable error.
    pub fn unavailable() -> Self {
        Self {
            model: None,
            function_key: None,
        }
    }

    /// Attaches the function-invocation key requests must present.
    pub fn with_function_key(mut self, key: Option<String>) -> Self {
        self.function_key = key;
        self
    }

    /// The loaded model, or the fail-fast error when startup loading failed.
    pub fn model(&self) -> AppResult<&dyn RecommenderModel> {
        self.model.as_deref().ok_or(AppError::ModelUnavailable)
    }

    /// The configured function key, if any.
    pub fn required_key(&self) -> Option<&str> {
        self.function_key.as_deref()
    }
}

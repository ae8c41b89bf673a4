mod svd;

use std::collections::HashSet;

pub use svd::SvdModel;

/// Errors raised while scoring a (user, item) pair.
///
/// Identifier-not-found for the *user* is deliberately not represented here:
/// an unknown user is the popularity-fallback branch, not a failure. These
/// variants cover genuinely broken states such as a corrupted factor matrix.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("unknown user identifier: {0}")]
    UnknownUser(String),

    #[error("unknown item identifier: {0}")]
    UnknownItem(String),

    #[error("non-finite affinity estimate for user {user} and item {item}")]
    InvalidEstimate { user: String, item: String },

    #[error("inconsistent model state: {0}")]
    CorruptModel(String),
}

/// Capability interface of a trained recommendation model.
///
/// The recommender depends only on these four operations, so any scoring
/// backend (a different factorization, a neural embedding model) can be
/// swapped in behind the same trait. Implementations are immutable after
/// construction and safe to share across concurrent requests.
pub trait RecommenderModel: Send + Sync {
    /// The closed universe of item identifiers, in the model's native
    /// enumeration order. Contains no duplicates.
    fn item_ids(&self) -> &[String];

    /// The items `user_id` interacted with during training, or `None` if the
    /// identifier does not translate to a training-time user. `None` is the
    /// unknown-user signal, never an error.
    fn seen_items(&self, user_id: &str) -> Option<HashSet<String>>;

    /// Number of training interactions involving `item_id` (its popularity).
    /// Zero for identifiers outside the item universe.
    fn interaction_count(&self, item_id: &str) -> usize;

    /// Predicted affinity of `user_id` for `item_id`.
    fn predict(&self, user_id: &str, item_id: &str) -> Result<f64, ScoringError>;
}

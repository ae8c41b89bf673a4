use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{RecommenderModel, ScoringError};

/// A biased matrix-factorization model, trained offline and exported as a
/// single JSON blob.
///
/// Raw identifiers are the external user/item ids (not necessarily numeric);
/// inner ids are the dense training indices. `item_ids` is the inner→raw
/// translation and fixes the native enumeration order; `user_index` /
/// `item_index` are the raw→inner translation. A raw identifier missing from
/// `user_index` was not seen during training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvdModel {
    /// Global mean rating from the training data.
    global_mean: f64,
    /// Raw user id → inner user index.
    user_index: HashMap<String, usize>,
    /// Raw item id → inner item index.
    item_index: HashMap<String, usize>,
    /// Inner item index → raw item id, in training enumeration order.
    item_ids: Vec<String>,
    /// Per-user bias terms, indexed by inner user id.
    user_biases: Vec<f64>,
    /// Per-item bias terms, indexed by inner item id.
    item_biases: Vec<f64>,
    /// Latent user factors, one row per inner user id.
    user_factors: Vec<Vec<f64>>,
    /// Latent item factors, one row per inner item id.
    item_factors: Vec<Vec<f64>>,
    /// Inner item ids each user interacted with during training.
    user_histories: Vec<Vec<usize>>,
    /// Training interaction count per inner item id.
    item_counts: Vec<usize>,
}

impl SvdModel {
    /// Number of users seen during training.
    pub fn num_users(&self) -> usize {
        self.user_index.len()
    }

    /// Number of items in the model's universe.
    pub fn num_items(&self) -> usize {
        self.item_ids.len()
    }

    fn corrupt(detail: &str) -> ScoringError {
        ScoringError::CorruptModel(detail.to_string())
    }
}

impl RecommenderModel for SvdModel {
    fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    fn seen_items(&self, user_id: &str) -> Option<HashSet<String>> {
        let &inner = self.user_index.get(user_id)?;
        let history = self.user_histories.get(inner)?;
        Some(
            history
                .iter()
                .filter_map(|&item| self.item_ids.get(item).cloned())
                .collect(),
        )
    }

    fn interaction_count(&self, item_id: &str) -> usize {
        self.item_index
            .get(item_id)
            .and_then(|&inner| self.item_counts.get(inner))
            .copied()
            .unwrap_or(0)
    }

    fn predict(&self, user_id: &str, item_id: &str) -> Result<f64, ScoringError> {
        let &user = self
            .user_index
            .get(user_id)
            .ok_or_else(|| ScoringError::UnknownUser(user_id.to_string()))?;
        let &item = self
            .item_index
            .get(item_id)
            .ok_or_else(|| ScoringError::UnknownItem(item_id.to_string()))?;

        let user_bias = self
            .user_biases
            .get(user)
            .copied()
            .ok_or_else(|| Self::corrupt("user bias index out of range"))?;
        let item_bias = self
            .item_biases
            .get(item)
            .copied()
            .ok_or_else(|| Self::corrupt("item bias index out of range"))?;
        let user_factors = self
            .user_factors
            .get(user)
            .ok_or_else(|| Self::corrupt("user factor index out of range"))?;
        let item_factors = self
            .item_factors
            .get(item)
            .ok_or_else(|| Self::corrupt("item factor index out of range"))?;

        if user_factors.len() != item_factors.len() {
            return Err(Self::corrupt("factor dimensionality mismatch"));
        }

        let dot: f64 = user_factors
            .iter()
            .zip(item_factors.iter())
            .map(|(p, q)| p * q)
            .sum();
        let estimate = self.global_mean + user_bias + item_bias + dot;

        if estimate.is_finite() {
            Ok(estimate)
        } else {
            Err(ScoringError::InvalidEstimate {
                user: user_id.to_string(),
                item: item_id.to_string(),
            })
        }
    }
}

use std::cmp::Ordering;

use crate::model::{RecommenderModel, ScoringError};

/// Ranked recommendations for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendations {
    /// Item identifiers, best first. Never contains duplicates and never
    /// exceeds the requested count.
    pub items: Vec<String>,
    /// Whether the user was present in the model's training data.
    pub user_known: bool,
}

/// Produces up to `count` recommended item identifiers for `user_id`.
///
/// Known users get a personalized ranking: every item in the model's universe
/// (minus the user's seen-set when `exclude_seen` is set) is scored via
/// `predict` and sorted by estimate, best first. Users the model cannot
/// translate fall back to ranking the full universe by training-time
/// popularity; `exclude_seen` has no effect on that branch.
///
/// Ties are broken by ascending item identifier in both branches, so results
/// are deterministic for a given model. When excluding seen items leaves
/// fewer than `count` candidates, the shorter list is returned as-is; seen
/// items are never used to backfill.
///
/// Pure function of its inputs: no side effects, no retries. Scoring
/// failures propagate to the caller untouched.
pub fn recommend(
    model: &dyn RecommenderModel,
    user_id: &str,
    count: usize,
    exclude_seen: bool,
) -> Result<Recommendations, ScoringError> {
    match model.seen_items(user_id) {
        Some(seen) => {
            let mut scored: Vec<(&str, f64)> = Vec::with_capacity(model.item_ids().len());
            for item in model.item_ids() {
                if exclude_seen && seen.contains(item.as_str()) {
                    continue;
                }
                scored.push((item.as_str(), model.predict(user_id, item)?));
            }
            scored.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.0.cmp(b.0))
            });
            Ok(Recommendations {
                items: take_ids(scored, count),
                user_known: true,
            })
        }
        None => {
            let mut ranked: Vec<(&str, usize)> = model
                .item_ids()
                .iter()
                .map(|item| (item.as_str(), model.interaction_count(item)))
                .collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            Ok(Recommendations {
                items: take_ids(ranked, count),
                user_known: false,
            })
        }
    }
}

fn take_ids<S>(ranked: Vec<(&str, S)>, count: usize) -> Vec<String> {
    ranked
        .into_iter()
        .take(count)
        .map(|(id, _)| id.to_string())
        .collect()
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{within_bounds, Category, ValidationError};

/// Reviewer correction replacing one category's recorded score.
///
/// The recorded assessment is left untouched; the override only changes which
/// value aggregation reads. The reason is kept for audit display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOverride {
    category: Category,
    score: f64,
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewer: Option<String>,
    applied_at: DateTime<Utc>,
}

impl ScoreOverride {
    pub fn new(
        category: Category,
        score: f64,
        reason: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let reason = reason.into();
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::EmptyOverrideReason { category });
        }
        if !within_bounds(score) {
            return Err(ValidationError::ScoreOutOfRange {
                category,
                value: score,
            });
        }

        Ok(Self {
            category,
            score,
            reason: reason.to_string(),
            reviewer: None,
            applied_at: Utc::now(),
        })
    }

    pub fn reviewed_by(mut self, reviewer: impl Into<String>) -> Self {
        let reviewer = reviewer.into();
        let reviewer = reviewer.trim();
        self.reviewer = (!reviewer.is_empty()).then(|| reviewer.to_string());
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn reviewer(&self) -> Option<&str> {
        self.reviewer.as_deref()
    }

    pub fn applied_at(&self) -> DateTime<Utc> {
        self.applied_at
    }
}

/// Active overrides for a single candidate, at most one per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OverrideSet {
    active: BTreeMap<Category, ScoreOverride>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and activate an override, replacing any earlier one for the category.
    pub fn apply_override(
        &mut self,
        category: Category,
        score: f64,
        reason: impl Into<String>,
    ) -> Result<&ScoreOverride, ValidationError> {
        let entry = ScoreOverride::new(category, score, reason)?;
        Ok(self.activate(entry))
    }

    pub fn activate(&mut self, entry: ScoreOverride) -> &ScoreOverride {
        let category = entry.category;
        self.active.insert(category, entry);
        &self.active[&category]
    }

    /// Revert to the recorded score. Removing a missing override is a no-op.
    pub fn remove_override(&mut self, category: Category) -> Option<ScoreOverride> {
        self.active.remove(&category)
    }

    pub fn get(&self, category: Category) -> Option<&ScoreOverride> {
        self.active.get(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreOverride> + '_ {
        self.active.values()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

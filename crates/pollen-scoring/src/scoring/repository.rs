use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{CandidateId, Category, CategoryScore};
use super::evaluation::{
    ScoringConfig, ThresholdConfiguration, WeightConfiguration, FULL_WEIGHT,
};
use super::overrides::{OverrideSet, ScoreOverride};
use super::store::CandidateScorecard;

/// Repository record holding a candidate's recorded scores and active overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub scorecard: CandidateScorecard,
    pub overrides: OverrideSet,
}

impl CandidateRecord {
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            scorecard: CandidateScorecard::new(candidate_id),
            overrides: OverrideSet::new(),
        }
    }

    pub fn candidate_id(&self) -> &CandidateId {
        &self.scorecard.candidate_id
    }

    pub fn scorecard_view(&self) -> ScorecardView {
        ScorecardView {
            candidate_id: self.scorecard.candidate_id.clone(),
            scores: self.scorecard.scores().collect(),
            overrides: self.overrides.iter().cloned().collect(),
        }
    }
}

/// Scoring configuration tagged with a version for optimistic writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionedScoringConfig {
    pub config: ScoringConfig,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl VersionedScoringConfig {
    pub fn view(&self) -> ScoringConfigView {
        let weights = &self.config.weights;
        ScoringConfigView {
            weights: weights.clone(),
            thresholds: self.config.thresholds,
            total_weight: weights.total_weight(),
            valid: weights.is_valid(),
            required_total: FULL_WEIGHT,
            version: self.version,
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction for candidate scores and overrides.
pub trait ScoreRepository: Send + Sync {
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError>;
    fn upsert(&self, record: CandidateRecord) -> Result<(), RepositoryError>;
}

/// Storage abstraction for the shared scoring configuration.
pub trait WeightConfigRepository: Send + Sync {
    fn load(&self) -> Result<VersionedScoringConfig, RepositoryError>;
    /// Persist a new configuration. When `expected_version` is given and no
    /// longer current the write is refused with [`RepositoryError::Conflict`];
    /// otherwise the last write wins.
    fn save(
        &self,
        config: ScoringConfig,
        expected_version: Option<u64>,
    ) -> Result<VersionedScoringConfig, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("stale write: expected version {expected}, current version {current}")]
    Conflict { expected: u64, current: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook recording override activity for the review audit trail.
pub trait AuditPublisher: Send + Sync {
    fn publish(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// Audit payload describing a reviewer action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub candidate_id: CandidateId,
    pub category: Category,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    OverrideApplied,
    OverrideRemoved,
}

impl AuditEvent {
    pub(crate) fn override_applied(candidate_id: &CandidateId, entry: &ScoreOverride) -> Self {
        let mut details = BTreeMap::new();
        details.insert("score".to_string(), format!("{}", entry.score()));
        details.insert("reason".to_string(), entry.reason().to_string());
        if let Some(reviewer) = entry.reviewer() {
            details.insert("reviewer".to_string(), reviewer.to_string());
        }
        Self {
            action: AuditAction::OverrideApplied,
            candidate_id: candidate_id.clone(),
            category: entry.category(),
            details,
        }
    }

    pub(crate) fn override_removed(candidate_id: &CandidateId, entry: &ScoreOverride) -> Self {
        let mut details = BTreeMap::new();
        details.insert("reverted_score".to_string(), format!("{}", entry.score()));
        details.insert("reason".to_string(), entry.reason().to_string());
        Self {
            action: AuditAction::OverrideRemoved,
            candidate_id: candidate_id.clone(),
            category: entry.category(),
            details,
        }
    }
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit transport unavailable: {0}")]
    Transport(String),
}

/// Scores and overrides exposed to review screens.
#[derive(Debug, Clone, Serialize)]
pub struct ScorecardView {
    pub candidate_id: CandidateId,
    pub scores: Vec<CategoryScore>,
    pub overrides: Vec<ScoreOverride>,
}

/// Configuration as shown on the weight editor, with its validity flag.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringConfigView {
    pub weights: WeightConfiguration,
    pub thresholds: ThresholdConfiguration,
    pub total_weight: f64,
    pub valid: bool,
    pub required_total: f64,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

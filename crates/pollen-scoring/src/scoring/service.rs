use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{CandidateId, Category, ScoringError, ValidationError};
use super::evaluation::{aggregate, AggregateResult, ScoringConfig, ThresholdConfiguration};
use super::overrides::ScoreOverride;
use super::repository::{
    AuditError, AuditEvent, AuditPublisher, CandidateRecord, RepositoryError, ScoreRepository,
    ScorecardView, VersionedScoringConfig, WeightConfigRepository,
};

/// Service composing score storage, the shared configuration, and the audit trail.
pub struct ScoringService<S, W, A> {
    scores: Arc<S>,
    config: Arc<W>,
    audit: Arc<A>,
}

impl<S, W, A> ScoringService<S, W, A>
where
    S: ScoreRepository + 'static,
    W: WeightConfigRepository + 'static,
    A: AuditPublisher + 'static,
{
    pub fn new(scores: Arc<S>, config: Arc<W>, audit: Arc<A>) -> Self {
        Self {
            scores,
            config,
            audit,
        }
    }

    /// Record an assessment score, creating the candidate record on first use.
    pub fn record_score(
        &self,
        candidate_id: &CandidateId,
        category: Category,
        value: f64,
    ) -> Result<ScorecardView, ScoringServiceError> {
        let mut record = self.load_or_create(candidate_id)?;
        record
            .scorecard
            .record(category, value)
            .map_err(ScoringError::from)?;
        self.scores.upsert(record.clone())?;

        debug!(candidate = %candidate_id, %category, value, "recorded category score");
        Ok(record.scorecard_view())
    }

    pub fn scorecard(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<ScorecardView, ScoringServiceError> {
        Ok(self.fetch(candidate_id)?.scorecard_view())
    }

    /// Activate a reviewer override. Validation happens before anything is stored.
    pub fn apply_override(
        &self,
        candidate_id: &CandidateId,
        category: Category,
        score: f64,
        reason: &str,
        reviewer: Option<&str>,
    ) -> Result<ScoreOverride, ScoringServiceError> {
        let mut entry = ScoreOverride::new(category, score, reason).map_err(ScoringError::from)?;
        if let Some(reviewer) = reviewer {
            entry = entry.reviewed_by(reviewer);
        }

        let mut record = self.fetch(candidate_id)?;
        let applied = record.overrides.activate(entry).clone();
        self.scores.upsert(record)?;

        info!(
            candidate = %candidate_id,
            %category,
            score,
            reason = applied.reason(),
            "score override applied"
        );
        self.audit
            .publish(AuditEvent::override_applied(candidate_id, &applied))?;
        Ok(applied)
    }

    /// Revert a category to its recorded score. Missing overrides are a no-op.
    pub fn remove_override(
        &self,
        candidate_id: &CandidateId,
        category: Category,
    ) -> Result<Option<ScoreOverride>, ScoringServiceError> {
        let mut record = self.fetch(candidate_id)?;
        let Some(removed) = record.overrides.remove_override(category) else {
            return Ok(None);
        };
        self.scores.upsert(record)?;

        info!(candidate = %candidate_id, %category, "score override removed");
        self.audit
            .publish(AuditEvent::override_removed(candidate_id, &removed))?;
        Ok(Some(removed))
    }

    pub fn configuration(&self) -> Result<VersionedScoringConfig, ScoringServiceError> {
        Ok(self.config.load()?)
    }

    pub fn set_weight(
        &self,
        category: Category,
        percentage: f64,
        expected_version: Option<u64>,
    ) -> Result<VersionedScoringConfig, ScoringServiceError> {
        let mut config = self.config.load()?.config;
        config
            .weights
            .set_weight(category, percentage)
            .map_err(ScoringError::from)?;
        self.save_config(config, expected_version)
    }

    pub fn exclude_category(
        &self,
        category: Category,
        expected_version: Option<u64>,
    ) -> Result<VersionedScoringConfig, ScoringServiceError> {
        let mut config = self.config.load()?.config;
        config.weights.exclude(category);
        self.save_config(config, expected_version)
    }

    pub fn set_thresholds(
        &self,
        thresholds: ThresholdConfiguration,
        expected_version: Option<u64>,
    ) -> Result<VersionedScoringConfig, ScoringServiceError> {
        let mut config = self.config.load()?.config;
        config.thresholds = thresholds;
        self.save_config(config, expected_version)
    }

    /// Aggregate a candidate against the current configuration.
    pub fn compute(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<AggregateResult, ScoringServiceError> {
        let record = self.fetch(candidate_id)?;
        let config = self.config.load()?;
        let result = aggregate(&record.scorecard, &record.overrides, &config.config)?;

        if result.approximate {
            warn!(
                candidate = %candidate_id,
                total_weight = result.total_weight,
                "aggregate computed from weights that do not total 100"
            );
        }
        info!(
            candidate = %candidate_id,
            overall_score = result.overall_score,
            recommendation = result.recommendation.label(),
            config_version = config.version,
            "candidate aggregate computed"
        );
        Ok(result)
    }

    fn save_config(
        &self,
        config: ScoringConfig,
        expected_version: Option<u64>,
    ) -> Result<VersionedScoringConfig, ScoringServiceError> {
        let saved = self.config.save(config, expected_version)?;
        let weights = &saved.config.weights;
        if !weights.is_valid() {
            warn!(
                total_weight = weights.total_weight(),
                version = saved.version,
                "scoring weights no longer total 100"
            );
        }
        info!(version = saved.version, "scoring configuration updated");
        Ok(saved)
    }

    fn fetch(&self, candidate_id: &CandidateId) -> Result<CandidateRecord, ScoringServiceError> {
        self.scores
            .fetch(candidate_id)?
            .ok_or_else(|| ScoringServiceError::UnknownCandidate(candidate_id.clone()))
    }

    fn load_or_create(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateRecord, ScoringServiceError> {
        Ok(self
            .scores
            .fetch(candidate_id)?
            .unwrap_or_else(|| CandidateRecord::new(candidate_id.clone())))
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error("candidate {0} has no recorded scores")]
    UnknownCandidate(CandidateId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl ScoringServiceError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ScoringServiceError::Scoring(ScoringError::Validation(error)) => Some(error),
            _ => None,
        }
    }
}

//! Weighted candidate scoring: recorded category scores, operator-tuned
//! weights and thresholds, reviewer overrides, and the aggregate that turns
//! them into a hiring recommendation.
//!
//! [`aggregate`] is the pure core. [`ScoringService`] wires it to the
//! repository and audit traits, and [`scoring_router`] exposes the service
//! over HTTP.

pub mod domain;
pub(crate) mod evaluation;
pub mod import;
pub mod overrides;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{CandidateId, Category, CategoryScore, ScoringError, ValidationError};
pub use evaluation::{
    aggregate, AggregateResult, AggregationEngine, ContributionSource, Recommendation,
    ScoreContribution, ScoringConfig, ThresholdConfiguration, WeightConfiguration, FULL_WEIGHT,
};
pub use import::{ImportError, ScorecardImporter};
pub use overrides::{OverrideSet, ScoreOverride};
pub use repository::{
    AuditAction, AuditError, AuditEvent, AuditPublisher, CandidateRecord, RepositoryError,
    ScoreRepository, ScorecardView, ScoringConfigView, VersionedScoringConfig,
    WeightConfigRepository,
};
pub use router::scoring_router;
pub use service::{ScoringService, ScoringServiceError};

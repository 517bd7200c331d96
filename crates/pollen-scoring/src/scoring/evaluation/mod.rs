mod config;
mod policy;
mod rules;

pub use config::{ScoringConfig, ThresholdConfiguration, WeightConfiguration, FULL_WEIGHT};
pub use policy::Recommendation;

use super::domain::{CandidateId, Category, ScoringError};
use super::overrides::OverrideSet;
use super::store::CandidateScorecard;
use rules::{round_for_display, weigh_scorecard};
use serde::{Deserialize, Serialize};

/// Stateless aggregator applying a scoring configuration to a scorecard.
pub struct AggregationEngine {
    config: ScoringConfig,
}

impl AggregationEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn compute(
        &self,
        scorecard: &CandidateScorecard,
        overrides: &OverrideSet,
    ) -> Result<AggregateResult, ScoringError> {
        aggregate(scorecard, overrides, &self.config)
    }
}

/// Combine recorded scores, active overrides, and configuration into one result.
pub fn aggregate(
    scorecard: &CandidateScorecard,
    overrides: &OverrideSet,
    config: &ScoringConfig,
) -> Result<AggregateResult, ScoringError> {
    let (contributions, sum) = weigh_scorecard(scorecard, overrides, &config.weights)?;

    let overall_score = round_for_display(sum.precise_score);
    let recommendation = config.thresholds.classify(overall_score);

    Ok(AggregateResult {
        candidate_id: scorecard.candidate_id.clone(),
        overall_score,
        precise_score: sum.precise_score,
        recommendation,
        approximate: sum.approximate,
        total_weight: sum.total_weight,
        contributions,
    })
}

/// Where a contribution's effective score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionSource {
    Recorded,
    Override,
}

/// One category's share of the overall score, kept for audit display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub category: Category,
    pub weight: f64,
    pub effective_score: f64,
    pub source: ContributionSource,
    pub weighted_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_reason: Option<String>,
}

/// Overall score and recommendation for a candidate.
///
/// `overall_score` is rounded to one decimal place and drives the
/// recommendation; `precise_score` keeps full precision for further
/// composition. `approximate` is set when the weights do not total 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub candidate_id: CandidateId,
    pub overall_score: f64,
    pub precise_score: f64,
    pub recommendation: Recommendation,
    pub approximate: bool,
    pub total_weight: f64,
    pub contributions: Vec<ScoreContribution>,
}

impl AggregateResult {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{:.1} ({})",
            self.overall_score,
            self.recommendation.summary()
        );
        if self.approximate {
            summary.push_str(&format!(
                "; approximate, weights total {:.1}",
                self.total_weight
            ));
        }
        summary
    }

    pub fn contribution(&self, category: Category) -> Option<&ScoreContribution> {
        self.contributions
            .iter()
            .find(|contribution| contribution.category == category)
    }
}

use super::super::domain::ScoringError;
use super::super::overrides::OverrideSet;
use super::super::store::CandidateScorecard;
use super::config::{WeightConfiguration, FULL_WEIGHT};
use super::{ContributionSource, ScoreContribution};

pub(crate) struct WeightedSum {
    pub precise_score: f64,
    pub total_weight: f64,
    pub approximate: bool,
}

/// Resolve each weighted category's effective score and its contribution.
///
/// Fails on the first weighted category that has neither an override nor a
/// recorded score; no partial sum is returned.
pub(crate) fn weigh_scorecard(
    scorecard: &CandidateScorecard,
    overrides: &OverrideSet,
    weights: &WeightConfiguration,
) -> Result<(Vec<ScoreContribution>, WeightedSum), ScoringError> {
    let mut contributions = Vec::new();
    let mut precise_score = 0.0;

    for (category, weight) in weights.iter() {
        let (effective_score, source, override_reason) = match overrides.get(category) {
            Some(entry) => (
                entry.score(),
                ContributionSource::Override,
                Some(entry.reason().to_string()),
            ),
            None => (
                scorecard.get_score(category)?,
                ContributionSource::Recorded,
                None,
            ),
        };

        let weighted_score = effective_score * (weight / FULL_WEIGHT);
        precise_score += weighted_score;

        contributions.push(ScoreContribution {
            category,
            weight,
            effective_score,
            source,
            weighted_score,
            override_reason,
        });
    }

    let sum = WeightedSum {
        precise_score,
        total_weight: weights.total_weight(),
        approximate: !weights.is_valid(),
    };

    Ok((contributions, sum))
}

pub(crate) fn round_for_display(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

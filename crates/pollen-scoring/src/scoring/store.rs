use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{CandidateId, Category, CategoryScore, ScoringError, ValidationError};

/// Recorded category scores for one candidate.
///
/// Values arrive from the assessment pipeline. A category that was never
/// assessed stays absent; lookups report it rather than defaulting to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScorecard {
    pub candidate_id: CandidateId,
    scores: BTreeMap<Category, f64>,
}

impl CandidateScorecard {
    pub fn new(candidate_id: CandidateId) -> Self {
        Self {
            candidate_id,
            scores: BTreeMap::new(),
        }
    }

    pub fn with_scores<I>(candidate_id: CandidateId, scores: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (Category, f64)>,
    {
        let mut scorecard = Self::new(candidate_id);
        for (category, value) in scores {
            scorecard.record(category, value)?;
        }
        Ok(scorecard)
    }

    /// Record a score, replacing any earlier value for a re-assessment.
    pub fn record(&mut self, category: Category, value: f64) -> Result<(), ValidationError> {
        let score = CategoryScore::new(category, value)?;
        self.scores.insert(score.category, score.value);
        Ok(())
    }

    pub fn get_score(&self, category: Category) -> Result<f64, ScoringError> {
        self.scores
            .get(&category)
            .copied()
            .ok_or_else(|| ScoringError::NotFound {
                candidate_id: self.candidate_id.clone(),
                category,
            })
    }

    pub fn contains(&self, category: Category) -> bool {
        self.scores.contains_key(&category)
    }

    pub fn scores(&self) -> impl Iterator<Item = CategoryScore> + '_ {
        self.scores
            .iter()
            .map(|(category, value)| CategoryScore {
                category: *category,
                value: *value,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

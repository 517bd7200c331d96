use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lower bound shared by category scores, override scores, and weights.
pub const MIN_SCORE: f64 = 0.0;
/// Upper bound shared by category scores, override scores, and weights.
pub const MAX_SCORE: f64 = 100.0;

/// Identifier wrapper for candidates moving through review.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named dimension of candidate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Category {
    Skills,
    Behavioural,
    Assessment,
    Experience,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Skills,
        Category::Behavioural,
        Category::Assessment,
        Category::Experience,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Skills => "skills",
            Category::Behavioural => "behavioural",
            Category::Assessment => "assessment",
            Category::Experience => "experience",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skills" => Ok(Self::Skills),
            "behavioural" | "behavioral" => Ok(Self::Behavioural),
            "assessment" => Ok(Self::Assessment),
            "experience" => Ok(Self::Experience),
            _ => Err(ValidationError::UnknownCategory(value.trim().to_string())),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Single recorded sub-score produced by the assessment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub value: f64,
}

impl CategoryScore {
    pub fn new(category: Category, value: f64) -> Result<Self, ValidationError> {
        if !within_bounds(value) {
            return Err(ValidationError::ScoreOutOfRange { category, value });
        }
        Ok(Self { category, value })
    }
}

/// Input rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown scoring category '{0}'")]
    UnknownCategory(String),
    #[error("weight {percentage} for {category} is outside 0-100")]
    WeightOutOfRange { category: Category, percentage: f64 },
    #[error("score {value} for {category} is outside 0-100")]
    ScoreOutOfRange { category: Category, value: f64 },
    #[error("override for {category} requires a justification")]
    EmptyOverrideReason { category: Category },
    #[error("{tier} threshold {value} is outside 0-100")]
    ThresholdOutOfRange { tier: &'static str, value: f64 },
    #[error("thresholds must descend: strong_hire {strong_hire} >= hire {hire} >= maybe {maybe}")]
    ThresholdsOutOfOrder {
        strong_hire: f64,
        hire: f64,
        maybe: f64,
    },
}

/// Failure of an aggregation or store lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("candidate {candidate_id} has no {category} score")]
    NotFound {
        candidate_id: CandidateId,
        category: Category,
    },
}

/// NaN fails the range check, so it is rejected along with out-of-range values.
pub(crate) fn within_bounds(value: f64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&value)
}

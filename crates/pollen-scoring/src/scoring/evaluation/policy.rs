use super::config::ThresholdConfiguration;
use serde::{Deserialize, Serialize};

/// Hiring recommendation derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongHire,
    Hire,
    Maybe,
    NoHire,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongHire => "strong_hire",
            Recommendation::Hire => "hire",
            Recommendation::Maybe => "maybe",
            Recommendation::NoHire => "no_hire",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Recommendation::StrongHire => "strong hire: advance immediately",
            Recommendation::Hire => "hire: advance to offer review",
            Recommendation::Maybe => "maybe: needs further evaluation",
            Recommendation::NoHire => "no hire: does not meet the bar",
        }
    }
}

impl ThresholdConfiguration {
    /// Tiers use inclusive lower bounds, so a boundary score lands in the higher tier.
    pub fn classify(&self, score: f64) -> Recommendation {
        if score >= self.strong_hire() {
            Recommendation::StrongHire
        } else if score >= self.hire() {
            Recommendation::Hire
        } else if score >= self.maybe() {
            Recommendation::Maybe
        } else {
            Recommendation::NoHire
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{within_bounds, Category, ValidationError};

/// Weights are percentages; a well-formed configuration totals this value.
pub const FULL_WEIGHT: f64 = 100.0;
const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Relative importance of each category in the overall score.
///
/// Only categories present here take part in aggregation. A total other than
/// 100 is allowed; results computed from it are flagged as approximate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightConfiguration {
    weights: BTreeMap<Category, f64>,
}

impl Default for WeightConfiguration {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (Category::Skills, 40.0),
            (Category::Behavioural, 30.0),
            (Category::Assessment, 20.0),
            (Category::Experience, 10.0),
        ]);
        Self { weights }
    }
}

impl WeightConfiguration {
    /// Configuration with no weighted categories.
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    pub fn from_weights<I>(weights: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (Category, f64)>,
    {
        let mut config = Self::empty();
        for (category, percentage) in weights {
            config.set_weight(category, percentage)?;
        }
        Ok(config)
    }

    pub fn set_weight(&mut self, category: Category, percentage: f64) -> Result<(), ValidationError> {
        if !within_bounds(percentage) {
            return Err(ValidationError::WeightOutOfRange {
                category,
                percentage,
            });
        }
        self.weights.insert(category, percentage);
        Ok(())
    }

    /// Stop weighting a category, returning its previous weight.
    pub fn exclude(&mut self, category: Category) -> Option<f64> {
        self.weights.remove(&category)
    }

    pub fn weight(&self, category: Category) -> Option<f64> {
        self.weights.get(&category).copied()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn is_valid(&self) -> bool {
        (self.total_weight() - FULL_WEIGHT).abs() < WEIGHT_TOLERANCE
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.weights
            .iter()
            .map(|(category, weight)| (*category, *weight))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.weights.keys().copied()
    }
}

impl<'de> Deserialize<'de> for WeightConfiguration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<Category, f64>::deserialize(deserializer)?;
        Self::from_weights(raw).map_err(serde::de::Error::custom)
    }
}

/// Lower bounds (inclusive) of each recommendation tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholds")]
pub struct ThresholdConfiguration {
    strong_hire: f64,
    hire: f64,
    maybe: f64,
}

#[derive(Deserialize)]
struct RawThresholds {
    strong_hire: f64,
    hire: f64,
    maybe: f64,
}

impl TryFrom<RawThresholds> for ThresholdConfiguration {
    type Error = ValidationError;

    fn try_from(raw: RawThresholds) -> Result<Self, Self::Error> {
        Self::new(raw.strong_hire, raw.hire, raw.maybe)
    }
}

impl Default for ThresholdConfiguration {
    fn default() -> Self {
        Self {
            strong_hire: 85.0,
            hire: 70.0,
            maybe: 50.0,
        }
    }
}

impl ThresholdConfiguration {
    pub fn new(strong_hire: f64, hire: f64, maybe: f64) -> Result<Self, ValidationError> {
        for (tier, value) in [("strong_hire", strong_hire), ("hire", hire), ("maybe", maybe)] {
            if !within_bounds(value) {
                return Err(ValidationError::ThresholdOutOfRange { tier, value });
            }
        }
        if strong_hire < hire || hire < maybe {
            return Err(ValidationError::ThresholdsOutOfOrder {
                strong_hire,
                hire,
                maybe,
            });
        }

        Ok(Self {
            strong_hire,
            hire,
            maybe,
        })
    }

    pub fn strong_hire(&self) -> f64 {
        self.strong_hire
    }

    pub fn hire(&self) -> f64 {
        self.hire
    }

    pub fn maybe(&self) -> f64 {
        self.maybe
    }
}

/// Weights and thresholds consulted together by every scoring surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: WeightConfiguration,
    #[serde(default)]
    pub thresholds: ThresholdConfiguration,
}

use super::common::*;
use crate::scoring::domain::{Category, ValidationError};
use crate::scoring::evaluation::{ScoringConfig, ThresholdConfiguration, WeightConfiguration};

#[test]
fn defaults_total_one_hundred() {
    let weights = WeightConfiguration::default();

    assert_eq!(weights.total_weight(), 100.0);
    assert!(weights.is_valid());
    assert_eq!(weights, default_weights());
}

#[test]
fn set_weight_replaces_and_reports_validity() {
    let mut weights = default_weights();

    weights
        .set_weight(Category::Experience, 20.0)
        .expect("in range");

    assert_eq!(weights.weight(Category::Experience), Some(20.0));
    assert_eq!(weights.total_weight(), 110.0);
    assert!(!weights.is_valid());

    weights
        .set_weight(Category::Skills, 30.0)
        .expect("in range");
    assert!(weights.is_valid());
}

#[test]
fn out_of_range_weights_are_rejected_without_mutation() {
    let mut weights = default_weights();

    for percentage in [-0.5, 100.5, f64::NAN, f64::INFINITY] {
        match weights.set_weight(Category::Skills, percentage) {
            Err(ValidationError::WeightOutOfRange { category, .. }) => {
                assert_eq!(category, Category::Skills)
            }
            other => panic!("expected weight rejection for {percentage}, got {other:?}"),
        }
    }

    assert_eq!(weights.weight(Category::Skills), Some(40.0));
}

#[test]
fn boundary_weights_are_accepted() {
    let mut weights = WeightConfiguration::empty();

    weights.set_weight(Category::Skills, 0.0).expect("zero allowed");
    weights
        .set_weight(Category::Behavioural, 100.0)
        .expect("hundred allowed");

    assert!(weights.is_valid());
}

#[test]
fn exclude_removes_category_from_configuration() {
    let mut weights = default_weights();

    assert_eq!(weights.exclude(Category::Experience), Some(10.0));
    assert_eq!(weights.exclude(Category::Experience), None);
    assert_eq!(weights.total_weight(), 90.0);
    assert!(weights.categories().all(|category| category != Category::Experience));
}

#[test]
fn category_names_parse_case_insensitively() {
    assert_eq!("Skills".parse::<Category>(), Ok(Category::Skills));
    assert_eq!(" behavioral ".parse::<Category>(), Ok(Category::Behavioural));
    assert_eq!(
        "culture".parse::<Category>(),
        Err(ValidationError::UnknownCategory("culture".to_string()))
    );
}

#[test]
fn thresholds_must_be_ordered_and_bounded() {
    assert!(ThresholdConfiguration::new(85.0, 70.0, 50.0).is_ok());
    assert!(ThresholdConfiguration::new(70.0, 70.0, 70.0).is_ok());

    assert!(matches!(
        ThresholdConfiguration::new(60.0, 70.0, 50.0),
        Err(ValidationError::ThresholdsOutOfOrder { .. })
    ));
    assert!(matches!(
        ThresholdConfiguration::new(120.0, 70.0, 50.0),
        Err(ValidationError::ThresholdOutOfRange {
            tier: "strong_hire",
            ..
        })
    ));
}

#[test]
fn scoring_config_deserializes_with_validation() {
    let config: ScoringConfig = serde_json::from_str(
        r#"{"weights":{"skills":40,"behavioural":30,"assessment":20,"experience":10}}"#,
    )
    .expect("valid config");
    assert_eq!(config, scoring_config());

    let bad_weight =
        serde_json::from_str::<ScoringConfig>(r#"{"weights":{"skills":101}}"#);
    assert!(bad_weight.is_err());

    let bad_category =
        serde_json::from_str::<ScoringConfig>(r#"{"weights":{"charisma":10}}"#);
    assert!(bad_category.is_err());

    let bad_thresholds = serde_json::from_str::<ScoringConfig>(
        r#"{"weights":{},"thresholds":{"strong_hire":50,"hire":70,"maybe":60}}"#,
    );
    assert!(bad_thresholds.is_err());
}

#[test]
fn json_category_names_match_path_and_csv_parsing() {
    let config: ScoringConfig = serde_json::from_str(
        r#"{"weights":{"Skills":40,"behavioral":30," ASSESSMENT ":20,"experience":10}}"#,
    )
    .expect("category aliases accepted");
    assert_eq!(config, scoring_config());

    let category: Category = serde_json::from_str(r#""Behavioral""#).expect("alias parses");
    assert_eq!(category, Category::Behavioural);
    assert_eq!(
        serde_json::to_string(&Category::Behavioural).expect("serializes"),
        r#""behavioural""#
    );

    let err = serde_json::from_str::<Category>(r#""culture""#).expect_err("unknown category");
    assert!(err.to_string().contains("unknown scoring category 'culture'"));
}

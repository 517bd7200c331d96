use crate::infra::{
    parse_weights_arg, InMemoryAuditPublisher, InMemoryScoreRepository,
    InMemoryWeightConfigRepository,
};
use clap::Args;
use pollen_scoring::error::AppError;
use pollen_scoring::scoring::{
    aggregate, AggregateResult, CandidateId, Category, OverrideSet, ScorecardImporter,
    ScoringConfig, ScoringError, ScoringService, WeightConfiguration,
};
use pollen_scoring::scoring::store::CandidateScorecard;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Candidate identifier used for the walkthrough.
    #[arg(long, default_value = "cand-demo")]
    pub(crate) candidate: String,
    /// Skip the reviewer override portion of the demo.
    #[arg(long)]
    pub(crate) skip_override: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchScoreArgs {
    /// Assessment export with columns candidate_id,category,score
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Weights as category=percentage pairs, e.g. skills=40,behavioural=30
    #[arg(long, value_parser = parse_weights_arg)]
    pub(crate) weights: Option<WeightConfiguration>,
}

pub(crate) fn run_batch_score(args: BatchScoreArgs) -> Result<(), AppError> {
    let BatchScoreArgs { csv, weights } = args;

    let config = ScoringConfig {
        weights: weights.unwrap_or_default(),
        ..ScoringConfig::default()
    };
    if !config.weights.is_valid() {
        println!(
            "warning: weights total {:.1}, results are approximate",
            config.weights.total_weight()
        );
    }

    let scorecards = ScorecardImporter::from_path(&csv)?;
    println!(
        "Scoring {} candidate(s) from {}",
        scorecards.len(),
        csv.display()
    );

    for (candidate_id, outcome) in score_batch(&scorecards, &config) {
        match outcome {
            Ok(result) => println!("  {}: {}", candidate_id, result.summary()),
            Err(err) => println!("  {}: not scored ({err})", candidate_id),
        }
    }

    Ok(())
}

/// Aggregate each imported scorecard independently; one failure does not stop the rest.
pub(crate) fn score_batch(
    scorecards: &[CandidateScorecard],
    config: &ScoringConfig,
) -> Vec<(CandidateId, Result<AggregateResult, ScoringError>)> {
    let no_overrides = OverrideSet::new();
    scorecards
        .iter()
        .map(|scorecard| {
            (
                scorecard.candidate_id.clone(),
                aggregate(scorecard, &no_overrides, config),
            )
        })
        .collect()
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        candidate,
        skip_override,
    } = args;

    let audit = Arc::new(InMemoryAuditPublisher::default());
    let service = ScoringService::new(
        Arc::new(InMemoryScoreRepository::default()),
        Arc::new(InMemoryWeightConfigRepository::new(ScoringConfig::default())),
        audit.clone(),
    );
    let candidate_id = CandidateId(candidate);

    println!("Candidate scoring demo");
    let config = service.configuration()?;
    println!("Weights (version {}):", config.version);
    for (category, weight) in config.config.weights.iter() {
        println!("  {:<12} {:>5.1}%", category.label(), weight);
    }

    for (category, value) in [
        (Category::Skills, 88.0),
        (Category::Behavioural, 95.0),
        (Category::Assessment, 95.0),
        (Category::Experience, 90.0),
    ] {
        service.record_score(&candidate_id, category, value)?;
    }

    let baseline = service.compute(&candidate_id)?;
    render_aggregate("Recorded scores", &baseline);

    if skip_override {
        return Ok(());
    }

    service.apply_override(
        &candidate_id,
        Category::Behavioural,
        70.0,
        "panel disagreed with automated score",
        Some("demo-reviewer"),
    )?;
    let overridden = service.compute(&candidate_id)?;
    render_aggregate("After behavioural override", &overridden);

    service.remove_override(&candidate_id, Category::Behavioural)?;
    let reverted = service.compute(&candidate_id)?;
    render_aggregate("After reverting the override", &reverted);

    println!("\nAudit trail");
    for event in audit.events() {
        let reason = event.details.get("reason").map(String::as_str).unwrap_or("-");
        println!(
            "  {:?} {} {}: {}",
            event.action, event.candidate_id, event.category, reason
        );
    }

    Ok(())
}

fn render_aggregate(title: &str, result: &AggregateResult) {
    println!("\n{title}");
    for contribution in &result.contributions {
        let marker = contribution
            .override_reason
            .as_deref()
            .map(|reason| format!(" (override: {reason})"))
            .unwrap_or_default();
        println!(
            "  {:<12} {:>5.1} x {:>4.1}% = {:>5.2}{}",
            contribution.category.label(),
            contribution.effective_score,
            contribution.weight,
            contribution.weighted_score,
            marker
        );
    }
    println!("  overall: {}", result.summary());
}

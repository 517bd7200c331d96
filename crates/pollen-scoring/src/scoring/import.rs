use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{CandidateId, Category, ValidationError};
use super::store::CandidateScorecard;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, source: ValidationError },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read score export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid score CSV data: {}", err),
            ImportError::Row { line, source } => {
                write!(f, "rejected score on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Row { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads scorecards from an assessment pipeline export.
///
/// Expected header: `candidate_id,category,score`. A blank score means "not
/// assessed": the candidate is still listed but the category stays missing.
pub struct ScorecardImporter;

impl ScorecardImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateScorecard>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CandidateScorecard>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut scorecards: BTreeMap<CandidateId, CandidateScorecard> = BTreeMap::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            let row: ScoreRow = record.deserialize(Some(&headers))?;

            let category = row
                .category
                .parse::<Category>()
                .map_err(|source| ImportError::Row { line, source })?;
            let candidate_id = CandidateId(row.candidate_id);
            // candidates with only blank cells still get a scorecard
            let scorecard = scorecards
                .entry(candidate_id.clone())
                .or_insert_with(|| CandidateScorecard::new(candidate_id));
            let Some(score) = row.score else {
                continue;
            };
            scorecard
                .record(category, score)
                .map_err(|source| ImportError::Row { line, source })?;
        }

        Ok(scorecards.into_values().collect())
    }
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    candidate_id: String,
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    score: Option<f64>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|err| serde::de::Error::custom(format!("invalid score '{raw}': {err}"))),
    }
}

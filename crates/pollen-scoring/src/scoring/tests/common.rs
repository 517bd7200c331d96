use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::scoring::domain::{CandidateId, Category};
use crate::scoring::evaluation::{ScoringConfig, WeightConfiguration};
use crate::scoring::repository::{
    AuditError, AuditEvent, AuditPublisher, CandidateRecord, RepositoryError, ScoreRepository,
    VersionedScoringConfig, WeightConfigRepository,
};
use crate::scoring::store::CandidateScorecard;
use crate::scoring::{scoring_router, ScoringService};

pub(super) fn candidate_id() -> CandidateId {
    CandidateId("cand-0042".to_string())
}

pub(super) fn default_weights() -> WeightConfiguration {
    WeightConfiguration::from_weights([
        (Category::Skills, 40.0),
        (Category::Behavioural, 30.0),
        (Category::Assessment, 20.0),
        (Category::Experience, 10.0),
    ])
    .expect("valid weights")
}

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig {
        weights: default_weights(),
        thresholds: Default::default(),
    }
}

/// Scores from the panel review of the worked example: 91.7 overall.
pub(super) fn scorecard() -> CandidateScorecard {
    CandidateScorecard::with_scores(
        candidate_id(),
        [
            (Category::Skills, 88.0),
            (Category::Behavioural, 95.0),
            (Category::Assessment, 95.0),
            (Category::Experience, 90.0),
        ],
    )
    .expect("valid scores")
}

pub(super) fn seeded_record() -> CandidateRecord {
    CandidateRecord {
        scorecard: scorecard(),
        overrides: Default::default(),
    }
}

pub(super) type TestService = ScoringService<MemoryScores, MemoryConfig, MemoryAudit>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryScores>,
    Arc<MemoryConfig>,
    Arc<MemoryAudit>,
) {
    let scores = Arc::new(MemoryScores::default());
    let config = Arc::new(MemoryConfig::new(scoring_config()));
    let audit = Arc::new(MemoryAudit::default());
    let service = ScoringService::new(scores.clone(), config.clone(), audit.clone());
    (service, scores, config, audit)
}

pub(super) fn seeded_service() -> (TestService, Arc<MemoryScores>, Arc<MemoryAudit>) {
    let (service, scores, _, audit) = build_service();
    scores.upsert(seeded_record()).expect("seed record");
    (service, scores, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemoryScores {
    pub(super) records: Arc<Mutex<HashMap<CandidateId, CandidateRecord>>>,
}

impl ScoreRepository for MemoryScores {
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, record: CandidateRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.candidate_id().clone(), record);
        Ok(())
    }
}

pub(super) struct MemoryConfig {
    current: Mutex<VersionedScoringConfig>,
}

impl MemoryConfig {
    pub(super) fn new(config: ScoringConfig) -> Self {
        Self {
            current: Mutex::new(VersionedScoringConfig {
                config,
                version: 1,
                updated_at: Utc::now(),
            }),
        }
    }
}

impl WeightConfigRepository for MemoryConfig {
    fn load(&self) -> Result<VersionedScoringConfig, RepositoryError> {
        Ok(self.current.lock().expect("config mutex poisoned").clone())
    }

    fn save(
        &self,
        config: ScoringConfig,
        expected_version: Option<u64>,
    ) -> Result<VersionedScoringConfig, RepositoryError> {
        let mut guard = self.current.lock().expect("config mutex poisoned");
        if let Some(expected) = expected_version {
            if expected != guard.version {
                return Err(RepositoryError::Conflict {
                    expected,
                    current: guard.version,
                });
            }
        }
        *guard = VersionedScoringConfig {
            config,
            version: guard.version + 1,
            updated_at: Utc::now(),
        };
        Ok(guard.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAudit {
    pub(super) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditPublisher for MemoryAudit {
    fn publish(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct UnavailableScores;

impl ScoreRepository for UnavailableScores {
    fn fetch(&self, _id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _record: CandidateRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct OfflineAudit;

impl AuditPublisher for OfflineAudit {
    fn publish(&self, _event: AuditEvent) -> Result<(), AuditError> {
        Err(AuditError::Transport("audit sink offline".to_string()))
    }
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    scoring_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use pollen_scoring::config::ConfigError;
use pollen_scoring::scoring::{
    AuditError, AuditEvent, AuditPublisher, CandidateId, CandidateRecord, Category,
    RepositoryError, ScoreRepository, ScoringConfig, VersionedScoringConfig,
    WeightConfigRepository, WeightConfiguration,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreRepository {
    records: Arc<Mutex<HashMap<CandidateId, CandidateRecord>>>,
}

impl ScoreRepository for InMemoryScoreRepository {
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

/// Single-writer configuration store; versions start at 1 and bump on every save.
pub(crate) struct InMemoryWeightConfigRepository {
    current: Mutex<VersionedScoringConfig>,
}

impl InMemoryWeightConfigRepository {
    pub(crate) fn new(config: ScoringConfig) -> Self {
        Self {
            current: Mutex::new(VersionedScoringConfig {
                config,
                version: 1,
                updated_at: Utc::now(),
            }),
        }
    }
}

impl WeightConfigRepository for InMemoryWeightConfigRepository {
    fn load(&self) -> Result<VersionedScoringConfig, RepositoryError> {
        let guard = self.current.lock().expect("config mutex poisoned");
        Ok(guard.clone())
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

/// Keeps the override trail in memory and mirrors it to the log.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditPublisher {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl AuditPublisher for InMemoryAuditPublisher {
    fn publish(&self, event: AuditEvent) -> Result<(), AuditError> {
        info!(
            action = ?event.action,
            candidate = %event.candidate_id,
            category = %event.category,
            "audit event recorded"
        );
        let mut guard = self.events.lock().expect("audit mutex poisoned");
        guard.push(event);
        Ok(())
    }
}

impl InMemoryAuditPublisher {
    pub(crate) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

/// Parse `skills=40,behavioural=30,...` into a weight configuration.
pub(crate) fn parse_weights(raw: &str) -> Result<WeightConfiguration, ConfigError> {
    let mut weights = WeightConfiguration::empty();
    for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
        let malformed = || ConfigError::MalformedWeight(pair.to_string());
        let (name, value) = pair.split_once('=').ok_or_else(malformed)?;
        let category = name.parse::<Category>()?;
        let percentage = value.trim().parse::<f64>().map_err(|_| malformed())?;
        weights.set_weight(category, percentage)?;
    }
    Ok(weights)
}

pub(crate) fn parse_weights_arg(raw: &str) -> Result<WeightConfiguration, String> {
    parse_weights(raw).map_err(|err| err.to_string())
}

//! Test doubles for the classifier, gateway and store seams

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::alert::{GatewayError, SmsGateway};
use crate::db::{RecordStore, StoreError};
use crate::inference::{Classifier, ModelError, ModelRegistry, PredictionResult};
use crate::models::{DisasterRecord, FeatureVector};
use crate::AppState;

/// Always returns the same verdict
pub struct FixedClassifier(pub PredictionResult);

impl Classifier for FixedClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        Ok(self.0)
    }
}

struct CountingClassifier {
    result: PredictionResult,
    calls: Arc<AtomicUsize>,
}

impl Classifier for CountingClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<PredictionResult, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result)
    }
}

/// Records every publish; optionally fails each one
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingGateway {
    pub fn failing() -> Self {
        Self { calls: Mutex::default(), fail: true }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SmsGateway for RecordingGateway {
    async fn publish(&self, destination: &str, message: &str) -> Result<String, GatewayError> {
        let mut calls = self.calls.lock();
        calls.push((destination.to_string(), message.to_string()));
        if self.fail {
            return Err(GatewayError("simulated outage".to_string()));
        }
        Ok(format!("msg-{}", calls.len()))
    }
}

/// In-memory store; a failing store keeps nothing
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<DisasterRecord>>,
    fail: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        Self { records: Mutex::default(), fail: true }
    }

    pub fn records(&self) -> Vec<DisasterRecord> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save(&self, record: &DisasterRecord) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Connect(sqlx::Error::PoolTimedOut));
        }
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// An `AppState` wired to fakes, with handles to inspect them
pub struct TestServices {
    pub state: AppState,
    pub gateway: Arc<RecordingGateway>,
    pub store: Arc<MemoryStore>,
    predictions: Arc<AtomicUsize>,
}

impl TestServices {
    /// Every classifier answers `result`
    pub fn new(result: PredictionResult) -> Self {
        let predictions = Arc::new(AtomicUsize::new(0));
        let models = ModelRegistry::from_classifiers(|_, _| {
            Box::new(CountingClassifier { result, calls: predictions.clone() }) as Box<dyn Classifier>
        });

        let gateway = Arc::new(RecordingGateway::default());
        let store = Arc::new(MemoryStore::default());

        Self {
            state: AppState {
                models: Arc::new(models),
                gateway: gateway.clone(),
                store: store.clone(),
            },
            gateway,
            store,
            predictions,
        }
    }

    pub fn with_failing_gateway(mut self) -> Self {
        self.gateway = Arc::new(RecordingGateway::failing());
        self.state.gateway = self.gateway.clone();
        self
    }

    pub fn with_failing_store(mut self) -> Self {
        self.store = Arc::new(MemoryStore::failing());
        self.state.store = self.store.clone();
        self
    }

    pub fn predictions(&self) -> usize {
        self.predictions.load(Ordering::SeqCst)
    }
}

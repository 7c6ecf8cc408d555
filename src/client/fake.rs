use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout};

use crate::client::{ApiError, DashboardApi};
use crate::models::{PendingFile, TransactionRecord};

/// Scripted in-memory backend that records how often each endpoint was hit.
#[derive(Default)]
pub struct FakeDashboardApi {
    failing_files: HashSet<String>,
    delays: HashMap<String, Duration>,
    responses: Mutex<VecDeque<Result<Vec<TransactionRecord>, String>>>,
    fetch_gate: Option<Arc<Semaphore>>,
    convert_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    converted: Mutex<Vec<String>>
}

impl FakeDashboardApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads of a file with this name fail with a transport-like error.
    pub fn failing(mut self, file_name: &str) -> Self {
        self.failing_files.insert(file_name.to_string());
        self
    }

    /// Uploads of a file with this name take `delay` before they settle.
    pub fn delayed(mut self, file_name: &str, delay: Duration) -> Self {
        self.delays.insert(file_name.to_string(), delay);
        self
    }

    /// Queues the payload returned by the next fetch. Once the queue is empty fetches return `[]`.
    pub fn respond_with(self, rows: Value) -> Self {
        let rows = serde_json::from_value(rows).map_err(|error| error.to_string());
        self.push_response(rows)
    }

    pub fn respond_malformed(self, reason: &str) -> Self {
        self.push_response(Err(reason.to_string()))
    }

    /// Every fetch consumes one permit of `gate` before returning.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    fn push_response(self, response: Result<Vec<TransactionRecord>, String>) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
        self
    }

    pub fn convert_calls(&self) -> usize {
        self.convert_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn converted(&self) -> Vec<String> {
        self.converted.lock().map(|names| names.clone()).unwrap_or_default()
    }
}

impl DashboardApi for FakeDashboardApi {
    async fn convert(&self, file: &PendingFile) -> Result<Value, ApiError> {
        self.convert_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let name = file.file_name();

        if let Some(delay) = self.delays.get(&name) {
            sleep(*delay).await;
        }

        if self.failing_files.contains(&name) {
            return Err(ApiError::Status { status: 503, message: "network unreachable".to_string() });
        }

        if let Ok(mut converted) = self.converted.lock() {
            converted.push(name);
        }

        Ok(json!({ "message": "Conversion successful" }))
    }

    async fn fetch_dashboard(&self) -> Result<Vec<TransactionRecord>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.fetch_gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let next = self.responses.lock().ok().and_then(|mut responses| responses.pop_front());

        match next {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(reason)) => Err(ApiError::MalformedPayload(reason)),
            None => Ok(Vec::new())
        }
    }
}

/// Polls `condition` until it holds, failing the test after a second.
pub async fn wait_until(condition: impl Fn() -> bool) -> anyhow::Result<()> {
    timeout(Duration::from_secs(1), async {
        while !condition() {
            sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .map_err(|_| anyhow::anyhow!("condition not reached in time"))
}

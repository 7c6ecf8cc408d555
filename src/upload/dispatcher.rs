use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::client::DashboardApi;
use crate::models::{DashboardError, DashboardSnapshot, PendingFile, UploadOutcome};
use crate::store::StoreHandle;

/// Shared "upload in progress" flag, counted per active batch.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DispatchPhase {
    active_batches: usize
}

impl DispatchPhase {
    pub fn is_dispatching(&self) -> bool {
        self.active_batches > 0
    }
}

/// Holds one batch in the dispatching phase until dropped, so a cancelled `submit` leaves it too.
struct DispatchGuard<'a> {
    phase: &'a watch::Sender<DispatchPhase>
}

impl<'a> DispatchGuard<'a> {
    fn enter(phase: &'a watch::Sender<DispatchPhase>) -> Self {
        phase.send_modify(|phase| phase.active_batches += 1);
        Self { phase }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_modify(|phase| phase.active_batches = phase.active_batches.saturating_sub(1));
    }
}

/// Everything a caller needs to report on one settled batch.
#[derive(Debug)]
pub struct BatchReport {
    /// Per-file outcomes in submission order.
    pub outcomes: Vec<UploadOutcome>,
    /// The snapshot produced by the post-batch refresh, `None` if no file succeeded.
    pub refreshed: Option<DashboardSnapshot>
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DashboardError> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            UploadOutcome::Failed(error) => Some(error),
            UploadOutcome::Succeeded { .. } => None
        })
    }

    /// One line per failed file, or `None` when the whole batch went through.
    pub fn failure_message(&self) -> Option<String> {
        let lines: Vec<String> = self.failures().map(ToString::to_string).collect();

        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

/// Sends upload batches to the conversion endpoint and refreshes the store afterwards.
pub struct UploadDispatcher<A: DashboardApi> {
    api: Arc<A>,
    store: StoreHandle,
    concurrency: usize,
    phase: watch::Sender<DispatchPhase>
}

impl<A: DashboardApi> UploadDispatcher<A> {
    pub fn new(api: Arc<A>, store: StoreHandle) -> Self {
        Self {
            api,
            store,
            concurrency: 4,
            phase: watch::Sender::new(DispatchPhase::default())
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn phase(&self) -> watch::Receiver<DispatchPhase> {
        self.phase.subscribe()
    }

    /// Uploads every file of the batch and, if any succeeded, refreshes the dashboard once.
    ///
    /// The dispatching phase covers the whole batch including the refresh. Individual failures
    /// are recorded in the report and never abort the remaining uploads.
    pub async fn submit(&self, files: Vec<PendingFile>) -> BatchReport {
        let _dispatching = DispatchGuard::enter(&self.phase);

        let total = files.len();
        let outcomes: Vec<UploadOutcome> = stream::iter(files)
            .map(|file| self.upload(file))
            .buffered(self.concurrency)
            .collect()
            .await;

        let succeeded = outcomes.iter().filter(|outcome| outcome.is_success()).count();

        info!("Upload batch settled: {succeeded}/{total} files converted");

        let refreshed = if succeeded > 0 {
            Some(self.store.reload().await)
        } else {
            None
        };

        BatchReport { outcomes, refreshed }
    }

    async fn upload(&self, file: PendingFile) -> UploadOutcome {
        match self.api.convert(&file).await {
            Ok(acknowledgment) => UploadOutcome::Succeeded { file, acknowledgment },
            Err(error) => {
                let error = DashboardError::upload_failed(&file, error);
                warn!("{error}");
                UploadOutcome::Failed(error)
            }
        }
    }
}

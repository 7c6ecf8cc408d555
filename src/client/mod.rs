mod errors;
#[cfg(test)]
pub(crate) mod fake;
mod http_client;

use std::future::Future;

use serde_json::Value;

use crate::models::{PendingFile, TransactionRecord};

pub use errors::ApiError;
pub use http_client::HttpDashboardApi;

/// The two backend endpoints the dashboard talks to.
pub trait DashboardApi: Send + Sync + 'static {
    /// Submits one statement to the conversion endpoint and returns its acknowledgment.
    fn convert(&self, file: &PendingFile) -> impl Future<Output = Result<Value, ApiError>> + Send;

    /// Fetches the full dashboard dataset.
    fn fetch_dashboard(&self) -> impl Future<Output = Result<Vec<TransactionRecord>, ApiError>> + Send;
}

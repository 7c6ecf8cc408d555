use std::sync::Arc;

use crate::models::TransactionRecord;

/// The one authoritative view of dashboard data and its loading/error status.
///
/// Only the dashboard store writes it. Everyone else holds clones, which are cheap because the
/// rows sit behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashboardSnapshot {
    #[default]
    Uninitialized,
    Loading,
    Ready(Arc<Vec<TransactionRecord>>),
    Errored(String)
}

impl DashboardSnapshot {
    pub fn ready(rows: Vec<TransactionRecord>) -> Self {
        DashboardSnapshot::Ready(Arc::new(rows))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DashboardSnapshot::Loading)
    }

    /// True once a fetch has completed, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, DashboardSnapshot::Ready(_) | DashboardSnapshot::Errored(_))
    }

    pub fn rows(&self) -> Option<&[TransactionRecord]> {
        match self {
            DashboardSnapshot::Ready(rows) => Some(rows.as_slice()),
            _ => None
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DashboardSnapshot::Errored(message) => Some(message),
            _ => None
        }
    }
}

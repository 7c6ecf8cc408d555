use std::fmt::Display;

use crate::models::{DashboardError, DashboardSnapshot, TransactionRecord};
use crate::types::RequestSequence;

/// How a refresh request interacts with a fetch that is already in flight.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RefreshMode {
    /// Join the in-flight fetch instead of starting another one.
    Coalesce,
    /// Abandon the in-flight fetch and start a newer one.
    Supersede
}

/// Snapshot transitions of the dashboard store, free of any I/O.
///
/// `begin` hands out a sequence number for every fetch it wants started, `settle` only accepts
/// the result tagged with the most recent one. A response from an abandoned fetch can therefore
/// never overwrite the snapshot.
#[derive(Debug, Default)]
pub struct RefreshMachine {
    snapshot: DashboardSnapshot,
    sequence: RequestSequence,
    in_flight: Option<RequestSequence>
}

impl RefreshMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn in_flight(&self) -> Option<RequestSequence> {
        self.in_flight
    }

    /// Moves to `Loading` and returns the sequence of the fetch to start, or `None` when the
    /// request was coalesced into the fetch already in flight.
    pub fn begin(&mut self, mode: RefreshMode) -> Option<RequestSequence> {
        if self.in_flight.is_some() && mode == RefreshMode::Coalesce {
            return None;
        }

        self.sequence += 1;
        self.in_flight = Some(self.sequence);
        self.snapshot = DashboardSnapshot::Loading;

        Some(self.sequence)
    }

    /// Applies a fetch result. Returns the new snapshot, or `None` if `sequence` is stale.
    ///
    /// Failures replace whatever was shown before; stale rows are never kept behind an error.
    pub fn settle<E: Display>(&mut self, sequence: RequestSequence, result: Result<Vec<TransactionRecord>, E>) -> Option<&DashboardSnapshot> {
        if self.in_flight != Some(sequence) {
            return None;
        }

        self.in_flight = None;
        self.snapshot = match result {
            Ok(rows) => DashboardSnapshot::ready(rows),
            Err(error) => DashboardSnapshot::Errored(DashboardError::refresh_failed(error).to_string())
        };

        Some(&self.snapshot)
    }
}

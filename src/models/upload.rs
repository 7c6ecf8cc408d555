use serde_json::Value;
use std::path::PathBuf;

use crate::models::errors::DashboardError;
use crate::types::BankIdentifier;

/// A local statement waiting to be sent to the conversion endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub bank: BankIdentifier
}

impl PendingFile {
    pub fn new(path: impl Into<PathBuf>, bank: BankIdentifier) -> Self {
        Self {
            path: path.into(),
            bank
        }
    }

    /// The name shown to the user and sent as the multipart file name.
    pub fn file_name(&self) -> String {
        self.path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Settled result of submitting one file.
#[derive(Debug)]
pub enum UploadOutcome {
    Succeeded {
        file: PendingFile,
        acknowledgment: Value
    },
    Failed(DashboardError)
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded { .. })
    }
}

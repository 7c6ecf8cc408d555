use std::fmt::Display;

use crate::models::PendingFile;
use crate::types::BankIdentifier;
use thiserror::Error;

/// User-facing failures of the upload/refresh flow. Each renders as the message shown to the user.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DashboardError {
    #[error("Please select a bank and at least one file.")]
    SelectionInvalid,
    #[error("Failed to upload {file} for {bank}: {cause}. Please try again.")]
    UploadFailed {
        file: String,
        bank: BankIdentifier,
        cause: String
    },
    #[error("Failed to fetch data: {cause}. Please try again.")]
    RefreshFailed {
        cause: String
    }
}

impl DashboardError {
    pub fn upload_failed(file: &PendingFile, cause: impl Display) -> Self {
        Self::UploadFailed {
            file: file.file_name(),
            bank: file.bank,
            cause: cause.to_string()
        }
    }

    pub fn refresh_failed(cause: impl Display) -> Self {
        Self::RefreshFailed {
            cause: cause.to_string()
        }
    }
}

use std::path::PathBuf;

use crate::client::DashboardApi;
use crate::models::{DashboardError, PendingFile};
use crate::types::BankIdentifier;
use crate::upload::{BatchReport, UploadDispatcher};

/// The bank and files the user picked for the next upload.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadSelection {
    bank: Option<BankIdentifier>,
    files: Vec<PathBuf>
}

impl UploadSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bank(&mut self, bank: BankIdentifier) {
        self.bank = Some(bank);
    }

    pub fn set_files(&mut self, files: impl IntoIterator<Item = impl Into<PathBuf>>) {
        self.files = files.into_iter().map(Into::into).collect();
    }

    pub fn bank(&self) -> Option<BankIdentifier> {
        self.bank
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_submittable(&self) -> bool {
        self.bank.is_some() && !self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.bank = None;
        self.files.clear();
    }

    /// Turns a valid selection into a batch and resets the selection to empty.
    ///
    /// An invalid selection is left untouched so the user can complete it.
    pub fn take_batch(&mut self) -> Result<Vec<PendingFile>, DashboardError> {
        let Some(bank) = self.bank.filter(|_| !self.files.is_empty()) else {
            return Err(DashboardError::SelectionInvalid);
        };

        let batch = self.files.drain(..)
            .map(|path| PendingFile::new(path, bank))
            .collect();

        self.clear();

        Ok(batch)
    }

    /// Validates the selection and hands the batch to `dispatcher`.
    ///
    /// Returns `SelectionInvalid` without any network activity when no bank or no file was chosen.
    pub async fn submit<A: DashboardApi>(&mut self, dispatcher: &UploadDispatcher<A>) -> Result<BatchReport, DashboardError> {
        let batch = self.take_batch()?;

        Ok(dispatcher.submit(batch).await)
    }
}

mod errors;
pub mod record;
mod snapshot;
mod upload;

pub use errors::DashboardError;
pub use record::TransactionRecord;
pub use snapshot::DashboardSnapshot;
pub use upload::{PendingFile, UploadOutcome};

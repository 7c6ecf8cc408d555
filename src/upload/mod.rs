mod dispatcher;
mod selection;

pub use dispatcher::{BatchReport, DispatchPhase, UploadDispatcher};
pub use selection::UploadSelection;

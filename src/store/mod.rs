mod dashboard_store;
mod refresh_machine;
#[cfg(test)]
mod tests;

pub use dashboard_store::{DashboardStore, StoreHandle};
pub use refresh_machine::{RefreshMachine, RefreshMode};

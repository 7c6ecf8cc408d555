//! Upload/refresh orchestration for the bank statement dashboard.
//!
//! Statements selected by the user ([`upload::UploadSelection`]) are sent to the conversion
//! endpoint in batches ([`upload::UploadDispatcher`]); once a batch settles with at least one
//! success the [`store::DashboardStore`] fetches the dataset again and publishes a new
//! [`models::DashboardSnapshot`], which the [`views`] render.

pub mod client;
pub mod config;
pub mod models;
pub mod store;
pub mod types;
pub mod upload;
pub mod views;

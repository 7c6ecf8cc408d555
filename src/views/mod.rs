mod overview;
mod spreadsheet;
mod status;
mod summary;

pub use overview::{overview_points, render_overview, OverviewPoint};
pub use spreadsheet::{render_spreadsheet, row_id};
pub use status::render_dashboard;
pub use summary::{render_summary, Summary};

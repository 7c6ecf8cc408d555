use std::io::{self, Write};

use crate::models::DashboardSnapshot;
use crate::upload::DispatchPhase;
use crate::views::{render_overview, render_spreadsheet, render_summary};

/// Renders the dashboard body for the current snapshot.
///
/// The loading indicator wins while either a fetch or an upload batch is in progress; data is
/// only shown once the snapshot is ready and nothing is pending.
pub fn render_dashboard<W: Write>(output: &mut W, snapshot: &DashboardSnapshot, phase: DispatchPhase) -> io::Result<()> {
    if snapshot.is_loading() || phase.is_dispatching() {
        return writeln!(output, "Loading...");
    }

    match snapshot {
        DashboardSnapshot::Uninitialized | DashboardSnapshot::Loading => writeln!(output, "No data loaded."),
        DashboardSnapshot::Errored(message) => writeln!(output, "Error: {message}"),
        DashboardSnapshot::Ready(rows) => {
            render_summary(output, rows)?;
            writeln!(output)?;
            render_overview(output, rows)?;
            writeln!(output)?;
            writeln!(output, "Spreadsheet")?;
            render_spreadsheet(output, rows)
        }
    }
}

use std::io::{self, Write};

use rust_decimal::Decimal;

use crate::models::record::{ACCOUNT_BALANCE, CHART_BALANCE, CHART_DATE, CHART_INCOME, CHART_SPENDING, DATE, DEPOSIT_AMOUNT, WITHDRAWAL_AMOUNT};
use crate::models::TransactionRecord;

const HEADERS: [&str; 4] = ["Date", "Balance", "Income", "Spending"];

/// One point of the balance/income/spending time series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewPoint {
    pub date: String,
    pub balance: Option<Decimal>,
    pub income: Option<Decimal>,
    pub spending: Option<Decimal>
}

/// Chart fields win over statement fields when a row carries both.
pub fn overview_points(rows: &[TransactionRecord]) -> Vec<OverviewPoint> {
    rows.iter()
        .map(|row| OverviewPoint {
            date: row.text(&[CHART_DATE, DATE]).unwrap_or_default(),
            balance: row.amount(&[CHART_BALANCE, ACCOUNT_BALANCE]),
            income: row.amount(&[CHART_INCOME, DEPOSIT_AMOUNT]),
            spending: row.amount(&[CHART_SPENDING, WITHDRAWAL_AMOUNT])
        })
        .collect()
}

pub fn render_overview<W: Write>(output: &mut W, rows: &[TransactionRecord]) -> io::Result<()> {
    let cells: Vec<[String; 4]> = overview_points(rows).into_iter()
        .map(|point| [point.date, format_amount(point.balance), format_amount(point.income), format_amount(point.spending)])
        .collect();

    let mut widths = HEADERS.map(str::len);

    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    writeln!(output, "Financial Overview")?;
    write_line(output, &HEADERS.map(str::to_string), &widths)?;

    for row in &cells {
        write_line(output, row, &widths)?;
    }

    Ok(())
}

fn write_line<W: Write>(output: &mut W, cells: &[String; 4], widths: &[usize; 4]) -> io::Result<()> {
    let line: Vec<String> = cells.iter().zip(widths)
        .enumerate()
        .map(|(index, (cell, &width))| if index == 0 {
            format!("{cell:<width$}")
        } else {
            format!("{cell:>width$}")
        })
        .collect();

    writeln!(output, "  {}", line.join("  ").trim_end())
}

fn format_amount(amount: Option<Decimal>) -> String {
    amount.map(|value| format!("{value:.2}")).unwrap_or_else(|| "-".to_string())
}

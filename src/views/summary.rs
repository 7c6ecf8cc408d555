use std::io::{self, Write};

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::record::{ACCOUNT_BALANCE, CHART_BALANCE, CHART_INCOME, CHART_SPENDING, DEPOSIT_AMOUNT, WITHDRAWAL_AMOUNT};
use crate::models::TransactionRecord;

/// Headline figures for the loaded dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub transactions: usize,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    /// Balance of the last row that carries one, in server order.
    pub latest_balance: Option<Decimal>
}

impl Summary {
    pub fn from_rows(rows: &[TransactionRecord]) -> Self {
        let mut summary = Summary {
            transactions: rows.len(),
            ..Summary::default()
        };

        for row in rows {
            if let Some(deposit) = row.amount(&[DEPOSIT_AMOUNT, CHART_INCOME]) {
                summary.total_deposits = accumulate(summary.total_deposits, deposit, "deposits");
            }

            if let Some(withdrawal) = row.amount(&[WITHDRAWAL_AMOUNT, CHART_SPENDING]) {
                summary.total_withdrawals = accumulate(summary.total_withdrawals, withdrawal, "withdrawals");
            }

            if let Some(balance) = row.amount(&[ACCOUNT_BALANCE, CHART_BALANCE]) {
                summary.latest_balance = Some(balance);
            }
        }

        summary
    }

    /// Saturates at the `Decimal` bounds rather than overflowing.
    pub fn net_flow(&self) -> Decimal {
        self.total_deposits.saturating_sub(self.total_withdrawals)
    }
}

fn accumulate(total: Decimal, amount: Decimal, label: &str) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        warn!("Total {label} overflowed, clamping to the decimal range");
        total.saturating_add(amount)
    })
}

pub fn render_summary<W: Write>(output: &mut W, rows: &[TransactionRecord]) -> io::Result<()> {
    let summary = Summary::from_rows(rows);
    let latest_balance = summary.latest_balance
        .map(|balance| format!("{balance:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    writeln!(output, "Summary")?;
    writeln!(output, "  Transactions:      {}", summary.transactions)?;
    writeln!(output, "  Total deposits:    {:.2}", summary.total_deposits)?;
    writeln!(output, "  Total withdrawals: {:.2}", summary.total_withdrawals)?;
    writeln!(output, "  Net flow:          {:.2}", summary.net_flow())?;
    writeln!(output, "  Latest balance:    {latest_balance}")?;

    Ok(())
}

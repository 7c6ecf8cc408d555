use std::io::{self, Write};

use csv::Writer;

use crate::models::record::{ACCOUNT_BALANCE, DATE, DEPOSIT_AMOUNT, DESCRIPTION, WITHDRAWAL_AMOUNT};
use crate::models::TransactionRecord;

const COLUMNS: [&str; 5] = [DATE, DESCRIPTION, DEPOSIT_AMOUNT, WITHDRAWAL_AMOUNT, ACCOUNT_BALANCE];

/// Grid identity of a row.
///
/// `Date` + `Description` alone collides for repeated same-day transactions, so the position in
/// the payload is part of the key.
pub fn row_id(index: usize, row: &TransactionRecord) -> String {
    format!(
        "{}:{}:{}",
        index,
        row.text(&[DATE]).unwrap_or_default(),
        row.text(&[DESCRIPTION]).unwrap_or_default()
    )
}

/// Writes the statement grid as CSV, cell values exactly as the server sent them.
pub fn render_spreadsheet<W: Write>(output: &mut W, rows: &[TransactionRecord]) -> io::Result<()> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(std::iter::once("Id").chain(COLUMNS))?;

    for (index, row) in rows.iter().enumerate() {
        let cells = COLUMNS.iter().map(|column| row.text(&[*column]).unwrap_or_default());
        writer.write_record(std::iter::once(row_id(index, row)).chain(cells))?;
    }

    writer.flush()
}

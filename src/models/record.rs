use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

pub const DATE: &str = "Date";
pub const DESCRIPTION: &str = "Description";
pub const DEPOSIT_AMOUNT: &str = "Deposit Amount";
pub const WITHDRAWAL_AMOUNT: &str = "Withdrawal Amount";
pub const ACCOUNT_BALANCE: &str = "Account Balance";

pub const CHART_DATE: &str = "date";
pub const CHART_BALANCE: &str = "balance";
pub const CHART_INCOME: &str = "income";
pub const CHART_SPENDING: &str = "spending";

/// A single row returned by the dashboard-data endpoint.
///
/// The row is kept exactly as the server sent it. Statement rows (`Date`, `Description`,
/// `Deposit Amount`, ...) and chart rows (`date`, `balance`, `income`, `spending`) may coexist
/// in one payload, so nothing here assumes either shape. The accessors only exist for the views.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(Map<String, Value>);

impl TransactionRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the first non-null value among `keys` rendered as text.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(value_to_text)
    }

    /// Returns the first value among `keys` that reads as a decimal amount.
    ///
    /// Amounts arrive either as JSON numbers or as strings with thousands separators
    /// (`"1,204.50"`), both are accepted.
    pub fn amount(&self, keys: &[&str]) -> Option<Decimal> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(value_to_amount)
    }

    pub fn date(&self) -> Option<String> {
        self.text(&[DATE, CHART_DATE])
    }

    pub fn description(&self) -> Option<String> {
        self.text(&[DESCRIPTION])
    }

    pub fn deposit_amount(&self) -> Option<Decimal> {
        self.amount(&[DEPOSIT_AMOUNT])
    }

    pub fn withdrawal_amount(&self) -> Option<Decimal> {
        self.amount(&[WITHDRAWAL_AMOUNT])
    }

    pub fn account_balance(&self) -> Option<Decimal> {
        self.amount(&[ACCOUNT_BALANCE, CHART_BALANCE])
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string())
    }
}

fn value_to_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            let text = number.to_string();
            Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)).ok()
        },
        Value::String(text) => {
            let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();

            if cleaned.is_empty() {
                return None;
            }

            Decimal::from_str(&cleaned).ok()
        },
        _ => None
    }
}

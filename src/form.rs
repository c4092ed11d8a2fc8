// Input boundary: raw text fields → validated Transaction
//
// Both the dashboard and the HTTP server collect text from the user and
// hand it here. Parsing errors and construction errors share TrackerError.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, TrackerError};
use crate::transaction::{Category, Transaction, TransactionKind};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unvalidated form input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    pub kind: String,
    pub category: String,
    /// JSON clients may send a number or a string
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
    #[serde(default)]
    pub description: String,
    /// Blank means today
    #[serde(default)]
    pub date: String,
}

impl TransactionForm {
    pub fn into_transaction(self) -> Result<Transaction> {
        self.to_transaction(Local::now().date_naive())
    }

    /// Same as `into_transaction` with an explicit fallback date
    pub fn to_transaction(&self, today: NaiveDate) -> Result<Transaction> {
        let kind: TransactionKind = self.kind.parse()?;
        let category: Category = self.category.parse()?;
        let amount = parse_amount(&self.amount)?;
        let date = if self.date.trim().is_empty() {
            today
        } else {
            parse_date(&self.date)?
        };

        let description = Some(self.description.trim().to_string());

        Transaction::new(date, kind, category, amount, description)
    }
}

fn amount_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(x) => x.to_string(),
    })
}

pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    cleaned
        .parse::<Decimal>()
        .map_err(|_| TrackerError::InvalidAmount(raw.to_string()))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| TrackerError::InvalidDate(raw.to_string()))
}

// Error types for the tracker core
// Construction checks are the only domain failures; CSV/IO come from export.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::transaction::{Category, TransactionKind};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount {0} exceeds the largest accepted amount")]
    AmountTooLarge(Decimal),

    #[error("category {category} is not valid for {kind}")]
    CategoryMismatch {
        kind: TransactionKind,
        category: Category,
    },

    #[error("unknown transaction kind: {0}")]
    UnknownKind(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

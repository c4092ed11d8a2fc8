// 💰 Transaction - one income or expense event
//
// Kind and category are closed enums; a category always belongs to exactly
// one kind. Records are validated once in `Transaction::new` and cannot be
// mutated afterwards (private fields, read-only accessors).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackerError};

// ============================================================================
// TRANSACTION KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money coming in
    Income,

    /// Money going out
    Expense,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Income, TransactionKind::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// Categories a form may offer for this kind, in display order
    pub fn categories(&self) -> &'static [Category] {
        match self {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            TransactionKind::Income => TransactionKind::Expense,
            TransactionKind::Expense => TransactionKind::Income,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        TransactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TrackerError::UnknownKind(s.to_string()))
    }
}

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    // Income
    Salary,
    Freelance,
    Investment,

    // Expense
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Healthcare,
    Other,
}

const INCOME_CATEGORIES: [Category; 3] = [Category::Salary, Category::Freelance, Category::Investment];

const EXPENSE_CATEGORIES: [Category; 7] = [
    Category::Food,
    Category::Transport,
    Category::Entertainment,
    Category::Shopping,
    Category::Bills,
    Category::Healthcare,
    Category::Other,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
        }
    }

    /// The kind this category belongs to
    pub fn kind(&self) -> TransactionKind {
        match self {
            Category::Salary | Category::Freelance | Category::Investment => TransactionKind::Income,
            _ => TransactionKind::Expense,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        INCOME_CATEGORIES
            .iter()
            .chain(EXPENSE_CATEGORIES.iter())
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TrackerError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// Largest accepted amount (one trillion). Decimal holds about 7.9e28, so
/// ledger sums stay exact for any number of transactions that fit in memory.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    date: NaiveDate,
    kind: TransactionKind,
    category: Category,
    amount: Decimal,
    description: Option<String>,
}

impl Transaction {
    /// Build a transaction, rejecting non-positive amounts, amounts above
    /// `MAX_AMOUNT` and categories that belong to the other kind.
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        category: Category,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(TrackerError::NonPositiveAmount(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(TrackerError::AmountTooLarge(amount));
        }
        if category.kind() != kind {
            return Err(TrackerError::CategoryMismatch { kind, category });
        }

        Ok(Self {
            date,
            kind,
            category,
            amount,
            description: description.filter(|d| !d.trim().is_empty()),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Amount with the sign of its direction: income positive, expense negative
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

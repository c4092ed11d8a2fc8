// 📊 Aggregator - totals, category breakdowns and daily trend
//
// Pure functions over a ledger snapshot, recomputed in full on every call.
// Decimal sums are exact, so breakdowns always add up to the kind totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::transaction::{Category, Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// One point of the daily trend line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Decimal,
}

pub fn totals_by_kind(transactions: &[Transaction]) -> Totals {
    let mut totals = Totals::default();

    for tx in transactions {
        match tx.kind() {
            TransactionKind::Income => totals.income += tx.amount(),
            TransactionKind::Expense => totals.expense += tx.amount(),
        }
    }

    totals.balance = totals.income - totals.expense;
    totals
}

/// Summed amount per category for one kind. Categories without
/// transactions are left out.
pub fn breakdown_by_category(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> BTreeMap<Category, Decimal> {
    let mut breakdown = BTreeMap::new();

    for tx in transactions.iter().filter(|tx| tx.kind() == kind) {
        *breakdown.entry(tx.category()).or_insert(Decimal::ZERO) += tx.amount();
    }

    breakdown
}

/// Income-vs-expense bars: one entry per kind that occurs, Income first
pub fn kind_summary(transactions: &[Transaction]) -> Vec<(TransactionKind, Decimal)> {
    let mut summary: BTreeMap<TransactionKind, Decimal> = BTreeMap::new();

    for tx in transactions {
        *summary.entry(tx.kind()).or_insert(Decimal::ZERO) += tx.amount();
    }

    summary.into_iter().collect()
}

/// Sums per (date, kind), date ascending, Income before Expense on a date
pub fn daily_trend(transactions: &[Transaction]) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<(NaiveDate, TransactionKind), Decimal> = BTreeMap::new();

    for tx in transactions {
        *buckets.entry((tx.date(), tx.kind())).or_insert(Decimal::ZERO) += tx.amount();
    }

    buckets
        .into_iter()
        .map(|((date, kind), amount)| TrendPoint { date, kind, amount })
        .collect()
}

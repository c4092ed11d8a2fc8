// 📒 Ledger - append-only list of transactions for one session
//
// Validation happens before a Transaction exists, so the ledger itself
// has no failure modes.

use tracing::debug;

use crate::transaction::Transaction;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Append to the end; insertion order is kept
    pub fn add(&mut self, transaction: Transaction) {
        debug!(
            kind = %transaction.kind(),
            category = %transaction.category(),
            amount = %transaction.amount(),
            "ledger add"
        );
        self.transactions.push(transaction);
    }

    /// Drop every transaction. Irreversible.
    pub fn clear(&mut self) {
        debug!(count = self.transactions.len(), "ledger clear");
        self.transactions.clear();
    }

    /// Read-only view in insertion order
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Newest date first; on equal dates the later insert comes first
    pub fn history(&self) -> Vec<&Transaction> {
        let mut rows: Vec<&Transaction> = self.transactions.iter().rev().collect();
        // stable sort keeps the reversed insertion order within a date
        rows.sort_by(|a, b| b.date().cmp(&a.date()));
        rows
    }
}

impl FromIterator<Transaction> for Ledger {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::from_transactions(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Category, TransactionKind};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn expense(day: u32, amount: i64, note: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            TransactionKind::Expense,
            Category::Other,
            Decimal::new(amount, 0),
            Some(note.to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.add(expense(3, 10, "a"));
        ledger.add(expense(1, 20, "b"));
        ledger.add(expense(2, 30, "c"));

        let notes: Vec<_> = ledger.all().iter().map(|t| t.description().unwrap()).collect();
        assert_eq!(notes, vec!["a", "b", "c"]);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_clear_resets_length() {
        let mut ledger = Ledger::new();
        ledger.add(expense(1, 10, "a"));
        ledger.add(expense(1, 10, "a"));
        ledger.clear();
        assert!(ledger.is_empty());

        ledger.add(expense(2, 5, "after"));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.all()[0].description(), Some("after"));
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut ledger = Ledger::new();
        let tx = expense(1, 10, "same");
        ledger.add(tx.clone());
        ledger.add(tx);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_history_newest_first() {
        let ledger: Ledger = vec![
            expense(1, 10, "first"),
            expense(5, 10, "second"),
            expense(5, 10, "third"),
            expense(2, 10, "fourth"),
        ]
        .into_iter()
        .collect();

        let notes: Vec<_> = ledger.history().iter().map(|t| t.description().unwrap()).collect();
        assert_eq!(notes, vec!["third", "second", "fourth", "first"]);
    }
}

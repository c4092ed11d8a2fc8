// CSV export / import of a ledger snapshot
//
// Columns: date,kind,category,amount,description
// Amounts are written with Decimal's own formatting so a parsed export
// reproduces the exact values. Rows read back go through Transaction::new.

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::info;

use crate::error::{Result, TrackerError};
use crate::form::{parse_amount, parse_date, DATE_FORMAT};
use crate::transaction::Transaction;

pub const EXPORT_FILE_NAME: &str = "transactions.csv";

#[derive(Serialize)]
struct CsvOutRow<'a> {
    date: String,
    kind: &'static str,
    category: &'static str,
    amount: String,
    description: &'a str,
}

#[derive(Deserialize)]
struct CsvRow {
    date: String,
    kind: String,
    category: String,
    amount: String,
    #[serde(default)]
    description: Option<String>,
}

pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    // Header is written by hand so an empty ledger still exports one
    let mut wrt = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    wrt.write_record(["date", "kind", "category", "amount", "description"])?;

    for tx in transactions {
        let out = CsvOutRow {
            date: tx.date().format(DATE_FORMAT).to_string(),
            kind: tx.kind().as_str(),
            category: tx.category().as_str(),
            amount: tx.amount().to_string(),
            description: tx.description().unwrap_or(""),
        };
        wrt.serialize(out)?;
    }

    wrt.flush()?;
    info!(rows = transactions.len(), "exported transactions to CSV");
    Ok(())
}

/// Export into an in-memory string (download body)
pub fn export_csv(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, transactions)?;
    String::from_utf8(buf).map_err(|e| {
        TrackerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut transactions = Vec::new();

    for rec in rdr.deserialize::<CsvRow>() {
        let row = rec?;
        let tx = Transaction::new(
            parse_date(&row.date)?,
            row.kind.parse()?,
            row.category.parse()?,
            parse_amount(&row.amount)?,
            row.description,
        )?;
        transactions.push(tx);
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::transaction::{Category, TransactionKind};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add(
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                TransactionKind::Income,
                Category::Salary,
                Decimal::new(100000, 2),
                Some("January, paid \"early\"".to_string()),
            )
            .unwrap(),
        );
        ledger.add(
            Transaction::new(
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                TransactionKind::Expense,
                Category::Food,
                Decimal::new(1999, 2),
                None,
            )
            .unwrap(),
        );
        ledger
    }

    #[test]
    fn test_export_layout() {
        let csv = export_csv(sample_ledger().all()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,kind,category,amount,description");
        assert_eq!(lines[1], "2024-01-01,Income,Salary,1000.00,\"January, paid \"\"early\"\"\"");
        assert_eq!(lines[2], "2024-01-02,Expense,Food,19.99,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_then_parse_reproduces_rows() {
        let ledger = sample_ledger();
        let mut buf = Vec::new();
        write_csv(&mut buf, ledger.all()).unwrap();

        let parsed = read_csv(buf.as_slice()).unwrap();
        assert_eq!(parsed.len(), ledger.len());
        assert_eq!(parsed.as_slice(), ledger.all());
    }

    #[test]
    fn test_round_trip_keeps_awkward_text_and_scale() {
        let rows = [
            (TransactionKind::Income, Category::Salary, "1000.00", "line one\nline two"),
            (TransactionKind::Expense, Category::Food, "0.50", "  padded  "),
            (TransactionKind::Expense, Category::Other, "7.10", "a, \"quoted\" note\r\n"),
            (TransactionKind::Income, Category::Freelance, "1000000000000", "x"),
        ];

        let mut ledger = Ledger::new();
        for (d, (kind, category, amount, description)) in rows.iter().enumerate() {
            ledger.add(
                Transaction::new(
                    NaiveDate::from_ymd_opt(2024, 6, 1 + d as u32).unwrap(),
                    *kind,
                    *category,
                    amount.parse().unwrap(),
                    Some(description.to_string()),
                )
                .unwrap(),
            );
        }

        let csv = export_csv(ledger.all()).unwrap();
        let parsed = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(parsed.as_slice(), ledger.all());
        for (tx, (_, _, amount, description)) in parsed.iter().zip(rows.iter()) {
            assert_eq!(tx.amount().to_string(), *amount);
            assert_eq!(tx.description(), Some(*description));
        }
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(csv.trim_end(), "date,kind,category,amount,description");
        assert!(read_csv(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_read_rejects_invalid_rows() {
        let bad_amount = "date,kind,category,amount,description\n2024-01-01,Expense,Food,-3,\n";
        assert!(matches!(
            read_csv(bad_amount.as_bytes()),
            Err(TrackerError::NonPositiveAmount(_))
        ));

        let bad_category = "date,kind,category,amount,description\n2024-01-01,Income,Bills,3,\n";
        assert!(matches!(
            read_csv(bad_category.as_bytes()),
            Err(TrackerError::CategoryMismatch { .. })
        ));
    }
}

// Finance Tracker - Core Library
// Exposes the ledger core for the dashboard, the API server, and tests

pub mod aggregate;
pub mod error;
pub mod export;
pub mod form;
pub mod ledger;
pub mod session;
pub mod transaction;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use aggregate::{
    breakdown_by_category, daily_trend, kind_summary, totals_by_kind, Totals, TrendPoint,
};
pub use error::{Result, TrackerError};
pub use export::{export_csv, read_csv, write_csv, EXPORT_FILE_NAME};
pub use form::TransactionForm;
pub use ledger::Ledger;
pub use session::{SessionId, SessionStore};
pub use transaction::{Category, Transaction, TransactionKind, MAX_AMOUNT};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the tracing subscriber used by both binaries.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Format an amount the way the dashboard shows money: `$1,234.56`
pub fn format_money(amount: rust_decimal::Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let text = format!("{:.2}", rounded);
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::new(123456, 2)), "$1,234.56");
        assert_eq!(format_money(Decimal::new(-70, 0)), "-$70.00");
        assert_eq!(format_money(Decimal::ZERO), "$0.00");
        assert_eq!(format_money(Decimal::new(1000000, 0)), "$1,000,000.00");
        assert_eq!(format_money(Decimal::new(5, 3)), "$0.01");
    }
}

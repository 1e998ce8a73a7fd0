//! Aggregations over the denormalized transaction rows.
//!
//! The functions here are pure: they take the rows and, where the result
//! depends on the current month, the local time `now`.

mod category_average;
mod insight;
mod monthly_balance;

pub use category_average::{DEFAULT_LOOKBACK_MONTHS, calculate_category_averages};
pub use insight::{Insight, InsightKind, generate_insights};
pub use monthly_balance::{MonthlyBalance, calculate_monthly_balance};

//! Trailing monthly spending averages per category.

use std::collections::{BTreeMap, HashMap};

use time::PrimitiveDateTime;

use crate::transaction::TransactionRow;

/// The number of full months before the current month used for averages.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 3;

/// Count months from year zero so that month arithmetic crosses years cleanly.
fn month_index(date: PrimitiveDateTime) -> i64 {
    i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1
}

/// Average the monthly expense per category over the `lookback_months` full
/// calendar months before the month containing `now`.
///
/// Expenses are taken as positive magnitudes. The average for a category is
/// the mean of its monthly totals over the months where it had any expense.
/// Categories without expenses in the window are absent from the result.
pub fn calculate_category_averages(
    rows: &[TransactionRow],
    lookback_months: u32,
    now: PrimitiveDateTime,
) -> HashMap<String, f64> {
    let current_month = month_index(now);
    let window_start = current_month - i64::from(lookback_months);

    let mut monthly_totals: BTreeMap<(&str, i64), f64> = BTreeMap::new();

    for row in rows.iter().filter(|row| row.amount < 0.0) {
        let month = month_index(row.date);

        if month >= window_start && month < current_month {
            *monthly_totals
                .entry((row.category_name.as_str(), month))
                .or_insert(0.0) += row.amount.abs();
        }
    }

    let mut sums: HashMap<String, (f64, u32)> = HashMap::new();

    for ((category, _), total) in monthly_totals {
        let (sum, count) = sums.entry(category.to_owned()).or_insert((0.0, 0));
        *sum += total;
        *count += 1;
    }

    sums.into_iter()
        .map(|(category, (sum, count))| (category, sum / f64::from(count)))
        .collect()
}

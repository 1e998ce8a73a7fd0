//! Monthly income, expense and balance totals.

use std::collections::BTreeMap;

use crate::transaction::TransactionRow;

/// The totals for a single calendar month.
///
/// `expense` is reported as a positive magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyBalance {
    pub year: i32,
    /// The month number, 1 to 12.
    pub month: u8,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl MonthlyBalance {
    /// The month formatted as "YYYY-MM", e.g. "2024-01".
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Sum income and expenses per calendar month.
///
/// Positive amounts count as income and negative amounts as expenses, zero
/// amounts count as neither. Only months with at least one income or expense
/// appear in the result, sorted from oldest to newest.
pub fn calculate_monthly_balance(rows: &[TransactionRow]) -> Vec<MonthlyBalance> {
    let mut totals: BTreeMap<(i32, u8), (f64, f64)> = BTreeMap::new();

    for row in rows {
        if row.amount == 0.0 {
            continue;
        }

        let key = (row.date.year(), u8::from(row.date.month()));
        let (income, expense) = totals.entry(key).or_insert((0.0, 0.0));

        if row.amount > 0.0 {
            *income += row.amount;
        } else {
            *expense += row.amount.abs();
        }
    }

    totals
        .into_iter()
        .map(|((year, month), (income, expense))| MonthlyBalance {
            year,
            month,
            income,
            expense,
            balance: income - expense,
        })
        .collect()
}

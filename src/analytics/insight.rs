//! Alerts and congratulations for the current month's spending.

use std::collections::{BTreeMap, HashMap};

use time::{PrimitiveDateTime, Time};

use crate::transaction::TransactionRow;

/// Spending above `average * ALERT_RATIO` raises an alert.
pub const ALERT_RATIO: f64 = 1.20;
/// Spending below `average * SUCCESS_RATIO` earns a congratulation.
pub const SUCCESS_RATIO: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    /// Spending is well above the historical average.
    Alert,
    /// Spending is well below the historical average.
    Success,
}

/// A comparison of this month's spending in a category against its average.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: String,
    pub current_total: f64,
    pub average: f64,
    /// How far above or below the average the current total is, in percent.
    pub percentage: f64,
    pub message: String,
}

/// Compare the expenses in the month containing `now` with `averages`.
///
/// Only categories with a positive historical average can produce an insight.
/// The insights are ordered by category name.
pub fn generate_insights(
    rows: &[TransactionRow],
    averages: &HashMap<String, f64>,
    now: PrimitiveDateTime,
) -> Vec<Insight> {
    let month_start = now.replace_day(1).unwrap_or(now).replace_time(Time::MIDNIGHT);

    let mut current_totals: BTreeMap<&str, f64> = BTreeMap::new();

    for row in rows
        .iter()
        .filter(|row| row.date >= month_start && row.amount < 0.0)
    {
        *current_totals.entry(row.category_name.as_str()).or_insert(0.0) += row.amount.abs();
    }

    current_totals
        .into_iter()
        .filter_map(|(category, current_total)| {
            let average = *averages.get(category)?;

            if average <= 0.0 {
                return None;
            }

            if current_total > average * ALERT_RATIO {
                let percentage = (current_total / average - 1.0) * 100.0;

                Some(Insight {
                    kind: InsightKind::Alert,
                    message: format!(
                        "Seu gasto em {category} ({current_total:.2}) está {percentage:.0}% \
                        ACIMA da média histórica ({average:.2}). Atenção!"
                    ),
                    category: category.to_owned(),
                    current_total,
                    average,
                    percentage,
                })
            } else if current_total < average * SUCCESS_RATIO {
                let percentage = (1.0 - current_total / average) * 100.0;

                Some(Insight {
                    kind: InsightKind::Success,
                    message: format!(
                        "Parabéns! Seu gasto em {category} ({current_total:.2}) está \
                        {percentage:.0}% ABAIXO da média histórica. Continue assim!"
                    ),
                    category: category.to_owned(),
                    current_total,
                    average,
                    percentage,
                })
            } else {
                None
            }
        })
        .collect()
}

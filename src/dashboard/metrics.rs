//! Key figures for the current month.

use maud::{Markup, html};
use time::PrimitiveDateTime;

use crate::{analytics::MonthlyBalance, html::format_currency};

/// The totals for the month containing `now`, or zeros if it has no transactions.
pub(super) fn current_month_balance(
    monthly_balances: &[MonthlyBalance],
    now: PrimitiveDateTime,
) -> MonthlyBalance {
    let (year, month) = (now.year(), u8::from(now.month()));

    monthly_balances
        .iter()
        .find(|balance| balance.year == year && balance.month == month)
        .copied()
        .unwrap_or(MonthlyBalance {
            year,
            month,
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        })
}

fn metric_card(label: &str, value: f64, value_style: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md"
            data-metric=(label)
        {
            p class="text-sm text-gray-600 dark:text-gray-400" { (label) }
            p class={"text-2xl font-bold tabular-nums " (value_style)} { (format_currency(value)) }
        }
    }
}

pub(super) fn metrics_view(current: &MonthlyBalance) -> Markup {
    let balance_style = if current.balance >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html! {
        section id="metrics" class="w-full mb-8"
        {
            h2 class="text-xl font-semibold mb-4" { "Métricas do Mês Atual" }

            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                (metric_card("Saldo Total (Mês)", current.balance, balance_style))
                (metric_card("Total de Entradas", current.income, "text-green-600 dark:text-green-400"))
                (metric_card("Total de Saídas", current.expense, "text-red-600 dark:text-red-400"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{analytics::MonthlyBalance, dashboard::metrics::current_month_balance};

    fn month(year: i32, month: u8, income: f64, expense: f64) -> MonthlyBalance {
        MonthlyBalance {
            year,
            month,
            income,
            expense,
            balance: income - expense,
        }
    }

    #[test]
    fn picks_the_current_month() {
        let balances = [month(2024, 4, 100.0, 10.0), month(2024, 5, 200.0, 50.0)];

        let got = current_month_balance(&balances, datetime!(2024-04-20 10:00));

        assert_eq!(got, balances[0]);
    }

    #[test]
    fn is_zero_when_current_month_has_no_transactions() {
        let balances = [month(2024, 4, 100.0, 10.0)];

        let got = current_month_balance(&balances, datetime!(2024-06-01 0:00));

        assert_eq!(got, month(2024, 6, 0.0, 0.0));
    }
}

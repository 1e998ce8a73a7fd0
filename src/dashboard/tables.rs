//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    analytics::MonthlyBalance,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::TransactionRow,
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders a table with the income, expenses and balance of each month, newest first.
pub(super) fn monthly_balance_table(monthly_balances: &[MonthlyBalance]) -> Markup {
    html! {
        section id="monthly-balance" class="w-full mb-8"
        {
            h2 class="text-xl font-semibold mb-4" { "Balanço Mensal" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Mês" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Entradas" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Saídas" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Saldo" }
                        }
                    }

                    tbody
                    {
                        @for month in monthly_balances.iter().rev() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                                {
                                    (month.label())
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_CELL_GREEN_STYLE)}
                                {
                                    (format_currency(month.income))
                                }
                                td class={(TABLE_CELL_STYLE) " " (TABLE_CELL_RED_STYLE)}
                                {
                                    (format_currency(month.expense))
                                }
                                td class={(TABLE_CELL_STYLE) " font-bold " (amount_color_class(month.balance))}
                                {
                                    (format_currency(month.balance))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders every transaction, newest first, inside a collapsible section.
pub(super) fn transactions_table(rows: &[TransactionRow]) -> Markup {
    let mut sorted_rows = rows.iter().collect::<Vec<_>>();
    sorted_rows.sort_by(|a, b| b.date.cmp(&a.date));

    html! {
        details id="transactions" class="w-full mb-8"
        {
            summary class="cursor-pointer text-lg font-semibold mb-4"
            {
                "Ver Transações Recentes"
            }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Data" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Valor" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Descrição" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Categoria" }
                        }
                    }

                    tbody
                    {
                        @for row in sorted_rows {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (row.date.date()) }
                                td class={(TABLE_CELL_STYLE) " " (amount_color_class(row.amount))}
                                {
                                    (format_currency(row.amount))
                                }
                                td class=(TABLE_CELL_STYLE) { (row.description.as_deref().unwrap_or("")) }
                                td class=(TABLE_CELL_STYLE) { (row.category_name) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        analytics::MonthlyBalance,
        dashboard::tables::{monthly_balance_table, transactions_table},
        transaction::TransactionRow,
    };

    fn first_cells(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("tbody tr").unwrap())
            .map(|row| {
                row.select(&Selector::parse("th, td").unwrap())
                    .next()
                    .expect("row has no cells")
                    .text()
                    .collect::<String>()
                    .trim()
                    .to_owned()
            })
            .collect()
    }

    #[test]
    fn transactions_are_listed_newest_first() {
        let row = |date| TransactionRow {
            date,
            amount: -1.0,
            description: None,
            category_name: "Geral".to_owned(),
        };
        let rows = [
            row(datetime!(2024-01-05 0:00)),
            row(datetime!(2024-03-01 0:00)),
            row(datetime!(2024-02-10 0:00)),
        ];

        let html = Html::parse_fragment(&transactions_table(&rows).into_string());

        assert_eq!(
            first_cells(&html),
            ["2024-03-01", "2024-02-10", "2024-01-05"]
        );
    }

    #[test]
    fn monthly_table_lists_newest_month_first() {
        let month = |month| MonthlyBalance {
            year: 2024,
            month,
            income: 0.0,
            expense: 0.0,
            balance: 0.0,
        };

        let html = Html::parse_fragment(&monthly_balance_table(&[month(1), month(2)]).into_string());

        assert_eq!(first_cells(&html), ["2024-02", "2024-01"]);
    }
}

//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for the financial data:
//! - **Balance chart**: the monthly balance (income minus expenses) over time
//! - **Expenses chart**: a pie chart of all expenses grouped by category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a matching HTML container and JavaScript initialization code.

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{analytics::MonthlyBalance, html::HeadElement, transaction::TransactionRow};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            h2 class="text-xl font-semibold mb-4" { "Visualizações Históricas" }

            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A line chart of the balance for each month.
pub(super) fn balance_chart(monthly_balances: &[MonthlyBalance]) -> Chart {
    let labels = monthly_balances
        .iter()
        .map(MonthlyBalance::label)
        .collect::<Vec<_>>();
    let values = monthly_balances
        .iter()
        .map(|month| month.balance)
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Evolução do Saldo Mensal"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter()),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name("Mês")
                .data(labels),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Saldo (R$)")
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Saldo").data(values))
}

/// Sum the magnitude of all expenses per category, ordered by category name.
pub(super) fn expenses_by_category(rows: &[TransactionRow]) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for row in rows.iter().filter(|row| row.amount < 0.0) {
        *totals.entry(row.category_name.as_str()).or_insert(0.0) += row.amount.abs();
    }

    totals
        .into_iter()
        .map(|(category, total)| (category.to_owned(), total))
        .collect()
}

/// A pie chart of how expenses are distributed across categories.
pub(super) fn expenses_chart(rows: &[TransactionRow]) -> Chart {
    let totals = expenses_by_category(rows);
    let data = totals
        .iter()
        .map(|(category, total)| (*total, category.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Distribuição de Despesas por Categoria"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Despesas")
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('pt-BR', {
              style: 'currency',
              currency: 'BRL'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

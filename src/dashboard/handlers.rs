//! Dashboard HTTP handler and page layout.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::PrimitiveDateTime;

use crate::{
    AppState, Error,
    analytics::{
        DEFAULT_LOOKBACK_MONTHS, Insight, MonthlyBalance, calculate_category_averages,
        calculate_monthly_balance, generate_insights,
    },
    cache::TransactionCache,
    category::{Category, get_all_categories},
    dashboard::{
        charts::{DashboardChart, balance_chart, charts_script, charts_view, expenses_chart},
        insights::{empty_state_view, insights_view, load_error_view},
        metrics::{current_month_balance, metrics_view},
        sidebar::sidebar_view,
        tables::{monthly_balance_table, transactions_table},
    },
    endpoints,
    html::{HeadElement, base},
    navigation::NavBar,
    timezone::{get_local_offset, local_now},
    transaction::{TransactionRow, get_transaction_rows},
};

const ECHARTS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading categories and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    /// The cached transaction rows shared with the write handlers.
    pub transaction_cache: Arc<TransactionCache>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            transaction_cache: state.transaction_cache.clone(),
        }
    }
}

/// Everything computed from the transaction rows for a single render.
struct DashboardData<'a> {
    rows: &'a [TransactionRow],
    monthly_balances: Vec<MonthlyBalance>,
    insights: Vec<Insight>,
    charts: [DashboardChart; 2],
}

/// Display the dashboard: the sidebar forms, this month's figures, the
/// spending insights and the historical charts and tables.
///
/// A failure to load the transactions is shown as a banner instead of
/// failing the whole page, so the sidebar stays usable.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let now = local_now(local_offset);

    let categories = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_categories(&connection)
            .inspect_err(|error| tracing::error!("could not get categories: {error}"))?
    };

    let loaded = state.transaction_cache.get_or_load(|| {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transaction_rows(&connection)
    });

    let (rows, load_failed) = match loaded {
        Ok(rows) => (rows, false),
        Err(error) => {
            tracing::error!("could not load transactions for the dashboard: {error}");
            (Arc::default(), true)
        }
    };

    let data = (!rows.is_empty()).then(|| build_dashboard_data(&rows, now));

    Ok(dashboard_view(&categories, now, data.as_ref(), load_failed).into_response())
}

fn build_dashboard_data(rows: &[TransactionRow], now: PrimitiveDateTime) -> DashboardData<'_> {
    let monthly_balances = calculate_monthly_balance(rows);
    let averages = calculate_category_averages(rows, DEFAULT_LOOKBACK_MONTHS, now);
    let insights = generate_insights(rows, &averages, now);

    let charts = [
        DashboardChart {
            id: "balance-chart",
            options: balance_chart(&monthly_balances).to_string(),
        },
        DashboardChart {
            id: "expenses-chart",
            options: expenses_chart(rows).to_string(),
        },
    ];

    DashboardData {
        rows,
        monthly_balances,
        insights,
        charts,
    }
}

fn dashboard_view(
    categories: &[Category],
    now: PrimitiveDateTime,
    data: Option<&DashboardData>,
    load_failed: bool,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let sidebar = sidebar_view(categories, now.date());

    let content = html!(
        (nav_bar)

        div
            class="flex flex-col lg:flex-row gap-6 px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-2xl text-gray-900 dark:text-white"
        {
            (sidebar)

            main id="dashboard-content" class="flex flex-col items-center flex-1 min-w-0"
            {
                h1 class="text-2xl font-bold mb-6 self-start" { "💸 Sistema de Análise Financeira" }

                @if load_failed {
                    (load_error_view())
                }

                @match data {
                    Some(data) => {
                        (metrics_view(&current_month_balance(&data.monthly_balances, now)))
                        (insights_view(&data.insights))
                        (charts_view(&data.charts))
                        (monthly_balance_table(&data.monthly_balances))
                        (transactions_table(data.rows))
                    }
                    None => {
                        (empty_state_view())
                    }
                }
            }
        }
    );

    let scripts = match data {
        Some(data) => vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(&data.charts),
        ],
        None => Vec::new(),
    };

    base("Painel", &scripts, &content)
}

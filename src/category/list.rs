//! Categories listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, count_transactions_per_category, get_all_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

struct CategoryWithCount {
    category: Category,
    transaction_count: u32,
}

/// Render the categories listing page with transaction counts.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let transactions_per_category = count_transactions_per_category(&connection).inspect_err(
        |error| tracing::error!("Could not count transactions per category: {error}"),
    )?;

    let categories = categories
        .into_iter()
        .map(|category| CategoryWithCount {
            transaction_count: *transactions_per_category.get(&category.id).unwrap_or(&0),
            category,
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&categories).into_response())
}

fn categories_view(categories: &[CategoryWithCount]) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-3xl"
            {
                h1 class="text-xl font-bold" { "Categorias" }

                (new_category_form())

                table class="w-full text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Nome" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Transações" }
                        }
                    }

                    tbody
                    {
                        @for entry in categories {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (entry.category.name) }
                                }
                                td class=(TABLE_CELL_STYLE) { (entry.transaction_count) }
                            }
                        }

                        @if categories.is_empty() {
                            tr
                            {
                                td
                                    colspan="2"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "Nenhuma categoria criada ainda."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categorias", &[], &content)
}

fn new_category_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::CATEGORIES_API)
            hx-target-error="#category-alert"
            class="w-full space-y-4"
        {
            input type="hidden" name="return_to" value="categories";

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Nova categoria" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Ex.: Alimentação"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div id="category-alert" {}

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Criar categoria" }
        }
    }
}

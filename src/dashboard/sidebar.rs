//! The dashboard sidebar with the CSV importer and the manual transaction form.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::Category,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, loading_spinner},
    transaction::{TransactionFormDefaults, transaction_form_fields},
};

/// The name of the category created by the "create default category" button.
pub(super) const DEFAULT_CATEGORY_NAME: &str = "Salário";

pub(super) fn sidebar_view(categories: &[Category], today: Date) -> Markup {
    html! {
        aside
            id="sidebar"
            class="w-full lg:w-80 shrink-0 space-y-8 p-4 bg-white dark:bg-gray-800
                rounded-lg shadow text-gray-900 dark:text-white"
        {
            h2 class="text-lg font-bold" { "Menu de Operações" }

            (import_form())

            hr class="border-gray-200 dark:border-gray-700";

            (new_transaction_form(categories, today))
        }
    }
}

fn import_form() -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            id="import-form"
            hx-post=(endpoints::IMPORT)
            hx-encoding="multipart/form-data"
            hx-target="#import-result"
            hx-target-error="#import-result"
            hx-indicator="#import-indicator"
            class="space-y-4"
        {
            h3 class="font-semibold" { "📂 Importar Dados (CSV)" }

            div
            {
                label for="files" class=(FORM_LABEL_STYLE) { "Selecione seu arquivo CSV" }

                input
                    id="files"
                    type="file"
                    name="files"
                    accept=".csv,text/csv"
                    multiple
                    required
                    class="block w-full text-sm text-gray-900 border border-gray-300
                        rounded cursor-pointer bg-gray-50 dark:text-gray-400
                        dark:bg-gray-700 dark:border-gray-600";
            }

            button type="submit" id="import-indicator" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (spinner) }
                "Processar Importação"
            }

            div id="import-result" {}
        }
    }
}

fn new_transaction_form(categories: &[Category], today: Date) -> Markup {
    let fields = transaction_form_fields(&TransactionFormDefaults { date: today }, categories);

    html! {
        section class="space-y-4"
        {
            h3 class="font-semibold" { "➕ Nova Transação" }

            @if categories.is_empty() {
                form
                    id="default-category-form"
                    hx-post=(endpoints::CATEGORIES_API)
                    hx-target-error="#transaction-form-result"
                    class="space-y-2"
                {
                    p class="text-sm text-yellow-800 dark:text-yellow-300"
                    {
                        "Nenhuma categoria encontrada. Crie uma padrão abaixo."
                    }

                    input type="hidden" name="name" value=(DEFAULT_CATEGORY_NAME);
                    input type="hidden" name="return_to" value="dashboard";

                    button type="submit" class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Criar Categoria Padrão"
                    }
                }
            }

            form
                id="transaction-form"
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#transaction-form-result"
                class="space-y-4"
            {
                (fields)

                button
                    type="submit"
                    class=(BUTTON_PRIMARY_STYLE)
                    disabled[categories.is_empty()]
                {
                    "Salvar Transação"
                }
            }

            div id="transaction-form-result" {}
        }
    }
}

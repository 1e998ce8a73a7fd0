//! The fields of the manual transaction form.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::Category,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

pub struct TransactionFormDefaults {
    pub date: Date,
}

/// Render the inputs for a new transaction.
///
/// The amount is signed: positive for income, negative for expenses.
pub fn transaction_form_fields(defaults: &TransactionFormDefaults, categories: &[Category]) -> Markup {
    html! {
        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Valor (Entrada (+), Saída (-))"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                value="0.00"
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Descrição da Transação"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Descrição"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Categoria"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in categories {
                    option value=(category.id) { (category.name) }
                }
            }
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Data"
            }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use super::{TransactionFormDefaults, transaction_form_fields};
    use crate::{
        category::{Category, CategoryName},
        test_utils::{assert_form_input, assert_form_input_with_value, must_get_form},
    };

    fn render_fields(categories: &[Category]) -> Html {
        let fields = transaction_form_fields(
            &TransactionFormDefaults {
                date: date!(2025 - 03 - 09),
            },
            categories,
        );
        let markup = maud::html! { form { (fields) } };
        Html::parse_document(&markup.into_string())
    }

    #[test]
    fn renders_inputs_with_defaults() {
        let html = render_fields(&[]);
        let form = must_get_form(&html);

        assert_form_input(&form, "amount", "number");
        assert_form_input_with_value(&form, "date", "date", "2025-03-09");
    }

    #[test]
    fn lists_categories_as_options() {
        let categories = [
            Category {
                id: 1,
                name: CategoryName::new_unchecked("Alimentação"),
            },
            Category {
                id: 7,
                name: CategoryName::new_unchecked("Salário"),
            },
        ];

        let html = render_fields(&categories);

        let options = html
            .select(&Selector::parse("select[name=category_id] option").unwrap())
            .map(|option| {
                (
                    option.value().attr("value").unwrap_or_default().to_owned(),
                    option.text().collect::<String>(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            options,
            vec![
                ("1".to_owned(), "Alimentação".to_owned()),
                ("7".to_owned(), "Salário".to_owned()),
            ]
        );
    }
}

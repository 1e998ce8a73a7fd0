//! Categories group transactions for the spending analysis.

mod create;
mod db;
mod domain;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    count_transactions_per_category, create_category, create_category_table, get_all_categories,
    get_category, get_category_by_name, get_or_create_category,
};
pub use domain::{Category, CategoryId, CategoryName};
pub use list::get_categories_page;

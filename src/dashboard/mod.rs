//! Dashboard module
//!
//! Provides the main page: the sidebar for importing and recording
//! transactions, this month's figures, spending insights, historical charts
//! and tables.

mod charts;
mod handlers;
mod insights;
mod metrics;
mod sidebar;
mod tables;

pub use handlers::get_dashboard_page;

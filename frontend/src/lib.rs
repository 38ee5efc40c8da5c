//! Mintobot chat widget: a floating chat bubble and conversation window that
//! any page can embed with one script tag.

pub mod api;
pub mod components;
pub mod config;
pub mod dom;
pub mod embed;
pub mod errors;
pub mod i18n;
pub mod models;
pub mod pump;
pub mod quick_actions;
pub mod session;
pub mod state;
pub mod style;
pub mod toggle;

pub use config::WidgetConfig;
pub use embed::{mount_widget, WidgetHandle};

//! Terminal user interface
//!
//! A ledger dashboard with filters and search, plus the four-step CSV
//! import wizard, built on ratatui.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

pub mod dialogs;
pub mod layout;
pub mod views;
pub mod widgets;

pub use app::App;
pub use terminal::run_tui;

//! Modal dialogs drawn over the dashboard

pub mod confirm;
pub mod export;
pub mod help;

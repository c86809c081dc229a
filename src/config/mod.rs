//! Configuration module for coinlog
//!
//! Path resolution and persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::CoinlogPaths;
pub use settings::Settings;

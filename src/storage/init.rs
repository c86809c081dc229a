//! First-run setup

use crate::config::settings::Settings;
use crate::error::CoinlogError;
use crate::ledger::sample_transactions;

use super::Storage;

/// What `initialize_storage` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    /// Settings file was written for the first time
    pub created_settings: bool,
    /// Number of demo transactions added
    pub seeded: usize,
}

/// Create directories and settings, optionally seeding the demo data
///
/// Seeding happens at most once per data directory.
pub fn initialize_storage(storage: &Storage, with_sample: bool) -> Result<InitReport, CoinlogError> {
    let paths = storage.paths();
    paths.ensure_directories()?;

    let created_settings = !paths.is_initialized();
    let mut settings = Settings::load_or_create(paths)?;

    let mut seeded = 0;
    if with_sample && !settings.sample_data_seeded {
        let mut ledger = storage.transactions.load()?;
        let sample = sample_transactions();
        let ids: Vec<String> = sample.iter().map(|t| t.id.to_string()).collect();
        seeded = ledger.extend(sample);
        storage.transactions.save(&ledger)?;
        storage.log_import("Sample data", None, &ids, 0)?;
        settings.sample_data_seeded = true;
    }

    if created_settings || seeded > 0 {
        settings.save(paths)?;
    }

    Ok(InitReport {
        created_settings,
        seeded,
    })
}

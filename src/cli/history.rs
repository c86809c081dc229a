//! `coinlog history`: recent audit log entries

use crate::display::format_history;
use crate::error::CoinlogResult;
use crate::storage::Storage;

pub fn handle_history_command(storage: &Storage, limit: usize) -> CoinlogResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    print!("{}", format_history(&entries));
    Ok(())
}

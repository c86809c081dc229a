//! JSON file helpers with atomic writes

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CoinlogError, CoinlogResult};

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> CoinlogError {
    CoinlogError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Load JSON from `path`; a missing file yields `T::default()`
pub fn read_json<T, P>(path: P) -> CoinlogResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(storage_error("open", path, e)),
    };
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Write JSON to a sibling `.json.tmp` file, sync it, then rename over `path`
///
/// Readers see either the previous contents or the new ones.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> CoinlogResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path).map_err(|e| storage_error("create", &temp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", &temp_path, e))?;
    writer
        .flush()
        .and_then(|_| writer.get_ref().sync_all())
        .map_err(|e| storage_error("sync", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(storage_error("replace", path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Holding {
        currency: String,
        atoms: i64,
    }

    #[test]
    fn test_read_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: Holding = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, Holding::default());
    }

    #[test]
    fn test_write_then_read_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("holding.json");
        let data = Holding {
            currency: "BTC".into(),
            atoms: 50_000_000,
        };

        write_json_atomic(&path, &data).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let loaded: Holding = read_json(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("holding.json");
        fs::write(&path, "not json").unwrap();

        let err = read_json::<Holding, _>(&path).unwrap_err();
        match err {
            CoinlogError::Storage(msg) => {
                assert!(msg.starts_with("Failed to parse"));
                assert!(msg.contains("holding.json"));
            }
            other => panic!("expected storage error, got {:?}", other),
        }
    }
}

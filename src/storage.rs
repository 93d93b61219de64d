use crate::errors::AppError;
use crate::models::DailyEntry;
use crate::sanitize::sanitize_entries;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub const DEFAULT_DATA_PATH: &str = "data/obsidian_system_v3.json";

pub fn resolve_data_path() -> PathBuf {
    env::var("OBSIDIAN_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
}

/// Reads and sanitizes the stored collection. A missing or unreadable file
/// yields an empty collection.
pub async fn load_entries(path: &Path) -> Vec<DailyEntry> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(raw) => sanitize_entries(raw),
            Err(err) => {
                error!("failed to parse data file: {err}");
                Vec::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => {
            error!("failed to read data file: {err}");
            Vec::new()
        }
    }
}

pub async fn persist_entries(path: &Path, entries: &[DailyEntry]) -> Result<(), AppError> {
    let payload = serde_json::to_vec(entries).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

pub async fn clear_entries(path: &Path) -> Result<(), AppError> {
    match fs::remove_file(path).await {
        Ok(()) => {
            info!(path = %path.display(), "cleared stored entries");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(AppError::internal(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_entries(&dir.path().join("absent.json")).await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"{not json").unwrap();
        assert!(load_entries(&path).await.is_empty());
    }

    #[tokio::test]
    async fn persisted_entries_reload_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut later = DailyEntry::placeholder(NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
        later.daily_xp = 10;
        let earlier = DailyEntry::placeholder(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());

        persist_entries(&path, &[later.clone(), earlier.clone()]).await.unwrap();
        let loaded = load_entries(&path).await;
        assert_eq!(loaded, vec![earlier, later]);

        clear_entries(&path).await.unwrap();
        assert!(!path.exists());
        clear_entries(&path).await.unwrap();
    }
}

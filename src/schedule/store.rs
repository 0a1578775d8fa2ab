//! Whole-document persistence for the schedule JSON file, plus the
//! timestamped backup rotation behind the undo action.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use directories::ProjectDirs;
use tracing::{info, warn};

use super::model::Schedule;

const SCHEDULE_FILE: &str = "schedule.json";
const BACKUP_DIR: &str = "backups";
const BACKUP_PREFIX: &str = "schedule_backup_";
const BACKUP_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Backups retained before the oldest is pruned.
pub const MAX_BACKUPS: usize = 5;

/// Filesystem home of the schedule document. Every mutating operation
/// reads the whole file, transforms in memory, and writes the whole file
/// back; there are no partial writes.
#[derive(Debug, Clone)]
pub struct Store {
    schedule_path: PathBuf,
    backup_dir: PathBuf,
}

impl Store {
    /// Store rooted at the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "weekplan", "weekplan")
            .context("Could not determine data directory")?;
        Ok(Self::at(dirs.data_dir()))
    }

    /// Store rooted at an explicit directory (tests, portable installs).
    pub fn at(base: &Path) -> Self {
        Self {
            schedule_path: base.join(SCHEDULE_FILE),
            backup_dir: base.join(BACKUP_DIR),
        }
    }

    pub fn schedule_path(&self) -> &Path {
        &self.schedule_path
    }

    /// Load the raw document. A missing file is an empty schedule, not an
    /// error; a corrupt file is.
    pub fn load(&self) -> Result<Schedule> {
        if !self.schedule_path.exists() {
            return Ok(Schedule::default());
        }
        let contents = fs::read_to_string(&self.schedule_path)
            .context("Failed to read schedule file")?;
        serde_json::from_str(&contents).context("Failed to parse schedule file")
    }

    /// Write the full document atomically: temp file in the same
    /// directory, then rename over the original.
    pub fn save(&self, schedule: &Schedule) -> Result<()> {
        if let Some(parent) = self.schedule_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(schedule)?;
        let tmp = self.schedule_path.with_extension("json.tmp");
        fs::write(&tmp, contents).context("Failed to write schedule temp file")?;
        fs::rename(&tmp, &self.schedule_path).context("Failed to replace schedule file")?;
        Ok(())
    }

    /// Copy the current document into the backup rotation, pruning to
    /// [`MAX_BACKUPS`]. No-op when there is nothing to back up yet.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        if !self.schedule_path.exists() {
            return Ok(None);
        }
        fs::create_dir_all(&self.backup_dir)?;

        let mut backups = self.list_backups()?;
        while backups.len() >= MAX_BACKUPS {
            let oldest = backups.remove(0);
            if let Err(e) = fs::remove_file(&oldest) {
                warn!(path = %oldest.display(), error = %e, "failed to prune oldest backup");
            }
        }

        let name = format!(
            "{}{}.json",
            BACKUP_PREFIX,
            Local::now().format(BACKUP_STAMP_FORMAT)
        );
        let path = self.backup_dir.join(name);
        fs::copy(&self.schedule_path, &path).context("Failed to create backup")?;
        info!(path = %path.display(), "backup created");
        Ok(Some(path))
    }

    /// Most recent backup file, if any.
    pub fn latest_backup(&self) -> Result<Option<PathBuf>> {
        Ok(self.list_backups()?.pop())
    }

    /// Restore the most recent backup over the document and consume it, so
    /// repeated undo walks further back. The document is only replaced if
    /// the copy succeeds. Returns the restored backup path, or `None` when
    /// there was nothing to restore.
    pub fn restore_latest(&self) -> Result<Option<PathBuf>> {
        let Some(latest) = self.latest_backup()? else {
            return Ok(None);
        };
        fs::copy(&latest, &self.schedule_path).context("Failed to restore backup")?;
        if let Err(e) = fs::remove_file(&latest) {
            warn!(path = %latest.display(), error = %e, "failed to remove restored backup");
        }
        info!(path = %latest.display(), "restored schedule from backup");
        Ok(Some(latest))
    }

    /// Timestamp embedded in a backup filename, for the confirmation prompt.
    pub fn backup_timestamp(path: &Path) -> Option<NaiveDateTime> {
        let stem = path.file_stem()?.to_str()?;
        let stamp = stem.strip_prefix(BACKUP_PREFIX)?;
        NaiveDateTime::parse_from_str(stamp, BACKUP_STAMP_FORMAT).ok()
    }

    /// Backup files, oldest first. The timestamp filenames sort
    /// lexicographically in time order.
    fn list_backups(&self) -> Result<Vec<PathBuf>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }
        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(BACKUP_PREFIX))
            })
            .collect();
        backups.sort();
        Ok(backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        assert!(store.load().unwrap().days.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        let schedule: Schedule =
            serde_json::from_str(r#"{ "Friday": [["8:00 AM - 9:00 AM", "Gym"]] }"#).unwrap();
        store.save(&schedule).unwrap();
        assert_eq!(store.load().unwrap(), schedule);
        // No stray temp file left behind.
        assert!(!store.schedule_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn backup_rotation_keeps_at_most_five() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save(&Schedule::default()).unwrap();

        // Same-second timestamps collapse to one file, so stamp them by hand.
        fs::create_dir_all(dir.path().join(BACKUP_DIR)).unwrap();
        for i in 0..7 {
            let name = format!("{}2025010100000{}.json", BACKUP_PREFIX, i);
            fs::write(dir.path().join(BACKUP_DIR).join(name), "{}").unwrap();
        }
        store.backup().unwrap();

        let count = fs::read_dir(dir.path().join(BACKUP_DIR)).unwrap().count();
        assert_eq!(count, MAX_BACKUPS);
    }

    #[test]
    fn restore_consumes_the_latest_backup() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        let original: Schedule =
            serde_json::from_str(r#"{ "Friday": [["8:00 AM - 9:00 AM", "Gym"]] }"#).unwrap();
        store.save(&original).unwrap();
        store.backup().unwrap();
        store.save(&Schedule::default()).unwrap();

        let restored = store.restore_latest().unwrap();
        assert!(restored.is_some());
        assert_eq!(store.load().unwrap(), original);
        assert!(store.latest_backup().unwrap().is_none());
    }

    #[test]
    fn restore_with_no_backups_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::at(dir.path());
        assert!(store.restore_latest().unwrap().is_none());
    }

    #[test]
    fn backup_timestamp_parses_from_filename() {
        let path = Path::new("backups/schedule_backup_20250218234150.json");
        let stamp = Store::backup_timestamp(path).unwrap();
        assert_eq!(stamp.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-02-18 23:41:50");
    }
}

//! Version Store
//!
//! Append-only persistence of schedule snapshots in a single JSON array
//! file. The store owns the file: every append rewrites it whole through a
//! temporary sibling and a rename, so a failed write never leaves a torn
//! history behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::diff::{diff, DiffSet};
use crate::error::{Result, ScheduleError};
use crate::schedule::Schedule;
use crate::version::ScheduleVersion;

/// Exclusive handle on one persisted version history
pub struct VersionStore {
    path: PathBuf,
    versions: Vec<ScheduleVersion>,
}

impl VersionStore {
    /// Open a store, loading its history. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            versions: Vec::new(),
        };
        store.load_all()?;
        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the full history from disk, oldest first
    pub fn load_all(&mut self) -> Result<&[ScheduleVersion]> {
        self.versions = read_history(&self.path)?;
        info!(
            path = %self.path.display(),
            versions = self.versions.len(),
            "loaded version history"
        );
        Ok(&self.versions)
    }

    /// History in storage order
    pub fn versions(&self) -> &[ScheduleVersion] {
        &self.versions
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, version: u64) -> Option<&ScheduleVersion> {
        self.versions.iter().find(|v| v.version == version)
    }

    pub fn latest(&self) -> Option<&ScheduleVersion> {
        self.versions.last()
    }

    /// The entry stored immediately before `version`
    pub fn previous(&self, version: u64) -> Option<&ScheduleVersion> {
        let idx = self.versions.iter().position(|v| v.version == version)?;
        idx.checked_sub(1).map(|i| &self.versions[i])
    }

    /// Number the next append would receive
    pub fn next_version(&self) -> u64 {
        self.versions.iter().map(|v| v.version).max().unwrap_or(0) + 1
    }

    /// Append a snapshot as a new version and persist the full history.
    ///
    /// The schedule is not validated here.
    pub fn append(
        &mut self,
        schedule: Schedule,
        label: Option<&str>,
        description: Option<&str>,
    ) -> Result<ScheduleVersion> {
        let version = ScheduleVersion::new(self.next_version(), schedule, label, description);

        self.versions.push(version.clone());
        if let Err(e) = write_history(&self.path, &self.versions) {
            self.versions.pop();
            return Err(e);
        }

        info!(
            version = version.version,
            label = %version.label,
            fingerprint = %version.schedule.fingerprint().short(),
            "appended schedule version"
        );
        Ok(version)
    }

    /// Cells changed between `version` and its predecessor
    pub fn diff_with_previous(&self, version: u64) -> Result<DiffSet> {
        let current = self
            .get(version)
            .ok_or(ScheduleError::VersionNotFound { version })?;
        Ok(diff(current, self.previous(version)))
    }
}

fn read_history(path: &Path) -> Result<Vec<ScheduleVersion>> {
    if !path.exists() {
        debug!(path = %path.display(), "no version store yet");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let versions: Vec<ScheduleVersion> = serde_json::from_str(&content)?;

    for pair in versions.windows(2) {
        if pair[1].version <= pair[0].version {
            return Err(ScheduleError::CorruptHistory(format!(
                "version {} stored after version {}",
                pair[1].version, pair[0].version
            )));
        }
    }

    Ok(versions)
}

fn write_history(path: &Path, versions: &[ScheduleVersion]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(versions)?;
    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn schedule(first: &str) -> Schedule {
        Schedule::new().with_slot("slot_1", [first, "2"])
    }

    #[test]
    fn test_open_missing_store() {
        let dir = tempdir().unwrap();
        let store = VersionStore::open(dir.path().join("versions.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_version(), 1);
    }

    #[test]
    fn test_append_numbers_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output").join("versions.json");
        let mut store = VersionStore::open(&path).unwrap();

        let v1 = store.append(schedule("1"), None, None).unwrap();
        let v2 = store.append(schedule("3"), Some("Swap"), Some("moved 3")).unwrap();
        assert_eq!(v1.version, 1);
        assert_eq!(v2.version, 2);
        assert_eq!(v2.label, "Swap");

        let reopened = VersionStore::open(&path).unwrap();
        let numbers: Vec<u64> = reopened.versions().iter().map(|v| v.version).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(reopened.get(1).unwrap().label, "Version 1");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_next_version_follows_max() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("versions.json");
        fs::write(
            &path,
            r#"[
                {"version": 4, "label": "A", "description": "", "created": "2026-01-01T00:00:00Z", "schedule": {}},
                {"version": 9, "label": "B", "description": "", "created": "2026-01-02T00:00:00Z", "schedule": {}}
            ]"#,
        )
        .unwrap();

        let mut store = VersionStore::open(&path).unwrap();
        assert_eq!(store.append(Schedule::new(), None, None).unwrap().version, 10);
        assert_eq!(store.previous(10).unwrap().version, 9);
        assert!(store.previous(4).is_none());
    }

    #[test]
    fn test_non_increasing_history_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("versions.json");
        fs::write(
            &path,
            r#"[
                {"version": 2, "label": "A", "created": "2026-01-01T00:00:00Z", "schedule": {}},
                {"version": 2, "label": "B", "created": "2026-01-02T00:00:00Z", "schedule": {}}
            ]"#,
        )
        .unwrap();

        assert!(matches!(
            VersionStore::open(&path),
            Err(ScheduleError::CorruptHistory(_))
        ));
    }

    #[test]
    fn test_diff_with_previous() {
        let dir = tempdir().unwrap();
        let mut store = VersionStore::open(dir.path().join("versions.json")).unwrap();
        store.append(schedule("1"), None, None).unwrap();
        store.append(schedule("5"), None, None).unwrap();

        assert!(store.diff_with_previous(1).unwrap().is_empty());
        assert_eq!(store.diff_with_previous(2).unwrap().len(), 1);
        assert!(matches!(
            store.diff_with_previous(7),
            Err(ScheduleError::VersionNotFound { version: 7 })
        ));
    }

    #[test]
    fn test_failed_append_leaves_history_intact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("versions.json");
        let mut store = VersionStore::open(&path).unwrap();
        store.append(schedule("1"), None, None).unwrap();
        let before = fs::read(&path).unwrap();

        // A directory where the temp file should go makes the rewrite fail
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let result = store.append(schedule("3"), None, None);
        assert!(matches!(result, Err(ScheduleError::Io(_))));
        assert_eq!(store.versions().len(), 1);
        assert_eq!(store.next_version(), 2);
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}

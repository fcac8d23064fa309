//! Snapshot files on disk
//!
//! One file per snapshot, named `Save<N>.<ext>`, all directly inside the save
//! directory. The next `N` is the larger of a persisted counter (`next_save`)
//! and one past the highest index present, so numbers are never reused after
//! a delete or an interrupted save. Every directory access goes through one
//! mutex shared by all clones of the store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::GameConfig;

use super::atomic_write::write_atomic;
use super::codec;
use super::error::SaveError;
use super::snapshot::SnapshotRecord;

/// File holding the next snapshot number
pub const COUNTER_FILE: &str = "next_save";

/// File prefix of every snapshot
const FILE_PREFIX: &str = "Save";

/// Access to the save directory
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    extension: String,
    build_version: String,
    lock: Arc<Mutex<()>>,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>, build_version: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            build_version: build_version.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Build a store from the game configuration
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.save_directory(), config.save_extension.clone(), config.build_version.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Version stamped into new snapshots and required when listing
    pub fn build_version(&self) -> &str {
        &self.build_version
    }

    /// Path of snapshot number `index`
    pub fn snapshot_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{}{}.{}", FILE_PREFIX, index, self.extension))
    }

    /// Hold the directory lock (tests use this to stall workers)
    pub(crate) fn lock_directory(&self) -> MutexGuard<'_, ()> {
        self.lock.lock()
    }

    /// Write a snapshot under the next free number
    ///
    /// If the directory is missing the first attempt fails, the directory is
    /// created, and exactly one more attempt is made.
    pub fn write(&self, record: &SnapshotRecord) -> Result<PathBuf, SaveError> {
        let bytes = codec::encode(record)?;
        let _guard = self.lock.lock();
        self.with_directory_retry(|| self.write_next(&bytes))
    }

    /// Run `attempt`, and once more after creating the directory if the first
    /// run failed because it was missing
    fn with_directory_retry<T>(&self, mut attempt: impl FnMut() -> Result<T, SaveError>) -> Result<T, SaveError> {
        match attempt() {
            Err(SaveError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("Save directory {} does not exist, creating it", self.dir.display());
                fs::create_dir_all(&self.dir)?;
                log::info!("Trying to save again...");
                attempt()
            }
            result => result,
        }
    }

    fn write_next(&self, bytes: &[u8]) -> Result<PathBuf, SaveError> {
        let index = self.next_index()?;
        // u32::MAX itself is never handed out, so the counter always fits
        let next = index.checked_add(1).ok_or(SaveError::Exhausted)?;
        let path = self.snapshot_path(index);
        write_atomic(&path, bytes)?;

        if let Err(e) = write_atomic(&self.dir.join(COUNTER_FILE), next.to_string().as_bytes()) {
            // The directory scan still yields a fresh number next time
            log::warn!("Failed to update save counter: {}", e);
        }

        log::info!("Save file created: {}", path.display());
        Ok(path)
    }

    fn next_index(&self) -> Result<u32, SaveError> {
        let past_highest = match self.existing_indices()?.into_iter().max() {
            Some(highest) => highest.checked_add(1).ok_or(SaveError::Exhausted)?,
            None => 0,
        };
        Ok(past_highest.max(self.read_counter()))
    }

    fn read_counter(&self) -> u32 {
        let path = self.dir.join(COUNTER_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => text.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable save counter in {}", path.display());
                0
            }),
            Err(_) => 0,
        }
    }

    /// Numbers of all snapshot files currently present
    pub fn existing_indices(&self) -> io::Result<Vec<u32>> {
        let mut indices = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if let Some(index) = entry.file_name().to_str().and_then(|n| self.parse_index(n)) {
                indices.push(index);
            }
        }
        indices.sort_unstable();
        Ok(indices)
    }

    fn parse_index(&self, file_name: &str) -> Option<u32> {
        file_name
            .strip_prefix(FILE_PREFIX)?
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?
            .parse()
            .ok()
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }

    /// Read and decode snapshot number `index`
    pub fn read(&self, index: u32) -> Result<SnapshotRecord, SaveError> {
        let path = self.snapshot_path(index);
        let bytes = {
            let _guard = self.lock.lock();
            match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(SaveError::NotFound(path)),
                Err(e) => return Err(e.into()),
            }
        };
        codec::decode(&bytes)
    }

    /// All readable snapshots of the current build, oldest first
    ///
    /// Snapshots from other builds and corrupt files are logged and skipped.
    /// `limit == 0` returns everything.
    pub fn list(&self, limit: usize) -> Result<Vec<SnapshotRecord>, SaveError> {
        let files = {
            let _guard = self.lock.lock();
            let entries = match fs::read_dir(&self.dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(e.into()),
            };

            let mut files = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if !path.is_file() || !self.has_extension(&path) {
                    continue;
                }
                match fs::read(&path) {
                    Ok(bytes) => files.push((path, bytes)),
                    Err(e) => log::warn!("Skipping unreadable snapshot {}: {}", path.display(), e),
                }
            }
            files
        };

        let mut records = Vec::new();
        for (path, bytes) in files {
            let header = match codec::peek_header(&bytes) {
                Ok(header) => header,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if header.build_version != self.build_version {
                log::info!(
                    "Skipping {}: built with {}, current build is {}",
                    path.display(),
                    header.build_version,
                    self.build_version
                );
                continue;
            }
            match codec::decode(&bytes) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        records.sort_by_key(|r| r.time_created);
        if limit > 0 {
            records.truncate(limit);
        }
        Ok(records)
    }

    /// Remove snapshot number `index`; false if it did not exist
    pub fn delete(&self, index: u32) -> Result<bool, SaveError> {
        let path = self.snapshot_path(index);
        let _guard = self.lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::test_support::{init_logging, sample_context, sample_record, save_dir};
    use tempfile::TempDir;

    fn store() -> (TempDir, SnapshotStore) {
        let (temp, dir) = save_dir();
        (temp, SnapshotStore::new(dir, "pku", "0.0.1"))
    }

    fn snapshot_files(store: &SnapshotStore) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".pku"))
            .collect();
        names.sort();
        names
    }

    fn record_at(time_created: u64, build_version: &str) -> SnapshotRecord {
        let mut record = sample_record(&sample_context(), build_version);
        record.time_created = time_created;
        record.save_name = format!("save@{}", time_created);
        record
    }

    #[test]
    fn test_write_bootstraps_missing_directory() {
        init_logging();
        let (_temp, store) = store();
        assert!(!store.dir().exists());

        let path = store.write(&record_at(1, "0.0.1")).unwrap();

        assert!(store.dir().is_dir());
        assert_eq!(path, store.snapshot_path(0));
        assert_eq!(snapshot_files(&store), vec!["Save0.pku".to_string()]);
    }

    #[test]
    fn test_second_failure_after_bootstrap_is_returned() {
        init_logging();
        let (_temp, store) = store();
        let mut attempts = 0;

        let result: Result<(), SaveError> = store.with_directory_retry(|| {
            attempts += 1;
            Err(io::Error::from(io::ErrorKind::NotFound).into())
        });

        assert!(matches!(result, Err(SaveError::Io(ref e)) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(attempts, 2);
        assert!(store.dir().is_dir());
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_unusable_directory_fails_without_leftovers() {
        init_logging();
        let temp = TempDir::new().expect("tempdir");
        let blocker = temp.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();
        let store = SnapshotStore::new(blocker.join("Saves"), "pku", "0.0.1");

        let err = store.write(&record_at(1, "0.0.1")).unwrap_err();
        assert!(matches!(err, SaveError::Io(_)), "got: {err}");

        let names: Vec<_> = fs::read_dir(temp.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![std::ffi::OsString::from("file")]);
        assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");
    }

    #[test]
    fn test_failed_write_leaves_no_snapshot_or_counter() {
        let (_temp, store) = store();
        // A directory squatting on the temp name makes the write itself fail
        fs::create_dir_all(store.dir().join("Save0.pku.tmp")).unwrap();

        let err = store.write(&record_at(1, "0.0.1")).unwrap_err();
        assert!(matches!(err, SaveError::Io(_)), "got: {err}");
        assert!(snapshot_files(&store).is_empty());
        assert!(!store.dir().join(COUNTER_FILE).exists());
    }

    #[test]
    fn test_exhausted_numbers_are_an_error() {
        let (_temp, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        let last = store.snapshot_path(u32::MAX);
        fs::write(&last, b"occupied").unwrap();

        let err = store.write(&record_at(1, "0.0.1")).unwrap_err();
        assert!(matches!(err, SaveError::Exhausted), "got: {err}");
        assert_eq!(fs::read(&last).unwrap(), b"occupied");
        assert_eq!(store.existing_indices().unwrap(), vec![u32::MAX]);

        fs::remove_file(&last).unwrap();
        fs::write(store.dir().join(COUNTER_FILE), u32::MAX.to_string()).unwrap();
        assert!(matches!(store.write(&record_at(2, "0.0.1")), Err(SaveError::Exhausted)));
        assert!(store.existing_indices().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let (_temp, store) = store();
        let record = record_at(10, "0.0.1");
        store.write(&record).unwrap();

        assert_eq!(store.read(0).unwrap(), record);
    }

    #[test]
    fn test_numbers_never_reused_after_delete() {
        let (_temp, store) = store();
        store.write(&record_at(1, "0.0.1")).unwrap();
        store.write(&record_at(2, "0.0.1")).unwrap();
        assert_eq!(store.existing_indices().unwrap(), vec![0, 1]);

        assert!(store.delete(1).unwrap());
        assert!(!store.delete(1).unwrap());

        let path = store.write(&record_at(3, "0.0.1")).unwrap();
        assert_eq!(path, store.snapshot_path(2));
    }

    #[test]
    fn test_numbering_survives_lost_counter() {
        let (_temp, store) = store();
        store.write(&record_at(1, "0.0.1")).unwrap();
        store.write(&record_at(2, "0.0.1")).unwrap();
        fs::remove_file(store.dir().join(COUNTER_FILE)).unwrap();

        let path = store.write(&record_at(3, "0.0.1")).unwrap();
        assert_eq!(path, store.snapshot_path(2));
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (_temp, store) = store();
        fs::create_dir_all(store.dir()).unwrap();
        let err = store.read(999).unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
    }

    #[test]
    fn test_list_limit_returns_earliest_ascending() {
        let (_temp, store) = store();
        for time in [50, 10, 40, 20, 30] {
            store.write(&record_at(time, "0.0.1")).unwrap();
        }

        let all = store.list(0).unwrap();
        let times: Vec<u64> = all.iter().map(|r| r.time_created).collect();
        assert_eq!(times, vec![10, 20, 30, 40, 50]);

        let two = store.list(2).unwrap();
        let times: Vec<u64> = two.iter().map(|r| r.time_created).collect();
        assert_eq!(times, vec![10, 20]);

        assert_eq!(store.list(10).unwrap().len(), 5);
    }

    #[test]
    fn test_list_skips_other_builds_and_corrupt_files() {
        init_logging();
        let (_temp, store) = store();
        store.write(&record_at(1, "0.0.1")).unwrap();
        store.write(&record_at(2, "0.0.2")).unwrap();
        store.write(&record_at(3, "0.0.1")).unwrap();
        fs::write(store.dir().join("Save77.pku"), b"definitely not a snapshot").unwrap();
        fs::write(store.dir().join("notes.txt"), b"ignored").unwrap();

        let listed = store.list(0).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|r| r.build_version == "0.0.1"));
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let (_temp, store) = store();
        assert!(store.list(0).unwrap().is_empty());
    }

    #[test]
    fn test_parse_index() {
        let (_temp, store) = store();
        assert_eq!(store.parse_index("Save0.pku"), Some(0));
        assert_eq!(store.parse_index("Save42.pku"), Some(42));
        assert_eq!(store.parse_index("Save42.pku.tmp"), None);
        assert_eq!(store.parse_index("Save.pku"), None);
        assert_eq!(store.parse_index("Savex.pku"), None);
        assert_eq!(store.parse_index("Save3pku"), None);
        assert_eq!(store.parse_index("next_save"), None);
    }
}

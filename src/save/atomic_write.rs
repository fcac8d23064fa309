//! Atomic file write using the write-rename pattern.
//!
//! Data goes to `{path}.tmp`, is flushed with `sync_all()`, then renamed over
//! the final path. A crash mid-write leaves at most a stray `.tmp` file, never
//! a truncated snapshot. The parent directory is not created here; callers
//! decide how to handle a missing directory.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write `data` to `path`
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp_path = temp_path_for(path);

    let result = (|| -> io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_file_without_leftover_tmp() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("Save0.pku");

        write_atomic(&path, b"hello").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_overwrites_existing_and_stale_tmp() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("Save0.pku");

        fs::write(&path, b"original").unwrap();
        fs::write(temp_path_for(&path), b"partial garbage").unwrap();

        write_atomic(&path, b"new save").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new save");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let temp = TempDir::new().expect("tempdir");
        let dir = temp.path().join("Saves");
        let err = write_atomic(&dir.join("Save0.pku"), b"data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!dir.exists());
    }

    #[test]
    fn test_tmp_name_keeps_full_file_name() {
        let tmp = temp_path_for(Path::new("Saves/Save12.pku"));
        assert_eq!(tmp, Path::new("Saves/Save12.pku.tmp"));
    }
}

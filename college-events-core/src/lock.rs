//! Advisory lock serializing read-modify-write cycles on the events file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::EventsResult;

/// Held for the duration of one mutation; the lock is released when dropped.
pub(crate) struct WriteLock {
    file: File,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Sidecar lock file next to the store, e.g. `events.json.lock`.
pub(crate) fn lock_path_for(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("events"));
    name.push(".lock");
    store_path.with_file_name(name)
}

/// Block until the exclusive lock is acquired.
pub(crate) fn acquire(lock_path: &Path) -> EventsResult<WriteLock> {
    if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)?;
    file.lock_exclusive()?;

    Ok(WriteLock { file })
}

//! Disk I/O and file lifecycle for downloads.
//!
//! Bytes stream into a `.part` file next to the final path; on success the
//! temp file is fsynced and atomically renamed into place. A crash or abort
//! leaves only a `.part`, never a truncated final file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path
/// (e.g. `pics_abc123.png` → `pics_abc123.png.part`).
pub fn part_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// In-progress download file. Chunks are appended in arrival order;
/// `finalize` renames it to the final path.
pub struct PartFile {
    file: File,
    temp_path: PathBuf,
}

impl PartFile {
    /// Create (or truncate) the temp file at `temp_path`.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(PartFile {
            file,
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Append one chunk. Takes `&self` so the curl write callback can borrow
    /// the file immutably (`&File` implements `Write`).
    pub fn append(&self, data: &[u8]) -> io::Result<()> {
        (&self.file).write_all(data)
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically rename the temp file to the final path. Consumes the writer
    /// and closes the file first. Fails if `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        let temp_path = self.temp_path.clone();
        drop(self.file);

        std::fs::rename(&temp_path, final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
        Ok(())
    }
}

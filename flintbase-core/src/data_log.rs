// src/data_log.rs
// Append-only backing file: one `key:value` record per committed write

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FlintError, Result};

/// Append-only text log backing the key/value store.
///
/// The file is the authoritative committed state; the in-memory
/// `KeyValueStore` is a cache in front of it. One record per line,
/// `key:value`, split on the first `:` so values may contain the
/// separator. When a key is overwritten the new record is appended,
/// so loading must keep the most recent record per key.
pub struct DataLog {
    file: File,
    path: PathBuf,
}

impl DataLog {
    /// Open or create the backing file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        debug!(path = %path.display(), "opened data log");
        Ok(DataLog { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one committed record, synchronously flushed before return
    pub fn append(&mut self, key: &str, value: &str) -> Result<()> {
        if key.contains(':') {
            return Err(FlintError::InvalidKey(key.to_string()));
        }

        self.file.write_all(format!("{}:{}\n", key, value).as_bytes())?;
        self.file.sync_all()?;
        Ok(())
    }

    /// Load the committed mapping from the file, last-write-wins.
    ///
    /// Scanning forward and inserting into the map means a later record
    /// for the same key replaces the earlier one; the most recent write
    /// is the one a subsequent read must see.
    pub fn load(&mut self) -> Result<BTreeMap<String, String>> {
        self.file.seek(SeekFrom::Start(0))?;

        let mut entries = BTreeMap::new();
        let reader = BufReader::new(&self.file);

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                entries.insert(key.to_string(), value.to_string());
            }
            // Lines without a separator are ignored (torn trailing write)
        }

        Ok(entries)
    }

    /// Truncate-and-rewrite the file to exactly the given committed set.
    ///
    /// Used by rollback: the file must end up containing the
    /// pre-transaction key/value pairs and nothing else. Written to a
    /// temp file first, then renamed into place.
    pub fn rewrite(&mut self, entries: &BTreeMap<String, String>) -> Result<()> {
        let temp_path = self.path.with_extension("log.tmp");
        let mut temp_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;

        for (key, value) in entries {
            temp_file.write_all(format!("{}:{}\n", key, value).as_bytes())?;
        }
        temp_file.sync_all()?;
        drop(temp_file);

        std::fs::rename(&temp_path, &self.path)?;

        // Reopen so the handle points at the new file
        self.file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        debug!(path = %self.path.display(), records = entries.len(), "rewrote data log");
        Ok(())
    }

    /// Remove the backing file, consuming the log
    pub fn delete(self) -> Result<()> {
        let path = self.path;
        drop(self.file);
        std::fs::remove_file(&path)?;
        debug!(path = %path.display(), "deleted data log");
        Ok(())
    }
}

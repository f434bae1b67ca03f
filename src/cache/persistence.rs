//! Persistence adapters for the answer cache.
//!
//! The on-disk format is a two-column CSV table with the header
//! `Question,Answer`. The file is read once at startup and rewritten
//! wholesale at shutdown; nothing is appended mid-session.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{RecallError, Result};

use super::store::CacheStore;

/// Header row every cache file starts with.
pub const CSV_HEADER: [&str; 2] = ["Question", "Answer"];

/// Load/save service for the question → answer mapping.
pub trait CachePersistence {
    /// Read every persisted pair. Missing storage is an empty mapping;
    /// malformed storage is a [`RecallError::Persistence`].
    fn load(&self) -> Result<HashMap<String, String>>;

    /// Replace the persisted contents with `store`.
    fn save(&self, store: &CacheStore) -> Result<()>;

    /// Human-readable location for logs and status output.
    fn location(&self) -> String;
}

/// CSV file backend.
#[derive(Debug, Clone)]
pub struct CsvFile {
    path: PathBuf,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_failed(&self, e: impl std::fmt::Display) -> RecallError {
        RecallError::Persistence(format!("failed to write {}: {}", self.path.display(), e))
    }

    fn malformed(&self, detail: impl std::fmt::Display) -> RecallError {
        RecallError::Persistence(format!(
            "{} is not a valid answer cache: {}",
            self.path.display(),
            detail
        ))
    }
}

impl CachePersistence for CsvFile {
    fn load(&self) -> Result<HashMap<String, String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No answer cache on disk, starting empty");
                return Ok(HashMap::new());
            }
            Err(e) => {
                return Err(RecallError::Persistence(format!(
                    "failed to open {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        // Headers are validated by hand so a missing header row is reported
        // instead of being silently consumed as the first pair.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        let mut records = reader.records();

        match records.next() {
            None => return Err(self.malformed("missing header row")),
            Some(Err(e)) => return Err(self.malformed(e)),
            Some(Ok(header)) => {
                if header.len() != 2 || header.iter().ne(CSV_HEADER) {
                    return Err(self.malformed(format!(
                        "expected header `{}`, found `{}`",
                        CSV_HEADER.join(","),
                        header.iter().collect::<Vec<_>>().join(",")
                    )));
                }
            }
        }

        let mut entries = HashMap::new();
        for record in records {
            let record = record.map_err(|e| self.malformed(e))?;
            if record.len() != 2 {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(self.malformed(format!(
                    "line {} has {} column(s), expected 2",
                    line,
                    record.len()
                )));
            }
            let question = record[0].to_string();
            if entries.insert(question, record[1].to_string()).is_some() {
                debug!(path = %self.path.display(), "Duplicate question in cache file, keeping later row");
            }
        }

        Ok(entries)
    }

    fn save(&self, store: &CacheStore) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| {
            RecallError::Persistence(format!("failed to create {}: {}", parent.display(), e))
        })?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| self.write_failed(e))?;
        write_rows(tmp.as_file_mut(), store.iter()).map_err(|e| self.write_failed(e))?;
        tmp.as_file_mut().sync_all().map_err(|e| self.write_failed(e))?;

        tmp.persist(&self.path).map_err(|e| {
            warn!(path = %self.path.display(), error = %e.error, "Atomic cache rename failed");
            self.write_failed(e.error)
        })?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write a `Question,Answer` table to any writer, in the same format the
/// cache file uses.
pub fn write_csv<'a, W, I>(out: W, pairs: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    write_rows(out, pairs).map_err(|e| RecallError::Persistence(e.to_string()))
}

fn write_rows<'a, W, I>(out: W, pairs: I) -> std::result::Result<(), csv::Error>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for (question, answer) in pairs {
        writer.write_record([question, answer])?;
    }
    writer.flush()?;
    Ok(())
}

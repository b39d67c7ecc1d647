use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::info;

use crate::errors::{OutlookError, Result};
use crate::model::OutlookRecord;
use crate::reader::read_outlook_sheet;

/// Reads the outlook spreadsheet on first use and serves every later call from memory.
///
/// Concurrent first callers block on a single read. A failed read leaves the cache
/// empty, so the next call tries again.
#[derive(Debug)]
pub struct OutlookLoader {
    path: PathBuf,
    records: OnceCell<Vec<OutlookRecord>>,
}

impl OutlookLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: OnceCell::new(),
        }
    }

    /// A loader whose cache is already populated; `path` is informational only.
    pub fn from_records(path: impl Into<PathBuf>, records: Vec<OutlookRecord>) -> Self {
        Self {
            path: path.into(),
            records: OnceCell::with_value(records),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.records.get().is_some()
    }

    pub fn load(&self) -> Result<&[OutlookRecord]> {
        let records = self.records.get_or_try_init(|| {
            let sheet = read_outlook_sheet(&self.path)?;
            info!(
                rows = sheet.records.len(),
                path = %self.path.display(),
                "loaded outlook spreadsheet"
            );
            Ok::<_, OutlookError>(sheet.records)
        })?;
        Ok(records.as_slice())
    }
}

use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::app::ports::DataSource;
use crate::error::{Result, SiteError};
use crate::table::DataTable;

/// CSV file on local disk, re-read on every call.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn unavailable(&self, e: std::io::Error) -> SiteError {
        SiteError::DataUnavailable(format!("{}: {}", self.path.display(), e))
    }
}

impl DataSource for CsvFileSource {
    fn load_table(&self) -> Result<DataTable> {
        debug!("Loading projections from {}", self.path.display());
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;
        DataTable::from_reader(BufReader::new(file))
    }

    fn raw_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| self.unavailable(e))
    }

    fn last_modified(&self) -> Result<DateTime<Local>> {
        let modified = fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .map_err(|e| self.unavailable(e))?;
        Ok(DateTime::<Local>::from(modified))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_table_and_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "player,team\nAllen,BUF\n").unwrap();

        let source = CsvFileSource::new(&path);
        assert_eq!(source.load_table().unwrap().len(), 1);
        assert_eq!(source.raw_bytes().unwrap(), b"player,team\nAllen,BUF\n");
        assert!(source.last_modified().is_ok());
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let source = CsvFileSource::new(dir.path().join("missing.csv"));

        assert!(matches!(source.load_table(), Err(SiteError::DataUnavailable(_))));
        assert!(matches!(source.raw_bytes(), Err(SiteError::DataUnavailable(_))));
        assert!(matches!(source.last_modified(), Err(SiteError::DataUnavailable(_))));
    }
}

// src/domain/dataset.rs

use crate::domain::listing::{ListingRecord, ListingRow, LISTING_COLUMNS};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The merged table of every category's records.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<ListingRecord>,
}

impl Dataset {
    /// Concatenates category batches in the given order and drops rows that
    /// repeat an earlier row exactly.
    pub fn from_categories<I>(batches: I) -> Self
    where
        I: IntoIterator<Item = Vec<ListingRecord>>,
    {
        let mut seen: HashSet<[String; 8]> = HashSet::new();
        let mut records = Vec::new();

        for record in batches.into_iter().flatten() {
            if seen.insert(record.cells()) {
                records.push(record);
            }
        }

        Self { records }
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the whole table in one go. The file appears only once
    /// complete: rows go to a sibling temp file that is then renamed.
    pub fn write_csv(&self, path: &Path) -> Result<(), DatasetError> {
        let rows = self.records.iter().map(|r| r.cells());
        write_table_atomic(path, &LISTING_COLUMNS, rows)?;
        info!(rows = self.records.len(), path = %path.display(), "💾 table written");
        Ok(())
    }

    /// Reads a listings table. Rows that fail to parse are skipped.
    pub fn read_csv(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();

        for (i, row) in reader.deserialize::<ListingRow>().enumerate() {
            let parsed = row
                .map_err(|e| e.to_string())
                .and_then(ListingRecord::try_from);

            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!(row = i + 1, "skipping row: {e}"),
            }
        }

        Ok(Self { records })
    }
}

/// Writes header + rows to `<path>.tmp` and renames it over `path`.
pub fn write_table_atomic<H, R, C>(path: &Path, header: &[H], rows: R) -> Result<(), DatasetError>
where
    H: AsRef<[u8]>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<[u8]>,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let tmp = tmp_path(path);

    let result = (|| -> Result<(), DatasetError> {
        let mut wtr = csv::Writer::from_path(&tmp)?;
        wtr.write_record(header)?;
        for row in rows {
            wtr.write_record(row)?;
        }
        wtr.flush().map_err(|source| DatasetError::Io {
            path: tmp.clone(),
            source,
        })?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

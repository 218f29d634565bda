use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// One statement file that has been through `label`, identified by content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub checksum: String,
    pub filename: String,
    pub record_count: usize,
    /// Records labeled so far. Labeling runs in file order and quitting stops
    /// it, so these are always the first `labeled` records of the file.
    pub labeled: usize,
}

impl ImportRecord {
    pub fn is_complete(&self) -> bool {
        self.labeled >= self.record_count
    }
}

/// CSV ledger of imported statements, so a file is never labeled twice and a
/// quit session resumes where it stopped.
#[derive(Debug)]
pub struct ImportLog {
    path: PathBuf,
    entries: Vec<ImportRecord>,
}

pub fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

impl ImportLog {
    pub fn load(path: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        if path.exists() {
            let mut rdr = csv::Reader::from_path(path)?;
            for row in rdr.deserialize() {
                entries.push(row?);
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn find(&self, checksum: &str) -> Option<&ImportRecord> {
        self.entries.iter().find(|e| e.checksum == checksum)
    }

    /// Number of leading records of this file that were already labeled.
    pub fn already_labeled(&self, checksum: &str) -> usize {
        self.find(checksum).map_or(0, |e| e.labeled)
    }

    pub fn record(&mut self, entry: ImportRecord) {
        match self.entries.iter_mut().find(|e| e.checksum == entry.checksum) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn save(&self) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.path)?;
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

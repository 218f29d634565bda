use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::features::{extract, FeatureSet};
use crate::models::TransactionRecord;

/// Every labeled transaction seen so far, stored as a CSV table with columns
/// `date,desc,amount,cat`. The table is rewritten in full on save.
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    records: Vec<TransactionRecord>,
}

impl History {
    pub fn load(path: &Path) -> Result<Self> {
        let mut records = Vec::new();
        if path.exists() {
            let mut rdr = csv::Reader::from_path(path)?;
            for row in rdr.deserialize() {
                let mut record: TransactionRecord = row?;
                record.category = record
                    .category
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty());
                records.push(record);
            }
        }
        log::info!("Loaded {} history records from {}", records.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn labeled_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_labeled()).count()
    }

    /// `(features, category)` pairs for every labeled row, in table order.
    pub fn training_examples(&self) -> impl Iterator<Item = (FeatureSet, String)> + '_ {
        self.records.iter().filter_map(|r| {
            r.category
                .as_ref()
                .filter(|_| r.is_labeled())
                .map(|c| (extract(&r.description), c.clone()))
        })
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = TransactionRecord>) {
        self.records.extend(records);
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut wtr = csv::Writer::from_path(&self.path)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        log::info!("Wrote {} history records to {}", self.records.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(date: &str, desc: &str, amount: f64, cat: &str) -> TransactionRecord {
        TransactionRecord {
            category: Some(cat.to_string()),
            ..TransactionRecord::unlabeled(date, desc, amount)
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::load(&dir.path().join("history.csv")).unwrap();
        assert!(history.records().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let mut history = History::load(&path).unwrap();
        history.extend([
            labeled("02 Jan", "TESCO STORES 2817", -23.4, "Groceries"),
            TransactionRecord::unlabeled("03 Jan", "UNKNOWN, LTD", 5.0),
        ]);
        history.save().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("date,desc,amount,cat\n"));

        let reloaded = History::load(&path).unwrap();
        assert_eq!(reloaded.records(), history.records());
        assert_eq!(reloaded.records()[1].category, None);
        assert_eq!(reloaded.labeled_count(), 1);
    }

    #[test]
    fn test_category_cells_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(
            &path,
            "date,desc,amount,cat\n02 Jan,TESCO,-1.5, Groceries \n03 Jan,SHELL,-40,\n",
        )
        .unwrap();
        let history = History::load(&path).unwrap();
        assert_eq!(history.records()[0].category.as_deref(), Some("Groceries"));
        assert_eq!(history.records()[1].category, None);
    }

    #[test]
    fn test_training_examples_skip_unlabeled() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::load(&dir.path().join("h.csv")).unwrap();
        history.extend([
            labeled("02 Jan", "TESCO 12", -2.0, "Groceries"),
            TransactionRecord::unlabeled("03 Jan", "SHELL", -40.0),
            labeled("04 Jan", "SHELL 9", -30.0, "Car"),
        ]);
        let examples: Vec<(FeatureSet, String)> = history.training_examples().collect();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].1, "Groceries");
        assert!(examples[1].0.contains("SHELL"));
    }
}

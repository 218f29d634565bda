use std::path::Path;

use regex::Regex;

use crate::error::{BankClassifyError, Result};
use crate::models::TransactionRecord;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a statement as text, replacing invalid UTF-8 instead of failing.
fn read_lossy(file_path: &Path) -> Result<String> {
    let bytes = std::fs::read(file_path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_amount(raw: &str, line: usize) -> Result<f64> {
    let cleaned = raw.replace(',', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| BankClassifyError::MalformedRecord {
            line,
            reason: format!("unparseable amount {raw:?}"),
        })
}

// ---------------------------------------------------------------------------
// Importer kinds — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImporterKind {
    Plain,
    Santander,
}

impl ImporterKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Santander => "santander",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "Whitespace-separated statement",
            Self::Santander => "Santander plain-text export",
        }
    }

    pub fn detect(&self, file_path: &Path) -> bool {
        match self {
            Self::Plain => true,
            Self::Santander => detect_santander(file_path),
        }
    }

    pub fn parse(&self, file_path: &Path) -> Result<Vec<TransactionRecord>> {
        let content = read_lossy(file_path)?;
        let records = match self {
            Self::Plain => parse_plain(&content)?,
            Self::Santander => parse_santander(&content)?,
        };
        log::info!(
            "Parsed {} records from {} ({})",
            records.len(),
            file_path.display(),
            self.key()
        );
        Ok(records)
    }
}

// Most specific first; Plain accepts anything.
const ALL_IMPORTERS: &[ImporterKind] = &[ImporterKind::Santander, ImporterKind::Plain];

pub fn get_by_key(key: &str) -> Option<ImporterKind> {
    ALL_IMPORTERS.iter().find(|i| i.key() == key).copied()
}

pub fn get_for_file(file_path: &Path) -> Option<ImporterKind> {
    ALL_IMPORTERS.iter().find(|i| i.detect(file_path)).copied()
}

/// Pick the importer for `file_path`: an explicit key wins, otherwise the
/// first importer that recognizes the file.
pub fn resolve_importer(file_path: &Path, format_key: Option<&str>) -> Result<ImporterKind> {
    match format_key {
        Some(key) => get_by_key(key).ok_or_else(|| BankClassifyError::UnknownFormat(key.to_string())),
        None => get_for_file(file_path)
            .ok_or_else(|| BankClassifyError::NoImporter(file_path.display().to_string())),
    }
}

// ---------------------------------------------------------------------------
// Plain statement parser
// ---------------------------------------------------------------------------

const PLAIN_HEADER_LINES: usize = 3;

/// `DD Mon  DESCRIPTION WORDS ...  AMOUNT`, one transaction per line.
fn parse_plain(content: &str) -> Result<Vec<TransactionRecord>> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(PLAIN_HEADER_LINES) {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 3 {
            return Err(BankClassifyError::MalformedRecord {
                line: line_no,
                reason: format!("expected date, description and amount, got {line:?}"),
            });
        }
        let amount = parse_amount(fields[fields.len() - 1], line_no)?;
        records.push(TransactionRecord::unlabeled(
            fields[..2].join(" "),
            fields[2..fields.len() - 1].join(" "),
            amount,
        ));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Santander parser
// ---------------------------------------------------------------------------

const SANTANDER_HEADER_LINES: usize = 4;

fn detect_santander(file_path: &Path) -> bool {
    let Ok(content) = read_lossy(file_path) else {
        return false;
    };
    let mut previous_was_date = false;
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if previous_was_date && line.starts_with("Description:") {
            return true;
        }
        previous_was_date = line.starts_with("Date:");
    }
    false
}

fn parse_santander(content: &str) -> Result<Vec<TransactionRecord>> {
    let not_numeric = Regex::new(r"[^0-9.\-]").map_err(|e| BankClassifyError::Other(e.to_string()))?;
    let mut dates = Vec::new();
    let mut descriptions = Vec::new();
    let mut amounts = Vec::new();

    for (idx, line) in content.lines().enumerate().skip(SANTANDER_HEADER_LINES) {
        let line: String = line.chars().filter(char::is_ascii).collect();
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Date" => dates.push(value.to_string()),
            "Description" => descriptions.push(value.to_string()),
            "Amount" => {
                let numeric = not_numeric.replace_all(value, "");
                amounts.push(parse_amount(&numeric, idx + 1)?);
            }
            _ => {}
        }
    }

    if dates.len() != descriptions.len() || dates.len() != amounts.len() {
        return Err(BankClassifyError::MalformedRecord {
            line: content.lines().count(),
            reason: format!(
                "unbalanced statement: {} dates, {} descriptions, {} amounts",
                dates.len(),
                descriptions.len(),
                amounts.len()
            ),
        });
    }

    Ok(dates
        .into_iter()
        .zip(descriptions)
        .zip(amounts)
        .map(|((date, description), amount)| TransactionRecord::unlabeled(date, description, amount))
        .collect())
}

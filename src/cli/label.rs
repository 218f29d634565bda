use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};
use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};
use dialoguer::Input;

use crate::classifier::{Guess, IncrementalClassifier};
use crate::error::{BankClassifyError, Result};
use crate::fmt::amount;
use crate::history::History;
use crate::importer::resolve_importer;
use crate::imports::{compute_checksum, ImportLog, ImportRecord};
use crate::labeler::{InteractiveLabeler, Presentation, Prompt};
use crate::models::TransactionRecord;
use crate::registry::CategoryRegistry;
use crate::settings::Settings;

/// Full-screen prompt: category chart, transaction, guess, one line of input.
struct TerminalPrompt;

impl TerminalPrompt {
    fn clear_screen() -> Result<()> {
        let mut out = std::io::stdout();
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        out.flush()?;
        Ok(())
    }
}

pub(crate) fn category_table(names: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Category"]);
    for (i, name) in names.iter().enumerate() {
        table.add_row(vec![Cell::new(i), Cell::new(name)]);
    }
    table
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, view: &Presentation<'_>) -> Result<String> {
        Self::clear_screen()?;
        println!("{}\n", category_table(view.categories));

        let record = view.record;
        let amt = if record.amount < 0.0 {
            amount(record.amount).red()
        } else {
            amount(record.amount).green()
        };
        println!(
            "{}",
            format!("[{} of {}]", view.position + 1, view.total).dimmed()
        );
        println!("On: {}\t{amt}", record.date);
        println!("{}", record.description.bold());
        match view.guess {
            Guess::Category(name) => println!("My guess is: {}", name.yellow().bold()),
            Guess::NoGuess => println!("My guess is: {}", "(none yet)".dimmed()),
        }
        println!();

        Input::<String>::new()
            .with_prompt("Enter to accept, # to pick, a new name, or q to quit")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| BankClassifyError::Other(format!("Failed to read input: {e}")))
    }

    fn reject(&mut self, error: &BankClassifyError) {
        eprintln!("{}", error.to_string().red());
        eprint!("Press Enter to try again...");
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_line(&mut buf) {
            log::warn!("Could not wait for Enter after a rejected answer: {e}");
        }
    }
}

/// Records still to label. Sessions label a statement front to back, so an
/// earlier session on the same file has labeled exactly the first `already`.
fn pending(parsed: Vec<TransactionRecord>, already: usize) -> Vec<TransactionRecord> {
    parsed.into_iter().skip(already).collect()
}

pub fn run(file: &str, format: Option<&str>) -> Result<()> {
    let settings = Settings::load();
    let file_path = PathBuf::from(file);

    let importer = resolve_importer(&file_path, format.or(settings.default_format()))?;
    println!("Reading {} as {}", file_path.display(), importer.name());
    let parsed = importer.parse(&file_path)?;
    let total = parsed.len();
    if total == 0 {
        println!("No transactions in {}.", file_path.display());
        return Ok(());
    }

    let checksum = compute_checksum(&file_path)?;
    let mut imports = ImportLog::load(&settings.imports_path())?;
    if let Some(prior) = imports.find(&checksum).filter(|e| e.is_complete()) {
        println!(
            "Already imported: all {} transactions of this file were labeled (as {}).",
            prior.record_count, prior.filename
        );
        return Ok(());
    }
    let already = imports.already_labeled(&checksum);
    if already > 0 {
        println!("Resuming: {already} of {total} transactions were labeled last time.");
    }

    let mut history = History::load(&settings.history_path())?;
    let mut registry = CategoryRegistry::load(&settings.categories_path())?;
    let mut classifier = IncrementalClassifier::train(history.training_examples());
    log::info!("Trained on {} labeled records", classifier.len());

    let outcome = {
        let mut labeler = InteractiveLabeler::new(&mut classifier, &mut registry, TerminalPrompt);
        labeler.label_batch(pending(parsed, already))?
    };

    let resolved = outcome.resolved;
    let remaining = outcome.records.len() - resolved;
    history.extend(outcome.resolved_records().cloned());
    history.save()?;

    imports.record(ImportRecord {
        checksum,
        filename: file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_string()),
        record_count: total,
        labeled: already + resolved,
    });
    imports.save()?;

    println!(
        "{resolved} labeled{}",
        if outcome.quit {
            format!(", {remaining} left for next time")
        } else {
            String::new()
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(rows: &[(&str, &str, f64)]) -> Vec<TransactionRecord> {
        rows.iter()
            .map(|(date, desc, amt)| TransactionRecord::unlabeled(*date, *desc, *amt))
            .collect()
    }

    #[test]
    fn test_repeat_of_last_years_transaction_is_still_labeled() {
        let dir = tempfile::tempdir().unwrap();
        let last_year = dir.path().join("2023.txt");
        let this_year = dir.path().join("2024.txt");
        std::fs::write(&last_year, "h1\nh2\nh3\n02 Jan NETFLIX -9.99\n").unwrap();
        std::fs::write(&this_year, "h1\nh2\nh3\n02 Jan NETFLIX -9.99\n03 Jan TESCO -4.00\n").unwrap();

        let mut imports = ImportLog::load(&dir.path().join("imports.csv")).unwrap();
        imports.record(ImportRecord {
            checksum: compute_checksum(&last_year).unwrap(),
            filename: "2023.txt".into(),
            record_count: 1,
            labeled: 1,
        });

        // Same date, description and amount as a stored row, different file.
        let parsed = stmt(&[("02 Jan", "NETFLIX", -9.99), ("03 Jan", "TESCO", -4.0)]);
        let already = imports.already_labeled(&compute_checksum(&this_year).unwrap());
        let batch = pending(parsed, already);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].description, "NETFLIX");
    }

    #[test]
    fn test_resumed_statement_skips_labeled_prefix() {
        let parsed = stmt(&[
            ("02 Jan", "NETFLIX", -9.99),
            ("02 Jan", "NETFLIX", -9.99),
            ("03 Jan", "TESCO", -4.0),
        ]);
        let batch = pending(parsed, 1);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].description, "NETFLIX");
        assert_eq!(batch[1].description, "TESCO");
    }

    #[test]
    fn test_category_table_lists_indices() {
        let table = category_table(&["Food".to_string(), "Bills".to_string()]).to_string();
        assert!(table.contains("Food"));
        assert!(table.contains("Bills"));
        assert!(table.contains('1'));
    }
}

use std::collections::BTreeSet;

use comfy_table::{Cell, Table};

use crate::classifier::IncrementalClassifier;
use crate::error::Result;
use crate::history::History;
use crate::registry::CategoryRegistry;
use crate::settings::Settings;

pub fn run() -> Result<()> {
    let settings = Settings::load();
    let history_path = settings.history_path();
    let categories_path = settings.categories_path();

    println!("Data dir:    {}", settings.data_path().display());
    println!("History:     {}", history_path.display());
    println!("Categories:  {}", categories_path.display());

    let history = History::load(&history_path)?;
    let registry = CategoryRegistry::load(&categories_path)?;
    let classifier = IncrementalClassifier::train(history.training_examples());
    let labeled = history.labeled_count();

    println!();
    println!("Transactions:  {}", history.records().len());
    println!("Labeled:       {labeled}");
    println!("Unlabeled:     {}", history.records().len() - labeled);
    println!("Categories:    {}", registry.len());
    println!(
        "Classifier:    {}",
        if classifier.is_ready() {
            format!("ready ({} examples)", classifier.len())
        } else {
            format!("needs at least 2 examples (has {})", classifier.len())
        }
    );

    if !classifier.is_empty() {
        println!("\n{}", training_table(&classifier));
    }
    Ok(())
}

/// Examples and distinct words the classifier has per category.
fn training_table(classifier: &IncrementalClassifier) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Examples", "Words"]);
    for name in classifier.categories() {
        let mut examples = 0usize;
        let mut words = BTreeSet::new();
        for example in classifier.examples().iter().filter(|e| e.category == name) {
            examples += 1;
            words.extend(example.features.tokens());
        }
        table.add_row(vec![Cell::new(name), Cell::new(examples), Cell::new(words.len())]);
    }
    table
}

use std::collections::BTreeMap;

use crate::models::TransactionRecord;

/// Always left out of totals: transfers between own accounts and the like.
pub const IGNORE_CATEGORY: &str = "Ignore";

pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
}

pub struct Summary {
    pub income: Vec<CategoryTotal>,
    /// Outgoings as positive amounts.
    pub outgoings: Vec<CategoryTotal>,
    pub total_income: f64,
    pub total_outgoings: f64,
    pub net: f64,
    pub unlabeled: usize,
}

fn sorted_totals(map: BTreeMap<String, (f64, usize)>) -> Vec<CategoryTotal> {
    let mut items: Vec<CategoryTotal> = map
        .into_iter()
        .map(|(name, (total, count))| CategoryTotal { name, total, count })
        .collect();
    items.sort_by(|a, b| b.total.total_cmp(&a.total));
    items
}

/// Totals per category over labeled records, split by sign. `exclude` names
/// are skipped in addition to `Ignore`.
pub fn summarize(records: &[TransactionRecord], exclude: &[String]) -> Summary {
    let mut income: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut outgoings: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut unlabeled = 0usize;

    for record in records {
        let Some(category) = record.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
            unlabeled += 1;
            continue;
        };
        if category == IGNORE_CATEGORY || exclude.iter().any(|e| e.trim() == category) {
            continue;
        }
        let bucket = if record.amount > 0.0 {
            &mut income
        } else if record.amount < 0.0 {
            &mut outgoings
        } else {
            continue;
        };
        let entry = bucket.entry(category.to_string()).or_default();
        entry.0 += record.amount.abs();
        entry.1 += 1;
    }

    let income = sorted_totals(income);
    let outgoings = sorted_totals(outgoings);
    let total_income: f64 = income.iter().map(|i| i.total).sum();
    let total_outgoings: f64 = outgoings.iter().map(|i| i.total).sum();

    Summary {
        income,
        outgoings,
        total_income,
        total_outgoings,
        net: total_income - total_outgoings,
        unlabeled,
    }
}

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::amount;
use crate::history::History;
use crate::settings::Settings;
use crate::summary::{summarize, Summary};

pub fn run(exclude: &[String]) -> Result<()> {
    let history = History::load(&Settings::load().history_path())?;
    let data = summarize(history.records(), exclude);
    println!("{}", format_summary(&data));
    Ok(())
}

pub fn format_summary(data: &Summary) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "Count"]);

    if !data.income.is_empty() {
        table.add_row(vec![Cell::new("INCOME".green().bold()), Cell::new(""), Cell::new("")]);
        for item in &data.income {
            table.add_row(vec![
                Cell::new(format!("  {}", item.name)),
                Cell::new(amount(item.total)),
                Cell::new(item.count),
            ]);
        }
        table.add_row(vec![
            Cell::new("Total Income".bold()),
            Cell::new(amount(data.total_income)),
            Cell::new(""),
        ]);
        table.add_row(vec![Cell::new(""), Cell::new(""), Cell::new("")]);
    }

    if !data.outgoings.is_empty() {
        table.add_row(vec![Cell::new("OUTGOINGS".red().bold()), Cell::new(""), Cell::new("")]);
        for item in &data.outgoings {
            table.add_row(vec![
                Cell::new(format!("  {}", item.name)),
                Cell::new(amount(item.total)),
                Cell::new(item.count),
            ]);
        }
        table.add_row(vec![
            Cell::new("Total Outgoings".bold()),
            Cell::new(amount(data.total_outgoings)),
            Cell::new(""),
        ]);
        table.add_row(vec![Cell::new(""), Cell::new(""), Cell::new("")]);
    }

    let net_label = if data.net >= 0.0 {
        "NET".green().bold()
    } else {
        "NET".red().bold()
    };
    table.add_row(vec![Cell::new(net_label), Cell::new(amount(data.net)), Cell::new("")]);

    let mut out = format!("Spending Summary\n{table}");
    if data.unlabeled > 0 {
        out.push_str(&format!("\n{} unlabeled transactions not counted", data.unlabeled));
    }
    out
}

use colored::Colorize;

use crate::cli::label::category_table;
use crate::error::Result;
use crate::registry::CategoryRegistry;
use crate::settings::Settings;

pub fn list() -> Result<()> {
    let registry = CategoryRegistry::load(&Settings::load().categories_path())?;
    if registry.is_empty() {
        println!("No categories yet. Add one with `bankclassify categories add NAME`.");
        return Ok(());
    }
    println!("{}", category_table(registry.names()));
    Ok(())
}

pub fn add(name: &str) -> Result<()> {
    let mut registry = CategoryRegistry::load(&Settings::load().categories_path())?;
    let existed = registry.by_name(name);
    let index = registry.register(name)?;
    if existed.is_some() {
        println!("{} already exists as #{index}", name.trim());
    } else {
        println!("{}", format!("Added {} as #{index}", name.trim()).green());
    }
    Ok(())
}

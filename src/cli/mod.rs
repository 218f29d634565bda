pub mod categories;
pub mod init;
pub mod label;
pub mod status;
pub mod summary;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bankclassify",
    about = "Categorize bank transactions with a classifier that learns from your answers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and create the categories file.
    Init {
        /// Path for data files (default: ~/Documents/bankclassify)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a statement and interactively label each transaction.
    Label {
        /// Path to the statement file
        file: String,
        /// Importer format key: plain, santander (default: detect)
        #[arg(long)]
        format: Option<String>,
    },
    /// Manage the category list.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Income and outgoings per category across the whole history.
    Summary {
        /// Category to leave out (repeatable); Ignore is always left out
        #[arg(long)]
        exclude: Vec<String>,
    },
    /// Show data files and classifier state.
    Status,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List categories with their index numbers.
    List,
    /// Add a category (no-op if it already exists).
    Add {
        /// Category name, e.g. 'Groceries'
        name: String,
    },
}

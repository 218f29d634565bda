mod classifier;
mod cli;
mod error;
mod features;
mod fmt;
mod history;
mod importer;
mod imports;
mod labeler;
mod models;
mod registry;
mod settings;
mod summary;

use clap::Parser;

use cli::{CategoriesCommands, Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Label { file, format } => cli::label::run(&file, format.as_deref()),
        Commands::Categories { command } => match command {
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Add { name } => cli::categories::add(&name),
        },
        Commands::Summary { exclude } => cli::summary::run(&exclude),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

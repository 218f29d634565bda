use crate::error::Result;
use crate::settings::{expand_path, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let first_run = !Settings::exists();
    let mut settings = Settings::load();

    if let Some(dir) = data_dir {
        settings.data_dir = expand_path(&dir).to_string_lossy().into_owned();
    } else if first_run {
        println!("Data directory [{}]: ", settings.data_dir);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.data_dir = expand_path(chosen).to_string_lossy().into_owned();
        }
    }

    settings.save()?;

    let resolved = settings.data_path();
    std::fs::create_dir_all(&resolved)?;
    let categories = settings.categories_path();
    if !categories.exists() {
        std::fs::write(&categories, "")?;
    }

    println!("Initialized bankclassify at {}", resolved.display());
    Ok(())
}

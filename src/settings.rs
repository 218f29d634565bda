use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BankClassifyError, Result};

/// Where the data files live and what they are called. Stored as JSON in
/// [`settings_file`]; any key missing from the file takes its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_categories_file")]
    pub categories_file: String,
    #[serde(default = "default_history_file")]
    pub history_file: String,
    #[serde(default = "default_imports_file")]
    pub imports_file: String,
    /// Importer key used when `label` is not given `--format`. Empty means
    /// auto-detect.
    #[serde(default)]
    pub default_format: String,
}

fn default_categories_file() -> String {
    "categories.txt".to_string()
}

fn default_history_file() -> String {
    "history.csv".to_string()
}

fn default_imports_file() -> String {
    "imports.csv".to_string()
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `~/.config/bankclassify/settings.json`.
pub fn settings_file() -> PathBuf {
    home().join(".config").join("bankclassify").join("settings.json")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: home()
                .join("Documents")
                .join("bankclassify")
                .to_string_lossy()
                .into_owned(),
            categories_file: default_categories_file(),
            history_file: default_history_file(),
            imports_file: default_imports_file(),
            default_format: String::new(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&settings_file())
    }

    /// Missing or unparseable files give the defaults; the latter is logged.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Cannot read settings at {}: {e}", path.display());
                }
                return Self::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings at {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_file())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BankClassifyError::Settings(e.to_string()))?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    /// Whether `init` has been run before.
    pub fn exists() -> bool {
        settings_file().exists()
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.data_path().join(&self.categories_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_path().join(&self.history_file)
    }

    pub fn imports_path(&self) -> PathBuf {
        self.data_path().join(&self.imports_file)
    }

    pub fn default_format(&self) -> Option<&str> {
        Some(self.default_format.as_str()).filter(|f| !f.is_empty())
    }
}

/// Turn a user-typed directory into an absolute path: a leading `~` or `~/`
/// is the home directory, relative paths are taken from the working directory.
pub fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    let path = match raw.strip_prefix('~') {
        Some("") => home(),
        Some(rest) if rest.starts_with('/') => home().join(rest.trim_start_matches('/')),
        _ => PathBuf::from(raw),
    };
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

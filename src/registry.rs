use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{BankClassifyError, Result};

/// Append-only list of category names. A name's index is its position of
/// first registration and never changes.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    names: Vec<String>,
    path: Option<PathBuf>,
}

impl CategoryRegistry {
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load categories from a newline-delimited file; line N is index N.
    ///
    /// Blank, padded or repeated lines would break that correspondence, so a
    /// file containing any is rewritten in compact form before use. A missing
    /// file is an empty registry that will be created on first add.
    pub fn load(path: &Path) -> Result<Self> {
        let mut registry = Self {
            names: Vec::new(),
            path: Some(path.to_path_buf()),
        };
        if !path.exists() {
            return Ok(registry);
        }
        let content = std::fs::read_to_string(path)?;
        let mut compacted = false;
        for line in content.lines() {
            let name = line.trim();
            if name.is_empty() || registry.by_name(name).is_some() {
                compacted = true;
                continue;
            }
            compacted |= name != line;
            registry.names.push(name.to_string());
        }
        if compacted {
            log::warn!(
                "Rewriting {} without blank or repeated lines so line numbers match category numbers",
                path.display()
            );
            let mut body = registry.names.join("\n");
            if !body.is_empty() {
                body.push('\n');
            }
            std::fs::write(path, body)?;
        }
        log::info!("Loaded {} categories from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.names.iter().position(|n| n == name)
    }

    pub fn resolve(&self, index: i64) -> Result<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
            .ok_or(BankClassifyError::UnknownCategoryIndex {
                index,
                count: self.names.len(),
            })
    }

    /// Register `name` and return its index. Registering a known name is a
    /// no-op that returns the existing index.
    pub fn register(&mut self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BankClassifyError::InvalidCategoryName(name.to_string()));
        }
        if let Some(index) = self.by_name(name) {
            return Ok(index);
        }
        if let Some(path) = &self.path {
            append_line(path, name)?;
        }
        self.names.push(name.to_string());
        log::info!("Registered category {name:?} at index {}", self.names.len() - 1);
        Ok(self.names.len() - 1)
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;
    // Files written by hand often lack a trailing newline.
    let len = file.metadata()?.len();
    if len > 0 {
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }
    writeln!(file, "{line}")?;
    Ok(())
}

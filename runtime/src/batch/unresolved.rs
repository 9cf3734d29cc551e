//! Names for which no biography could be obtained, and their log file.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ordered, append-only set of unresolved names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UnresolvedSet {
    names: Vec<String>,
}

impl UnresolvedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name` unless it is already present.
    pub fn record(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Overwrite `path` with one name per line.
    pub fn write_log(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create unresolved log: {}", path.display()))?;
        let mut out = BufWriter::new(file);
        for name in &self.names {
            writeln!(out, "{name}")?;
        }
        out.flush()?;
        Ok(())
    }
}

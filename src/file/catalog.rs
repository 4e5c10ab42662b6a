// src/file/catalog.rs
use super::FileHandler;
use crate::config::TestDefinition;
use std::path::Path;
use std::fs;
use anyhow::{Result, Context};

#[derive(Debug, Clone, Copy)]
pub struct CatalogFileHandler;

impl CatalogFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<Vec<TestDefinition>> for CatalogFileHandler {
    fn load(&self, path: &Path) -> Result<Vec<TestDefinition>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))
    }

    fn save(&self, data: &Vec<TestDefinition>, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(data)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write catalog {}", path.display()))?;
        Ok(())
    }
}

// src/file/sample.rs
use super::FileHandler;
use crate::state::analysis_state::AnalysisState;
use anyhow::{Result, Context};
use std::path::Path;

/// A blank-ish spreadsheet in the layout the analysis expects.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTemplate {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTemplate {
    /// Wide pivot layout in pivot mode, otherwise the test's columns and
    /// example rows.
    pub fn from_state(state: &AnalysisState, preview_rows: &[Vec<String>]) -> Self {
        let rows = if state.pivot_mode {
            preview_rows.to_vec()
        } else {
            state.example_rows.clone()
        };
        Self {
            columns: state.preview_columns(),
            rows,
        }
    }
}

#[derive(Debug)]
pub struct DataTemplateHandler;

impl DataTemplateHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<DataTemplate> for DataTemplateHandler {
    fn load(&self, path: &Path) -> Result<DataTemplate> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let columns = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(String::from).collect());
        }
        Ok(DataTemplate { columns, rows })
    }

    // Semicolons match read.csv2, the import the guide suggests for CSV.
    fn save(&self, data: &DataTemplate, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writer.write_record(&data.columns)?;
        for row in &data.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

// src/file/mod.rs
use anyhow::{Result, Context, anyhow};
use std::path::{Path, PathBuf};
use std::fs;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use tracing::{error, info};

use crate::config::TestDefinition;

pub mod catalog;
pub mod script;
pub mod sample;

pub use script::ScriptFile;
pub use sample::DataTemplate;

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
    fn save(&self, data: &T, path: &Path) -> Result<()>;
}

pub type CatalogResult = Result<Vec<TestDefinition>>;

#[derive(Debug)]
pub struct FileManager {
    catalog_path: PathBuf,
    export_dir: PathBuf,
    catalog_handler: catalog::CatalogFileHandler,
    script_handler: script::ScriptFileHandler,
    template_handler: sample::DataTemplateHandler,
}

impl FileManager {
    pub fn new(catalog_path: PathBuf, export_dir: PathBuf) -> Self {
        Self {
            catalog_path,
            export_dir,
            catalog_handler: catalog::CatalogFileHandler::new(),
            script_handler: script::ScriptFileHandler::new(),
            template_handler: sample::DataTemplateHandler::new(),
        }
    }

    /// Reads the catalog on a worker thread; the result arrives on the
    /// returned channel exactly once.
    pub fn spawn_catalog_load(&self) -> Receiver<CatalogResult> {
        let (tx, rx) = mpsc::channel();
        let path = self.catalog_path.clone();
        let handler = self.catalog_handler;

        thread::spawn(move || {
            let result = read_catalog(&handler, &path);
            match &result {
                Ok(tests) => info!(path = %path.display(), count = tests.len(), "catalog loaded"),
                Err(e) => error!(path = %path.display(), "catalog load failed: {:#}", e),
            }
            // The receiver is gone when the app quit before the load finished.
            let _ = tx.send(result);
        });

        rx
    }

    fn ensure_export_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("Failed to create export directory {}", self.export_dir.display()))
    }

    pub fn export_script(&self, script: &ScriptFile) -> Result<PathBuf> {
        self.ensure_export_dir()?;
        let path = self.export_dir
            .join(format!("{}.R", script::script_stem(&script.frame, &script.title)));
        self.script_handler.save(script, &path)?;
        info!(path = %path.display(), steps = script.steps.len(), "script exported");
        Ok(path)
    }

    pub fn export_data_template(&self, frame: &str, title: &str, template: &DataTemplate) -> Result<PathBuf> {
        self.ensure_export_dir()?;
        let path = self.export_dir
            .join(format!("{}.csv", script::script_stem(frame, title)));
        self.template_handler.save(template, &path)?;
        info!(path = %path.display(), columns = template.columns.len(), "data template exported");
        Ok(path)
    }
}

fn read_catalog(handler: &catalog::CatalogFileHandler, path: &Path) -> CatalogResult {
    if !path.exists() {
        return Err(anyhow!("Catalog file not found: {}", path.display()));
    }
    handler.load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::catalog::fixtures::SAMPLE_CATALOG;

    #[test]
    fn background_load_delivers_tests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, SAMPLE_CATALOG).unwrap();

        let manager = FileManager::new(path, dir.path().to_path_buf());
        let rx = manager.spawn_catalog_load();
        let tests = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert!(!tests.is_empty());
    }

    #[test]
    fn background_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = FileManager::new(dir.path().join("missing.json"), dir.path().to_path_buf());
        let result = manager.spawn_catalog_load().recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn exports_land_in_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("scripts");
        let manager = FileManager::new(dir.path().join("catalog.json"), export_dir.clone());

        let script = ScriptFile {
            title: "Teste t Pareado".to_string(),
            frame: "coleta".to_string(),
            session_id: uuid::Uuid::new_v4(),
            generated_at: chrono::Local::now(),
            steps: Vec::new(),
        };
        let path = manager.export_script(&script).unwrap();
        assert_eq!(path, export_dir.join("coleta_teste_t_pareado.R"));

        let template = DataTemplate { columns: vec!["ID".to_string()], rows: Vec::new() };
        let csv_path = manager.export_data_template("coleta", "Teste t Pareado", &template).unwrap();
        assert_eq!(csv_path, export_dir.join("coleta_teste_t_pareado.csv"));
        assert!(csv_path.exists());
    }

    #[test]
    fn hostile_frame_names_stay_in_export_dir() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("scripts");
        let manager = FileManager::new(dir.path().join("catalog.json"), export_dir.clone());

        for frame in ["../escape", "sub/dir", "..\\win"] {
            let script = ScriptFile {
                title: "Teste t".to_string(),
                frame: frame.to_string(),
                session_id: uuid::Uuid::new_v4(),
                generated_at: chrono::Local::now(),
                steps: Vec::new(),
            };
            let path = manager.export_script(&script).unwrap();
            assert_eq!(path.parent(), Some(export_dir.as_path()), "frame {:?}", frame);

            let template = DataTemplate { columns: vec!["ID".to_string()], rows: Vec::new() };
            let csv_path = manager.export_data_template(frame, "Teste t", &template).unwrap();
            assert_eq!(csv_path.parent(), Some(export_dir.as_path()), "frame {:?}", frame);
        }
        assert!(!dir.path().join("escape_teste_t.R").exists());
    }
}

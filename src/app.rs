// src/app.rs
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use tracing::{error, warn};

use crate::config::Settings;
use crate::file::CatalogResult;
use crate::input::InputHandler;
use crate::state::AppState;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct App {
    state: AppState,
    input_handler: InputHandler,
    loader: Option<Receiver<CatalogResult>>,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: AppState::new(settings),
            input_handler: InputHandler::new(),
            loader: None,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.pump_catalog();

            terminal.draw(|frame| crate::ui::draw(frame, &mut self.state))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Err(e) = self.input_handler.handle_input(key.code, &mut self.state) {
                            error!(session = %self.state.session_id, "command failed: {:#}", e);
                            self.state.ui.error_message = Some(format!("{:#}", e));
                        }
                    }
                }
            }

            if self.state.should_quit {
                return Ok(());
            }
        }
    }

    /// Starts a catalog load when one was requested and installs a finished
    /// one.
    fn pump_catalog(&mut self) {
        if self.state.take_reload_request() {
            self.loader = Some(self.state.file_manager.spawn_catalog_load());
        }

        let Some(loader) = &self.loader else {
            return;
        };
        match loader.try_recv() {
            Ok(result) => {
                self.state.replace_catalog(result);
                self.loader = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                warn!(session = %self.state.session_id, "catalog loader stopped without a result");
                self.state.replace_catalog(Err(anyhow::anyhow!("catalog loader stopped unexpectedly")));
                self.loader = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::SAMPLE_CATALOG;
    use crate::state::CatalogStatus;
    use std::time::Instant;

    fn wait_for_catalog(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.state.catalog_status == CatalogStatus::Loading && Instant::now() < deadline {
            app.pump_catalog();
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn catalog_arrives_through_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, SAMPLE_CATALOG).unwrap();

        let settings = Settings { catalog_path: path, log_file: None, ..Settings::default() };
        let mut app = App::new(&settings);
        wait_for_catalog(&mut app);
        assert_eq!(app.state.catalog_status, CatalogStatus::Ready(10));
    }

    #[test]
    fn missing_catalog_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            catalog_path: dir.path().join("missing.json"),
            log_file: None,
            ..Settings::default()
        };
        let mut app = App::new(&settings);
        wait_for_catalog(&mut app);
        assert!(matches!(app.state.catalog_status, CatalogStatus::Failed(_)));
        assert!(app.state.ui.error_message.is_some());
    }
}

// src/input/command.rs
use anyhow::Result;
use crate::state::AppState;
use crate::state::input_state::InputMode;

pub trait Command {
    fn execute(&self, state: &mut AppState) -> Result<()>;
}

// Only keep basic global commands here
pub struct QuitCommand;
impl Command for QuitCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.should_quit = true;
        Ok(())
    }
}

pub struct GoHomeCommand;
impl Command for GoHomeCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.go_home();
        Ok(())
    }
}

pub struct ReloadCatalogCommand;
impl Command for ReloadCatalogCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.request_reload();
        state.ui.status_message = Some("Reloading catalog...".to_string());
        Ok(())
    }
}

pub struct ClearMessagesCommand;
impl Command for ClearMessagesCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.ui.clear_messages();
        state.input.mode = InputMode::Normal;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::state::CatalogStatus;

    #[test]
    fn reload_sets_loading_once() {
        let mut state = AppState::new(&Settings { log_file: None, ..Settings::default() });
        assert!(state.take_reload_request());
        state.replace_catalog(Ok(Vec::new()));
        assert!(!state.take_reload_request());

        ReloadCatalogCommand.execute(&mut state).unwrap();
        assert_eq!(state.catalog_status, CatalogStatus::Loading);
        assert!(state.take_reload_request());
        assert!(!state.take_reload_request());
    }

    #[test]
    fn quit_flags_the_session() {
        let mut state = AppState::new(&Settings::default());
        QuitCommand.execute(&mut state).unwrap();
        assert!(state.should_quit);
    }
}

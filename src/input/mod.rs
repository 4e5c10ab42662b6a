// src/input/mod.rs
use anyhow::Result;
use crossterm::event::KeyCode;
use crate::state::{AppState, View};
use crate::input::command::Command;
pub mod command;
pub mod home;
pub mod detail;
pub mod edit;

pub struct InputHandler {
    home_handler: home::HomeInputHandler,
    detail_handler: detail::DetailInputHandler,
    edit_handler: edit::EditInputHandler,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            home_handler: home::HomeInputHandler::new(),
            detail_handler: detail::DetailInputHandler::new(),
            edit_handler: edit::EditInputHandler::new(),
        }
    }

    pub fn handle_input(&self, key: KeyCode, state: &mut AppState) -> Result<()> {
        // A text box swallows every key until it is closed
        if state.input.is_editing() {
            if let Some(cmd) = self.edit_handler.handle_key(key, state) {
                return cmd.execute(state);
            }
            return Ok(());
        }

        state.ui.clear_messages();

        if let Some(cmd) = match state.view {
            View::Home => self.home_handler.handle_key(key, state),
            View::Detail(_) | View::Guided(_) => self.detail_handler.handle_key(key, state),
            View::NotFound(_) => match key {
                KeyCode::Enter => Some(Box::new(command::GoHomeCommand) as Box<dyn Command>),
                _ => None,
            },
        } {
            return cmd.execute(state);
        }

        if let Some(cmd) = self.handle_global_keys(key, state) {
            return cmd.execute(state);
        }

        Ok(())
    }

    fn handle_global_keys(&self, key: KeyCode, state: &AppState) -> Option<Box<dyn Command>> {
        match key {
            KeyCode::Char('q') => Some(Box::new(command::QuitCommand)),
            KeyCode::Char('R') => Some(Box::new(command::ReloadCatalogCommand)),
            KeyCode::Esc if state.view != View::Home => Some(Box::new(command::GoHomeCommand)),
            KeyCode::Esc => Some(Box::new(command::ClearMessagesCommand)),
            _ => None,
        }
    }
}

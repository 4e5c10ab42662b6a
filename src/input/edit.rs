// src/input/edit.rs
use super::command::Command;
use anyhow::Result;
use crossterm::event::KeyCode;
use crate::state::AppState;
use crate::state::input_state::{EditField, InputMode};

/// Keys while a text box has focus. Every keystroke is applied to the
/// session right away.
pub struct EditInputHandler;

impl EditInputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key(&self, key: KeyCode, state: &AppState) -> Option<Box<dyn Command>> {
        let InputMode::Editing(field) = state.input.mode else {
            return None;
        };
        match key {
            KeyCode::Enter | KeyCode::Esc => Some(Box::new(FinishEditCommand)),
            KeyCode::Char(c) => Some(Box::new(InsertCharCommand(field, c))),
            KeyCode::Backspace => Some(Box::new(DeleteCharCommand(field))),
            _ => None,
        }
    }
}

pub struct InsertCharCommand(pub EditField, pub char);
impl Command for InsertCharCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        let value = state.input.push_char(self.0, self.1);
        state.apply_edit(self.0, &value)?;
        Ok(())
    }
}

pub struct DeleteCharCommand(pub EditField);
impl Command for DeleteCharCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        let value = state.input.delete_char(self.0);
        state.apply_edit(self.0, &value)?;
        Ok(())
    }
}

pub struct FinishEditCommand;
impl Command for FinishEditCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.finish_edit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::sample_tests;
    use crate::config::Settings;

    fn type_text(state: &mut AppState, keys: &[KeyCode]) {
        let handler = EditInputHandler::new();
        for key in keys {
            if let Some(cmd) = handler.handle_key(*key, state) {
                cmd.execute(state).unwrap();
            }
        }
    }

    #[test]
    fn frame_rename_is_live_and_falls_back_when_blank() {
        let mut state = AppState::new(&Settings::default());
        state.replace_catalog(Ok(sample_tests()));
        state.select_test("Teste de Mann-Whitney U").unwrap();
        state.begin_edit(EditField::FrameName);

        let mut keys = vec![KeyCode::Backspace; "meus_dados".len()];
        type_text(&mut state, &keys);
        assert_eq!(state.analysis.frame_name, "meus_dados");

        keys = "coleta".chars().map(KeyCode::Char).collect();
        type_text(&mut state, &keys);
        assert_eq!(state.analysis.frame_name, "coleta");
        assert!(state.rendered_code()[0].code.contains("data = coleta"));
        assert!(state.import_snippet().contains("coleta <- read_excel"));

        type_text(&mut state, &[KeyCode::Enter]);
        assert_eq!(state.input.mode, InputMode::Normal);
    }

    #[test]
    fn p_value_text_is_kept() {
        let mut state = AppState::new(&Settings::default());
        state.begin_edit(EditField::PValue);
        type_text(&mut state, &[KeyCode::Char('0'), KeyCode::Char(','), KeyCode::Char('0'), KeyCode::Char('3'), KeyCode::Esc]);
        assert_eq!(state.input.p_value.value(), "0,03");
        assert!(matches!(
            crate::render::read_p_value(state.input.p_value.value()),
            crate::render::PValueReading::Significant { .. }
        ));
    }
}

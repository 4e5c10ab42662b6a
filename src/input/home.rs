// src/input/home.rs
use super::command::Command;
use anyhow::Result;
use crossterm::event::KeyCode;
use crate::state::{AppState, FlowPanel};
use crate::state::input_state::EditField;
use crate::state::ui_state::{step_selection, HomeFocus};

pub struct HomeInputHandler;

impl HomeInputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key(&self, key: KeyCode, state: &AppState) -> Option<Box<dyn Command>> {
        match (state.ui.home_focus, key) {
            (_, KeyCode::Tab) => Some(Box::new(SwitchHomeFocusCommand)),
            (_, KeyCode::Char('/')) => Some(Box::new(StartFilterCommand)),
            (_, KeyCode::Down) | (_, KeyCode::Char('j')) => Some(Box::new(MoveHomeCursorCommand(1))),
            (_, KeyCode::Up) | (_, KeyCode::Char('k')) => Some(Box::new(MoveHomeCursorCommand(-1))),
            (_, KeyCode::Enter) => Some(Box::new(ActivateHomeCommand)),
            (HomeFocus::Flow, KeyCode::Char('r')) if can_restart(state) => Some(Box::new(RestartFlowCommand)),
            (HomeFocus::Flow, KeyCode::Char(c)) if c.is_ascii_digit() && c != '0' => {
                let index = c.to_digit(10).map(|d| d as usize - 1)?;
                Some(Box::new(ChooseFlowOptionCommand(index)))
            },
            _ => None,
        }
    }
}

/// Restarting from the first question with nothing answered is a no-op.
pub fn can_restart(state: &AppState) -> bool {
    !state.navigator.at_root() || matches!(state.flow_panel, FlowPanel::Result { .. })
}

/// Number of entries in the flow list for the current panel.
fn flow_entries(state: &AppState) -> usize {
    match &state.flow_panel {
        FlowPanel::Question => state.navigator.current(state.catalog.tree())
            .map(|node| node.options.len())
            .unwrap_or(0),
        FlowPanel::Result { .. } => 1,
    }
}

pub struct SwitchHomeFocusCommand;
impl Command for SwitchHomeFocusCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.ui.home_focus = match state.ui.home_focus {
            HomeFocus::Sidebar => HomeFocus::Flow,
            HomeFocus::Flow => HomeFocus::Sidebar,
        };
        Ok(())
    }
}

pub struct StartFilterCommand;
impl Command for StartFilterCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.ui.home_focus = HomeFocus::Sidebar;
        state.begin_edit(EditField::Filter);
        Ok(())
    }
}

pub struct MoveHomeCursorCommand(pub isize);
impl Command for MoveHomeCursorCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        match state.ui.home_focus {
            HomeFocus::Sidebar => {
                let len = state.visible_tests().len();
                step_selection(&mut state.ui.test_list_state, len, self.0);
            }
            HomeFocus::Flow => {
                let len = flow_entries(state);
                step_selection(&mut state.ui.flow_list_state, len, self.0);
            }
        }
        Ok(())
    }
}

pub struct ActivateHomeCommand;
impl Command for ActivateHomeCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        match state.ui.home_focus {
            HomeFocus::Sidebar => {
                if let Some(title) = state.selected_sidebar_title() {
                    // A miss switches to the not-found view by itself.
                    let _ = state.select_test(&title);
                }
            }
            HomeFocus::Flow => match state.flow_panel {
                FlowPanel::Question => {
                    let index = state.ui.flow_list_state.selected().unwrap_or(0);
                    state.choose_flow_option(index);
                }
                FlowPanel::Result { found: Some(_), .. } => state.open_flow_result(),
                FlowPanel::Result { found: None, .. } => state.restart_flow(),
            },
        }
        Ok(())
    }
}

pub struct ChooseFlowOptionCommand(pub usize);
impl Command for ChooseFlowOptionCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.choose_flow_option(self.0);
        Ok(())
    }
}

pub struct RestartFlowCommand;
impl Command for RestartFlowCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.restart_flow();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::sample_tests;
    use crate::config::Settings;
    use crate::state::View;

    fn state() -> AppState {
        let mut state = AppState::new(&Settings::default());
        state.replace_catalog(Ok(sample_tests()));
        state
    }

    fn press(handler: &HomeInputHandler, state: &mut AppState, key: KeyCode) {
        if let Some(cmd) = handler.handle_key(key, state) {
            cmd.execute(state).unwrap();
        }
    }

    #[test]
    fn enter_walks_the_tree() {
        let handler = HomeInputHandler::new();
        let mut state = state();
        press(&handler, &mut state, KeyCode::Down);
        press(&handler, &mut state, KeyCode::Enter);
        assert_eq!(state.navigator.current_id(), "association");
        press(&handler, &mut state, KeyCode::Char('1'));
        assert_eq!(state.view, View::Guided("guide_correlacao".to_string()));
    }

    #[test]
    fn restart_is_offered_once_the_flow_moved() {
        let handler = HomeInputHandler::new();
        let mut state = state();
        assert!(!can_restart(&state));
        assert!(handler.handle_key(KeyCode::Char('r'), &state).is_none());

        press(&handler, &mut state, KeyCode::Char('2'));
        assert!(can_restart(&state));
        press(&handler, &mut state, KeyCode::Char('r'));
        assert!(state.navigator.at_root());
        assert!(!can_restart(&state));
    }

    #[test]
    fn result_panel_enter_opens_test() {
        let handler = HomeInputHandler::new();
        let mut state = state();
        press(&handler, &mut state, KeyCode::Char('3'));
        press(&handler, &mut state, KeyCode::Char('1'));
        press(&handler, &mut state, KeyCode::Enter);
        assert_eq!(state.current_test().unwrap().title, "Teste de Normalidade de Shapiro-Wilk");
    }

    #[test]
    fn sidebar_enter_opens_highlighted_test() {
        let handler = HomeInputHandler::new();
        let mut state = state();
        press(&handler, &mut state, KeyCode::Tab);
        press(&handler, &mut state, KeyCode::Char('j'));
        press(&handler, &mut state, KeyCode::Enter);
        assert_eq!(state.current_test().unwrap().title, "Teste de Mann-Whitney U");
    }

    #[test]
    fn cursor_stays_inside_options() {
        let handler = HomeInputHandler::new();
        let mut state = state();
        for _ in 0..10 {
            press(&handler, &mut state, KeyCode::Down);
        }
        assert_eq!(state.ui.flow_list_state.selected(), Some(2));
    }
}

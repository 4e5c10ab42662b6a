// src/input/detail.rs
use super::command::Command;
use anyhow::Result;
use crossterm::event::KeyCode;
use crate::state::{AppState, SetupRow, View};
use crate::state::input_state::EditField;
use crate::state::ui_state::{step_selection, DetailFocus};

const PAGE: u16 = 10;

/// Keys for the test detail view and the guided workflow view.
pub struct DetailInputHandler;

impl DetailInputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key(&self, key: KeyCode, state: &AppState) -> Option<Box<dyn Command>> {
        let guided = matches!(state.view, View::Guided(_));
        match key {
            KeyCode::Tab => Some(Box::new(CycleDetailFocusCommand)),
            KeyCode::Down | KeyCode::Char('j') => Some(Box::new(MoveDetailCursorCommand(1))),
            KeyCode::Up | KeyCode::Char('k') => Some(Box::new(MoveDetailCursorCommand(-1))),
            KeyCode::PageDown => Some(Box::new(ScrollCodeCommand(PAGE as i32))),
            KeyCode::PageUp => Some(Box::new(ScrollCodeCommand(-(PAGE as i32)))),
            KeyCode::Enter => Some(Box::new(ActivateSetupRowCommand)),
            KeyCode::Right | KeyCode::Char('l') => Some(Box::new(CycleSetupRowCommand(true))),
            KeyCode::Left => Some(Box::new(CycleSetupRowCommand(false))),
            KeyCode::Char('f') => Some(Box::new(BeginEditCommand(EditField::FrameName))),
            KeyCode::Char('p') => Some(Box::new(TogglePivotCommand)),
            KeyCode::Char('+') => Some(Box::new(AddPivotColumnCommand)),
            KeyCode::Char('-') => Some(Box::new(RemovePivotColumnCommand)),
            KeyCode::Char('i') => Some(Box::new(CycleImportFormatCommand)),
            KeyCode::Char('e') => Some(Box::new(ExportScriptCommand)),
            KeyCode::Char('d') => Some(Box::new(ExportDataTemplateCommand)),
            KeyCode::Char('h') => Some(Box::new(super::command::GoHomeCommand)),
            KeyCode::Char('v') if !guided => Some(Box::new(BeginEditCommand(EditField::PValue))),
            KeyCode::Char(c) if guided && c.is_ascii_digit() && c != '0' => {
                let index = c.to_digit(10).map(|d| d as usize - 1)?;
                Some(Box::new(ChooseBranchCommand(index)))
            },
            _ => None,
        }
    }
}

pub struct CycleDetailFocusCommand;
impl Command for CycleDetailFocusCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.ui.detail_focus = state.ui.detail_focus.next();
        Ok(())
    }
}

pub struct MoveDetailCursorCommand(pub isize);
impl Command for MoveDetailCursorCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        match state.ui.detail_focus {
            DetailFocus::Setup => {
                let len = state.setup_rows().len();
                step_selection(&mut state.ui.setup_list_state, len, self.0);
            }
            DetailFocus::Info => state.ui.info_scroll = scrolled(state.ui.info_scroll, self.0 as i32),
            DetailFocus::Code => state.ui.code_scroll = scrolled(state.ui.code_scroll, self.0 as i32),
        }
        Ok(())
    }
}

pub struct ScrollCodeCommand(pub i32);
impl Command for ScrollCodeCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.ui.code_scroll = scrolled(state.ui.code_scroll, self.0);
        Ok(())
    }
}

fn scrolled(offset: u16, delta: i32) -> u16 {
    (offset as i32 + delta).clamp(0, u16::MAX as i32) as u16
}

/// Enter on a setup row: edit text rows, toggle pivot, step choices.
pub struct ActivateSetupRowCommand;
impl Command for ActivateSetupRowCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        if state.ui.detail_focus != DetailFocus::Setup {
            return Ok(());
        }
        match state.selected_setup_row() {
            Some(SetupRow::FrameName) => state.begin_edit(EditField::FrameName),
            Some(SetupRow::Column(i)) => state.begin_edit(EditField::ColumnHeader(i)),
            Some(SetupRow::PivotColumn(i)) => state.begin_edit(EditField::PivotColumn(i)),
            Some(SetupRow::NamesTo) => state.begin_edit(EditField::NamesTo),
            Some(SetupRow::ValuesTo) => state.begin_edit(EditField::ValuesTo),
            Some(SetupRow::PivotToggle) => state.toggle_pivot(),
            Some(SetupRow::Variable(role)) => state.cycle_variable(role, true),
            Some(SetupRow::ImportFormat) => state.cycle_import_format(),
            None => {}
        }
        Ok(())
    }
}

pub struct CycleSetupRowCommand(pub bool);
impl Command for CycleSetupRowCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        if state.ui.detail_focus != DetailFocus::Setup {
            return Ok(());
        }
        match state.selected_setup_row() {
            Some(SetupRow::Variable(role)) => state.cycle_variable(role, self.0),
            Some(SetupRow::ImportFormat) => state.cycle_import_format(),
            Some(SetupRow::PivotToggle) => state.toggle_pivot(),
            _ => {}
        }
        Ok(())
    }
}

pub struct BeginEditCommand(pub EditField);
impl Command for BeginEditCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.begin_edit(self.0);
        Ok(())
    }
}

pub struct TogglePivotCommand;
impl Command for TogglePivotCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.toggle_pivot();
        Ok(())
    }
}

pub struct AddPivotColumnCommand;
impl Command for AddPivotColumnCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.add_pivot_column();
        Ok(())
    }
}

pub struct RemovePivotColumnCommand;
impl Command for RemovePivotColumnCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.remove_pivot_column();
        Ok(())
    }
}

pub struct CycleImportFormatCommand;
impl Command for CycleImportFormatCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.cycle_import_format();
        Ok(())
    }
}

pub struct ChooseBranchCommand(pub usize);
impl Command for ChooseBranchCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.choose_branch(self.0);
        Ok(())
    }
}

pub struct ExportScriptCommand;
impl Command for ExportScriptCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.export_script()?;
        Ok(())
    }
}

pub struct ExportDataTemplateCommand;
impl Command for ExportDataTemplateCommand {
    fn execute(&self, state: &mut AppState) -> Result<()> {
        state.export_data_template()?;
        Ok(())
    }
}

// src/state/input_state.rs
use tui_input::{Input, InputRequest};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Editing(EditField),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditField {
    Filter,
    PValue,
    FrameName,
    ColumnHeader(usize),
    PivotColumn(usize),
    NamesTo,
    ValuesTo,
}

impl EditField {
    pub fn label(&self) -> String {
        match self {
            EditField::Filter => "Filter".to_string(),
            EditField::PValue => "p-value".to_string(),
            EditField::FrameName => "Data frame name".to_string(),
            EditField::ColumnHeader(i) => format!("Column {}", i + 1),
            EditField::PivotColumn(i) => format!("Wide column {}", i + 1),
            EditField::NamesTo => "names_to".to_string(),
            EditField::ValuesTo => "values_to".to_string(),
        }
    }
}

/// Text boxes. The filter and the p-value keep their text between edits;
/// `buffer` is reloaded from the analysis state each time a setup field is
/// opened.
#[derive(Debug)]
pub struct InputState {
    pub mode: InputMode,
    pub buffer: Input,
    pub filter: Input,
    pub p_value: Input,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            buffer: Input::default(),
            filter: Input::default(),
            p_value: Input::default(),
        }
    }
}

impl InputState {
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, InputMode::Editing(_))
    }

    /// Input box that receives keystrokes for `field`.
    pub fn field_mut(&mut self, field: EditField) -> &mut Input {
        match field {
            EditField::Filter => &mut self.filter,
            EditField::PValue => &mut self.p_value,
            _ => &mut self.buffer,
        }
    }

    pub fn field(&self, field: EditField) -> &Input {
        match field {
            EditField::Filter => &self.filter,
            EditField::PValue => &self.p_value,
            _ => &self.buffer,
        }
    }

    pub fn push_char(&mut self, field: EditField, c: char) -> String {
        let input = self.field_mut(field);
        input.handle(InputRequest::InsertChar(c));
        input.value().to_string()
    }

    pub fn delete_char(&mut self, field: EditField) -> String {
        let input = self.field_mut(field);
        input.handle(InputRequest::DeletePrevChar);
        input.value().to_string()
    }
}

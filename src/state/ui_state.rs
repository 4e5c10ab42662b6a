// src/state/ui_state.rs
use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HomeFocus {
    Sidebar,
    Flow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailFocus {
    Setup,
    Info,
    Code,
}

impl DetailFocus {
    pub fn next(self) -> Self {
        match self {
            DetailFocus::Setup => DetailFocus::Info,
            DetailFocus::Info => DetailFocus::Code,
            DetailFocus::Code => DetailFocus::Setup,
        }
    }
}

#[derive(Debug)]
pub struct UiState {
    pub home_focus: HomeFocus,
    pub detail_focus: DetailFocus,
    pub error_message: Option<String>,
    pub status_message: Option<String>,
    pub test_list_state: ListState,
    pub flow_list_state: ListState,
    pub setup_list_state: ListState,
    pub info_scroll: u16,
    pub code_scroll: u16,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            home_focus: HomeFocus::Flow,
            detail_focus: DetailFocus::Setup,
            error_message: None,
            status_message: None,
            test_list_state: ListState::default(),
            flow_list_state: first_selected(),
            setup_list_state: first_selected(),
            info_scroll: 0,
            code_scroll: 0,
        }
    }
}

impl UiState {
    pub fn clear_messages(&mut self) {
        self.error_message = None;
        self.status_message = None;
    }

    /// Fresh cursors for a newly opened detail or guided view.
    pub fn reset_detail(&mut self) {
        self.detail_focus = DetailFocus::Setup;
        self.setup_list_state.select(Some(0));
        self.info_scroll = 0;
        self.code_scroll = 0;
    }
}

fn first_selected() -> ListState {
    let mut list = ListState::default();
    list.select(Some(0));
    list
}

/// Moves a list cursor by `delta`, clamped to `len`.
pub fn step_selection(list: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        list.select(None);
        return;
    }
    let current = list.selected().unwrap_or(0).min(len - 1) as isize;
    let next = (current + delta).clamp(0, len as isize - 1);
    list.select(Some(next as usize));
}

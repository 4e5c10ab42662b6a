// src/state/mod.rs
use std::path::PathBuf;
use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::{debug, error, info, warn};
use tui_input::Input;
use uuid::Uuid;

use crate::catalog::{resolver_for, Catalog, TestResolver};
use crate::config::{Settings, TestDefinition};
use crate::error::GuideError;
use crate::file::{CatalogResult, DataTemplate, FileManager, ScriptFile};
use crate::flow::{self, BranchOutcome, DecisionNavigator, Transition};
use crate::render::{self, ImportFormat, RenderSource, RenderedStep};

pub mod analysis_state;
pub mod input_state;
pub mod ui_state;

use analysis_state::AnalysisState;
use input_state::{EditField, InputMode, InputState};
use ui_state::UiState;

/// Characters of the description shown in the flow result panel.
pub const RESULT_EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogStatus {
    Loading,
    Ready(usize),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Home,
    /// Catalog index of the open test.
    Detail(usize),
    /// Key of the running guided workflow.
    Guided(String),
    /// Title that did not resolve.
    NotFound(String),
}

/// Right-hand panel of the home view.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowPanel {
    Question,
    Result { requested: String, found: Option<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableRole {
    Dependent,
    Independent,
}

/// One editable line of the data setup panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetupRow {
    FrameName,
    Column(usize),
    PivotToggle,
    PivotColumn(usize),
    NamesTo,
    ValuesTo,
    Variable(VariableRole),
    ImportFormat,
}

// Core application state
#[derive(Debug)]
pub struct AppState {
    pub session_id: Uuid,
    pub catalog: Catalog,
    pub catalog_status: CatalogStatus,
    resolver: Box<dyn TestResolver>,

    pub navigator: DecisionNavigator,
    pub flow_panel: FlowPanel,
    pub view: View,
    // Title of the open test, used to find it again after a reload.
    detail_title: Option<String>,

    pub analysis: AnalysisState,
    pub pivot_preview: Vec<Vec<String>>,
    pub import_format: ImportFormat,

    pub file_manager: FileManager,
    pub ui: UiState,
    pub input: InputState,

    pub should_quit: bool,
    reload_requested: bool,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let session_id = Uuid::new_v4();
        info!(session = %session_id, "session started");

        Self {
            session_id,
            catalog: Catalog::empty(),
            catalog_status: CatalogStatus::Loading,
            resolver: resolver_for(settings.match_policy),
            navigator: DecisionNavigator::new(),
            flow_panel: FlowPanel::Question,
            view: View::Home,
            detail_title: None,
            analysis: AnalysisState::new(&settings.default_frame_name, settings.selection_policy),
            pivot_preview: Vec::new(),
            import_format: ImportFormat::default(),
            file_manager: FileManager::new(settings.catalog_path.clone(), settings.export_dir.clone()),
            ui: UiState::default(),
            input: InputState::default(),
            should_quit: false,
            reload_requested: true,
        }
    }

    // --- catalog ---

    /// Installs the outcome of a catalog load. A failure leaves an empty
    /// catalog so every lookup misses.
    pub fn replace_catalog(&mut self, result: CatalogResult) {
        match result {
            Ok(tests) => {
                info!(session = %self.session_id, count = tests.len(), "catalog installed");
                self.catalog_status = CatalogStatus::Ready(tests.len());
                self.ui.status_message = Some(format!("Catalog loaded: {} tests", tests.len()));
                self.catalog.replace_tests(tests);
            }
            Err(e) => {
                error!(session = %self.session_id, "catalog unavailable: {:#}", e);
                self.catalog_status = CatalogStatus::Failed(format!("{:#}", e));
                self.ui.error_message = Some(format!("Catalog unavailable: {}. Press R to retry.", e));
                self.catalog.replace_tests(Vec::new());
            }
        }
        self.ui.test_list_state.select(if self.catalog.tests().is_empty() { None } else { Some(0) });
        self.refresh_after_reload();
    }

    // Indices held by the view and the result panel refer to the old list.
    fn refresh_after_reload(&mut self) {
        if let FlowPanel::Result { requested, .. } = &self.flow_panel {
            let requested = requested.clone();
            let found = self.resolver.resolve(self.catalog.tests(), &requested);
            self.flow_panel = FlowPanel::Result { requested, found };
        }
        if let View::Detail(_) = self.view {
            if let Some(title) = self.detail_title.take() {
                match self.resolver.resolve(self.catalog.tests(), &title) {
                    Some(idx) => {
                        self.view = View::Detail(idx);
                        self.detail_title = Some(title);
                    }
                    None => self.view = View::NotFound(title),
                }
            }
        }
    }

    pub fn request_reload(&mut self) {
        self.catalog_status = CatalogStatus::Loading;
        self.reload_requested = true;
    }

    /// True once per reload request.
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    // --- test selection ---

    /// Resolves `title` and opens its detail view with fresh selections. A
    /// miss shows the not-found view.
    pub fn select_test(&mut self, title: &str) -> Result<usize, GuideError> {
        match self.resolver.resolve(self.catalog.tests(), title) {
            Some(idx) => {
                self.open_test(idx, false);
                Ok(idx)
            }
            None => {
                warn!(session = %self.session_id, title, "test not found");
                self.show_not_found(title);
                Err(GuideError::TestNotFound(title.to_string()))
            }
        }
    }

    fn open_test(&mut self, idx: usize, carry_selections: bool) {
        let Some(test) = self.catalog.test(idx) else {
            return;
        };
        let shape = test.data_shape.clone().unwrap_or_default();
        let pivot = test.pivot_config;
        let title = test.title.clone();

        self.analysis.seed(&shape, pivot, carry_selections);
        self.pivot_preview.clear();
        self.view = View::Detail(idx);
        self.detail_title = Some(title.clone());
        self.input.p_value = Input::default();
        self.ui.reset_detail();
        info!(session = %self.session_id, title = %title, carry_selections, "test opened");
    }

    fn show_not_found(&mut self, title: &str) {
        self.view = View::NotFound(title.to_string());
        self.detail_title = None;
    }

    pub fn current_test(&self) -> Option<&TestDefinition> {
        match self.view {
            View::Detail(idx) => self.catalog.test(idx),
            _ => None,
        }
    }

    // --- decision flow ---

    pub fn choose_flow_option(&mut self, index: usize) {
        if self.flow_panel != FlowPanel::Question {
            return;
        }
        let Some(transition) = self.navigator.advance(self.catalog.tree(), index) else {
            return;
        };

        match transition {
            Transition::GoTo(node) => {
                debug!(session = %self.session_id, node = %node, "flow moved");
                self.ui.flow_list_state.select(Some(0));
            }
            Transition::EnterWorkflow(key) => {
                // Unknown keys are logged by enter_workflow and leave the flow as is.
                let _ = self.enter_workflow(&key);
            }
            Transition::ShowResult(title) => {
                let found = self.resolver.resolve(self.catalog.tests(), &title);
                info!(session = %self.session_id, title = %title, found = found.is_some(), "flow result");
                self.flow_panel = FlowPanel::Result { requested: title, found };
            }
        }
    }

    pub fn restart_flow(&mut self) {
        self.navigator.reset();
        self.flow_panel = FlowPanel::Question;
        self.ui.flow_list_state.select(Some(0));
    }

    /// Opens the test named by the result panel, if it exists.
    pub fn open_flow_result(&mut self) {
        if let FlowPanel::Result { found: Some(idx), .. } = self.flow_panel {
            self.open_test(idx, false);
        }
    }

    /// First characters of the resolved test's description, for the result
    /// panel.
    pub fn result_excerpt(&self) -> Option<String> {
        match &self.flow_panel {
            FlowPanel::Result { found: Some(idx), .. } => self.catalog.test(*idx)
                .map(|test| excerpt(&test.description, RESULT_EXCERPT_CHARS)),
            _ => None,
        }
    }

    pub fn go_home(&mut self) {
        info!(session = %self.session_id, "back to home");
        self.view = View::Home;
        self.detail_title = None;
        self.analysis.reset();
        self.pivot_preview.clear();
        self.input.mode = InputMode::Normal;
        self.restart_flow();
    }

    // --- guided workflows ---

    pub fn enter_workflow(&mut self, key: &str) -> Result<(), GuideError> {
        if self.catalog.workflow(key).is_none() {
            warn!(session = %self.session_id, workflow = key, "unknown workflow");
            return Err(GuideError::UnknownWorkflow(key.to_string()));
        }

        self.analysis.seed(&flow::generic_shape(), flow::GENERIC_PIVOT, false);
        self.pivot_preview.clear();
        self.view = View::Guided(key.to_string());
        self.detail_title = None;
        self.ui.reset_detail();
        info!(session = %self.session_id, workflow = key, "guided workflow started");
        Ok(())
    }

    /// Answers the workflow's final question with branch `index`.
    pub fn choose_branch(&mut self, index: usize) {
        let View::Guided(key) = &self.view else {
            return;
        };
        let Some(workflow) = self.catalog.workflow(key) else {
            return;
        };

        match flow::choose_branch(workflow, index, self.catalog.tests(), self.resolver.as_ref()) {
            Some(BranchOutcome::Test(idx)) => self.open_test(idx, true),
            Some(BranchOutcome::InConstruction(title)) => self.show_not_found(&title),
            None => {}
        }
    }

    // --- rendering ---

    pub fn render_source(&self) -> Option<RenderSource<'_>> {
        match &self.view {
            View::Detail(idx) => self.catalog.test(*idx).map(RenderSource::TestSteps),
            View::Guided(key) => self.catalog.workflow(key).map(RenderSource::WorkflowSteps),
            _ => None,
        }
    }

    pub fn rendered_code(&self) -> Vec<RenderedStep> {
        self.render_source()
            .map(|source| render::render(source, &self.analysis))
            .unwrap_or_default()
    }

    pub fn import_snippet(&self) -> String {
        self.import_format.snippet(&self.analysis.frame_name)
    }

    pub fn variable_labels(&self) -> (&'static str, &'static str) {
        let contingency = self.current_test()
            .map(|test| crate::catalog::normalize(&test.title).contains("qui-quadrado"))
            .unwrap_or(false);
        if contingency {
            ("Variable 1 (rows)", "Variable 2 (columns)")
        } else {
            ("Response (numeric / Y)", "Group / independent (X)")
        }
    }

    // --- data setup ---

    pub fn setup_rows(&self) -> Vec<SetupRow> {
        let mut rows = vec![SetupRow::FrameName];
        if self.analysis.pivot_mode {
            rows.extend((0..self.analysis.pivot_columns.len()).map(SetupRow::PivotColumn));
            rows.push(SetupRow::NamesTo);
            rows.push(SetupRow::ValuesTo);
        } else {
            rows.extend((0..self.analysis.columns.len()).map(SetupRow::Column));
        }
        if self.analysis.pivot_allowed {
            rows.push(SetupRow::PivotToggle);
        }
        rows.push(SetupRow::Variable(VariableRole::Dependent));
        rows.push(SetupRow::Variable(VariableRole::Independent));
        rows.push(SetupRow::ImportFormat);
        rows
    }

    pub fn selected_setup_row(&self) -> Option<SetupRow> {
        let rows = self.setup_rows();
        self.ui.setup_list_state.selected()
            .and_then(|idx| rows.get(idx.min(rows.len().saturating_sub(1))).copied())
    }

    /// Opens the text box for a setup field, prefilled with its value.
    pub fn begin_edit(&mut self, field: EditField) {
        let current = match field {
            EditField::FrameName => self.analysis.frame_name.clone(),
            EditField::ColumnHeader(i) => self.analysis.columns.get(i).cloned().unwrap_or_default(),
            EditField::PivotColumn(i) => self.analysis.pivot_columns.get(i).cloned().unwrap_or_default(),
            EditField::NamesTo => self.analysis.names_to.clone(),
            EditField::ValuesTo => self.analysis.values_to.clone(),
            EditField::Filter | EditField::PValue => {
                self.input.mode = InputMode::Editing(field);
                return;
            }
        };
        self.input.buffer = Input::new(current);
        self.input.mode = InputMode::Editing(field);
    }

    /// Pushes the text box content into the state. Called on every keystroke.
    pub fn apply_edit(&mut self, field: EditField, value: &str) -> Result<(), GuideError> {
        match field {
            EditField::FrameName => self.analysis.set_frame_name(value),
            EditField::ColumnHeader(i) => self.analysis.rename_column(i, value)?,
            EditField::PivotColumn(i) => self.analysis.rename_pivot_column(i, value)?,
            EditField::NamesTo => self.analysis.set_names_to(value),
            EditField::ValuesTo => self.analysis.set_values_to(value),
            EditField::Filter => {
                let visible = self.visible_tests().len();
                self.ui.test_list_state.select(if visible == 0 { None } else { Some(0) });
            }
            EditField::PValue => {}
        }
        Ok(())
    }

    pub fn finish_edit(&mut self) {
        self.input.mode = InputMode::Normal;
    }

    /// Picks the next (or previous) variable for `role`, wrapping around.
    pub fn cycle_variable(&mut self, role: VariableRole, forward: bool) {
        let choices = self.analysis.variable_choices();
        if choices.is_empty() {
            return;
        }
        let current = match role {
            VariableRole::Dependent => &self.analysis.selected_dependent,
            VariableRole::Independent => &self.analysis.selected_independent,
        };
        let next = match choices.iter().position(|choice| choice == current) {
            Some(pos) if forward => (pos + 1) % choices.len(),
            Some(pos) => (pos + choices.len() - 1) % choices.len(),
            None if forward => 0,
            None => choices.len() - 1,
        };
        let result = match role {
            VariableRole::Dependent => self.analysis.select_dependent(&choices[next]),
            VariableRole::Independent => self.analysis.select_independent(&choices[next]),
        };
        self.report(result);
    }

    pub fn toggle_pivot(&mut self) {
        let result = self.analysis.set_pivot_mode(!self.analysis.pivot_mode);
        if result.is_ok() {
            self.refresh_pivot_preview();
        }
        self.report(result);
    }

    pub fn add_pivot_column(&mut self) {
        if !self.analysis.pivot_mode {
            return;
        }
        let name = self.analysis.add_pivot_column();
        debug!(session = %self.session_id, column = %name, "pivot column added");
        self.refresh_pivot_preview();
    }

    pub fn remove_pivot_column(&mut self) {
        if !self.analysis.pivot_mode {
            return;
        }
        let result = self.analysis.remove_pivot_column().map(|_| ());
        if result.is_ok() {
            self.refresh_pivot_preview();
        }
        self.report(result);
    }

    pub fn cycle_import_format(&mut self) {
        self.import_format = self.import_format.next();
    }

    fn refresh_pivot_preview(&mut self) {
        self.pivot_preview = self.analysis.pivot_preview_rows(&mut rand::thread_rng());
    }

    /// Rows shown in the data preview table.
    pub fn preview_rows(&self) -> &[Vec<String>] {
        if self.analysis.pivot_mode {
            &self.pivot_preview
        } else {
            &self.analysis.example_rows
        }
    }

    /// Guard rejections become a warning on screen instead of an error.
    fn report(&mut self, result: Result<(), GuideError>) {
        if let Err(e) = result {
            warn!(session = %self.session_id, "{}", e);
            self.ui.error_message = Some(e.to_string());
        }
    }

    // --- sidebar ---

    /// Catalog indices matching the sidebar filter.
    pub fn visible_tests(&self) -> Vec<usize> {
        self.catalog.filter_titles(self.input.filter.value())
    }

    pub fn selected_sidebar_title(&self) -> Option<String> {
        let visible = self.visible_tests();
        let idx = *visible.get(self.ui.test_list_state.selected()?)?;
        self.catalog.test(idx).map(|test| test.title.clone())
    }

    // --- export ---

    fn export_title(&self) -> Result<String> {
        self.render_source()
            .map(|source| source.title().to_string())
            .ok_or_else(|| anyhow!("Open a test or a guided workflow first"))
    }

    pub fn export_script(&mut self) -> Result<PathBuf> {
        let script = ScriptFile {
            title: self.export_title()?,
            frame: self.analysis.frame_name.clone(),
            session_id: self.session_id,
            generated_at: Local::now(),
            steps: self.rendered_code(),
        };
        let path = self.file_manager.export_script(&script)?;
        self.ui.status_message = Some(format!("Script written to {}", path.display()));
        Ok(path)
    }

    pub fn export_data_template(&mut self) -> Result<PathBuf> {
        let title = self.export_title()?;
        let template = DataTemplate::from_state(&self.analysis, &self.pivot_preview);
        let path = self.file_manager.export_data_template(&self.analysis.frame_name, &title, &template)?;
        self.ui.status_message = Some(format!("Data template written to {}", path.display()));
        Ok(path)
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

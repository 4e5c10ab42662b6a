// src/state/analysis_state.rs
use rand::Rng;
use tracing::debug;

use crate::config::{DataShape, PivotConfig, SelectionPolicy};
use crate::error::GuideError;
use crate::render::template::LONG_SUFFIX;

pub const MIN_PIVOT_COLUMNS: usize = 2;
pub const DEFAULT_NAMES_TO: &str = "Grupo";
pub const DEFAULT_VALUES_TO: &str = "Valor";
const PIVOT_COLUMN_PREFIX: &str = "Grupo_";
const PREVIEW_ROWS: usize = 2;

/// Everything the user has typed or picked for the test on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisState {
    pub frame_name: String,
    pub columns: Vec<String>,
    pub example_rows: Vec<Vec<String>>,
    pub selected_dependent: String,
    pub selected_independent: String,
    pub pivot_mode: bool,
    pub pivot_columns: Vec<String>,
    pub names_to: String,
    pub values_to: String,
    pub pivot_allowed: bool,
    pub selection_policy: SelectionPolicy,
    default_frame_name: String,
}

impl AnalysisState {
    pub fn new(default_frame_name: &str, selection_policy: SelectionPolicy) -> Self {
        let default_frame_name = if default_frame_name.trim().is_empty() {
            crate::render::template::DEFAULT_FRAME_NAME.to_string()
        } else {
            default_frame_name.trim().to_string()
        };

        Self {
            frame_name: default_frame_name.clone(),
            columns: Vec::new(),
            example_rows: Vec::new(),
            selected_dependent: String::new(),
            selected_independent: String::new(),
            pivot_mode: false,
            pivot_columns: Vec::new(),
            names_to: DEFAULT_NAMES_TO.to_string(),
            values_to: DEFAULT_VALUES_TO.to_string(),
            pivot_allowed: false,
            selection_policy,
            default_frame_name,
        }
    }

    /// Loads the columns and pivot defaults of a data shape. Pivot mode is
    /// switched off. With `carry_selections` the current variable picks are
    /// kept as they are, otherwise they are cleared.
    pub fn seed(&mut self, shape: &DataShape, pivot: PivotConfig, carry_selections: bool) {
        self.columns = shape.columns.clone();
        self.example_rows = shape.example_rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        self.pivot_mode = false;
        self.pivot_allowed = pivot.allowed;
        self.names_to = DEFAULT_NAMES_TO.to_string();
        self.values_to = DEFAULT_VALUES_TO.to_string();
        self.pivot_columns = (0..pivot.default_column_count).map(pivot_column_name).collect();

        if !carry_selections {
            self.selected_dependent.clear();
            self.selected_independent.clear();
        }

        debug!(columns = ?self.columns, pivot_allowed = self.pivot_allowed, carry_selections, "analysis state seeded");
    }

    /// Back to a blank session. The frame name survives.
    pub fn reset(&mut self) {
        let frame_name = std::mem::take(&mut self.frame_name);
        *self = Self::new(&self.default_frame_name, self.selection_policy);
        self.frame_name = frame_name;
    }

    pub fn default_frame_name(&self) -> &str {
        &self.default_frame_name
    }

    /// Blank names fall back to the configured default.
    pub fn set_frame_name(&mut self, name: &str) {
        let name = name.trim();
        self.frame_name = if name.is_empty() {
            self.default_frame_name.clone()
        } else {
            name.to_string()
        };
    }

    /// Frame the analysis steps read from: the long frame in pivot mode.
    pub fn active_frame(&self) -> String {
        if self.pivot_mode {
            self.long_frame()
        } else {
            self.frame_name.clone()
        }
    }

    pub fn long_frame(&self) -> String {
        format!("{}{}", self.frame_name, LONG_SUFFIX)
    }

    pub fn rename_column(&mut self, index: usize, name: &str) -> Result<(), GuideError> {
        let len = self.columns.len();
        let column = self.columns.get_mut(index)
            .ok_or(GuideError::ColumnOutOfRange { index, len })?;
        *column = name.to_string();
        self.reconcile_selections();
        Ok(())
    }

    /// Columns offered as dependent/independent variables.
    pub fn variable_choices(&self) -> Vec<String> {
        if self.pivot_mode {
            return vec![self.effective_names_to().to_string(), self.effective_values_to().to_string()];
        }

        self.columns.iter()
            .filter(|column| !column.eq_ignore_ascii_case("id"))
            .cloned()
            .collect()
    }

    pub fn select_dependent(&mut self, name: &str) -> Result<(), GuideError> {
        self.ensure_choice(name)?;
        self.selected_dependent = name.to_string();
        Ok(())
    }

    pub fn select_independent(&mut self, name: &str) -> Result<(), GuideError> {
        self.ensure_choice(name)?;
        self.selected_independent = name.to_string();
        Ok(())
    }

    fn ensure_choice(&self, name: &str) -> Result<(), GuideError> {
        if self.variable_choices().iter().any(|choice| choice == name) {
            Ok(())
        } else {
            Err(GuideError::UnknownVariable(name.to_string()))
        }
    }

    pub fn set_pivot_mode(&mut self, enabled: bool) -> Result<(), GuideError> {
        if enabled && !self.pivot_allowed {
            return Err(GuideError::PivotNotAllowed);
        }

        self.pivot_mode = enabled;
        if enabled {
            while self.pivot_columns.len() < MIN_PIVOT_COLUMNS {
                self.add_pivot_column();
            }
        }
        self.reconcile_selections();
        Ok(())
    }

    /// Appends the next free `Grupo_<letters>` name and returns it.
    pub fn add_pivot_column(&mut self) -> String {
        let mut index = self.pivot_columns.len();
        let mut name = pivot_column_name(index);
        while self.pivot_columns.contains(&name) {
            index += 1;
            name = pivot_column_name(index);
        }
        self.pivot_columns.push(name.clone());
        name
    }

    /// Drops the last pivot column; refuses to go below the minimum.
    pub fn remove_pivot_column(&mut self) -> Result<String, GuideError> {
        if self.pivot_columns.len() <= MIN_PIVOT_COLUMNS {
            return Err(GuideError::PivotMinimum { min: MIN_PIVOT_COLUMNS });
        }
        self.pivot_columns.pop()
            .ok_or(GuideError::PivotMinimum { min: MIN_PIVOT_COLUMNS })
    }

    pub fn rename_pivot_column(&mut self, index: usize, name: &str) -> Result<(), GuideError> {
        let len = self.pivot_columns.len();
        let column = self.pivot_columns.get_mut(index)
            .ok_or(GuideError::ColumnOutOfRange { index, len })?;
        *column = name.to_string();
        Ok(())
    }

    pub fn set_names_to(&mut self, name: &str) {
        self.names_to = name.to_string();
        self.reconcile_selections();
    }

    pub fn set_values_to(&mut self, name: &str) {
        self.values_to = name.to_string();
        self.reconcile_selections();
    }

    pub fn effective_names_to(&self) -> &str {
        non_blank_or(&self.names_to, DEFAULT_NAMES_TO)
    }

    pub fn effective_values_to(&self) -> &str {
        non_blank_or(&self.values_to, DEFAULT_VALUES_TO)
    }

    /// Under `ClearStale`, drops picks that are no longer offered.
    fn reconcile_selections(&mut self) {
        if self.selection_policy != SelectionPolicy::ClearStale {
            return;
        }

        let choices = self.variable_choices();
        for selection in [&mut self.selected_dependent, &mut self.selected_independent] {
            if !selection.is_empty() && !choices.contains(selection) {
                debug!(selection = %selection, "clearing stale selection");
                selection.clear();
            }
        }
    }

    /// Header of the data preview: the wide pivot layout in pivot mode.
    pub fn preview_columns(&self) -> Vec<String> {
        if self.pivot_mode {
            std::iter::once("ID".to_string())
                .chain(self.pivot_columns.iter().cloned())
                .collect()
        } else {
            self.columns.clone()
        }
    }

    /// Illustrative wide rows for pivot mode: an ID and one value in
    /// [10, 20) per pivot column.
    pub fn pivot_preview_rows<R: Rng>(&self, rng: &mut R) -> Vec<Vec<String>> {
        (1..=PREVIEW_ROWS)
            .map(|id| {
                std::iter::once(id.to_string())
                    .chain(self.pivot_columns.iter().map(|_| format!("{:.1}", rng.gen_range(10.0..20.0))))
                    .collect()
            })
            .collect()
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// `Grupo_A`..`Grupo_Z`, then `Grupo_AA`, `Grupo_AB`, ...
pub fn pivot_column_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.reverse();
    format!("{}{}", PIVOT_COLUMN_PREFIX, letters.into_iter().collect::<String>())
}

// src/render/pivot.rs
use crate::state::analysis_state::AnalysisState;
use super::template::RenderedStep;

pub const PIVOT_STEP_TITLE: &str = "0. Data preparation";

/// The wide-to-long block that opens the script in pivot mode. Its text is
/// final: it never goes through placeholder substitution.
pub fn pivot_step(state: &AnalysisState) -> Option<RenderedStep> {
    if !state.pivot_mode {
        return None;
    }

    Some(RenderedStep {
        title: PIVOT_STEP_TITLE.to_string(),
        code: pivot_code(state),
    })
}

pub fn pivot_code(state: &AnalysisState) -> String {
    let cols = state.pivot_columns.iter()
        .map(|column| r_string(column))
        .collect::<Vec<_>>()
        .join(", ");
    let long_frame = state.long_frame();

    format!(
        "library(tidyr)\n\n# Wide to long\n{long} <- {frame} %>%\n  pivot_longer(\n    cols = c({cols}),\n    names_to = {names_to},\n    values_to = {values_to}\n  )\n\n# Use '{long}' in the steps below",
        long = long_frame,
        frame = state.frame_name,
        cols = cols,
        names_to = r_string(state.effective_names_to()),
        values_to = r_string(state.effective_values_to()),
    )
}

/// Double-quoted R string literal.
pub fn r_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataShape, PivotConfig, SelectionPolicy};
    use pretty_assertions::assert_eq;

    fn pivot_state() -> AnalysisState {
        let mut state = AnalysisState::new("meus_dados", SelectionPolicy::Preserve);
        state.seed(
            &DataShape::new(&["ID", "Grupo", "Valor"], Vec::new()),
            PivotConfig { allowed: true, default_column_count: 2 },
            false,
        );
        state.set_pivot_mode(true).unwrap();
        state
    }

    #[test]
    fn no_block_outside_pivot_mode() {
        let mut state = pivot_state();
        state.set_pivot_mode(false).unwrap();
        assert!(pivot_step(&state).is_none());
    }

    #[test]
    fn block_declares_long_frame() {
        let state = pivot_state();
        let step = pivot_step(&state).unwrap();
        assert_eq!(step.title, PIVOT_STEP_TITLE);
        assert_eq!(
            step.code,
            "library(tidyr)\n\n# Wide to long\nmeus_dados_long <- meus_dados %>%\n  pivot_longer(\n    cols = c(\"Grupo_A\", \"Grupo_B\"),\n    names_to = \"Grupo\",\n    values_to = \"Valor\"\n  )\n\n# Use 'meus_dados_long' in the steps below"
        );
    }

    #[test]
    fn block_follows_frame_rename_and_escapes_quotes() {
        let mut state = pivot_state();
        state.set_frame_name("coleta");
        state.rename_pivot_column(1, "Dose \"alta\"").unwrap();
        state.set_names_to("Dose");
        let code = pivot_code(&state);
        assert!(code.contains("coleta_long <- coleta %>%"));
        assert!(code.contains(r#"cols = c("Grupo_A", "Dose \"alta\"")"#));
        assert!(code.contains(r#"names_to = "Dose""#));
    }

    #[test]
    fn placeholders_in_column_names_are_left_alone() {
        let mut state = pivot_state();
        state.rename_pivot_column(0, "{{df}}").unwrap();
        assert!(pivot_code(&state).contains(r#""{{df}}""#));
    }
}

// src/render/template.rs
use crate::config::{CodeStep, GuidedWorkflow, TestDefinition};
use crate::state::analysis_state::AnalysisState;
use super::pivot;

pub const DEFAULT_FRAME_NAME: &str = "meus_dados";
/// Older templates hard-code this frame name instead of `{{df}}`.
pub const RESERVED_FRAME_LITERAL: &str = "dados";
pub const LONG_SUFFIX: &str = "_long";
pub const SELECT_Y_MARKER: &str = "[SELECIONE_VAR_Y]";
pub const SELECT_X_MARKER: &str = "[SELECIONE_VAR_X]";

/// Which step list the renderer is bound to.
#[derive(Debug, Clone, Copy)]
pub enum RenderSource<'a> {
    TestSteps(&'a TestDefinition),
    WorkflowSteps(&'a GuidedWorkflow),
}

impl<'a> RenderSource<'a> {
    pub fn steps(&self) -> &'a [CodeStep] {
        match self {
            RenderSource::TestSteps(test) => &test.code_steps,
            RenderSource::WorkflowSteps(workflow) => &workflow.steps,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            RenderSource::TestSteps(test) => &test.title,
            RenderSource::WorkflowSteps(workflow) => &workflow.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStep {
    pub title: String,
    pub code: String,
}

/// Values substituted into templates for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    pub frame: String,
    pub dependent: String,
    pub independent: String,
}

impl Bindings {
    pub fn from_state(state: &AnalysisState) -> Self {
        Self {
            frame: state.active_frame(),
            dependent: non_empty_or(&state.selected_dependent, SELECT_Y_MARKER),
            independent: non_empty_or(&state.selected_independent, SELECT_X_MARKER),
        }
    }

    fn lookup(&self, placeholder: &str) -> Option<&str> {
        match placeholder {
            "df" => Some(&self.frame),
            "y" | "var1" => Some(&self.dependent),
            "x" | "grupo" | "var2" => Some(&self.independent),
            _ => None,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Renders every step of `source`, preceded by the pivot transform when the
/// state is in pivot mode. Pure: same inputs, same output.
pub fn render(source: RenderSource<'_>, state: &AnalysisState) -> Vec<RenderedStep> {
    let bindings = Bindings::from_state(state);
    let mut rendered = Vec::with_capacity(source.steps().len() + 1);

    if let Some(step) = pivot::pivot_step(state) {
        rendered.push(step);
    }

    rendered.extend(source.steps().iter().map(|step| RenderedStep {
        title: step.title.clone(),
        code: substitute(&step.code_template, &bindings),
    }));

    rendered
}

/// Replaces known `{{name}}` placeholders and the whole-word reserved frame
/// literal in one left-to-right pass. Substituted text is never re-scanned;
/// unknown placeholders are kept verbatim.
pub fn substitute(template: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if let Some((value, consumed)) = placeholder_at(rest, bindings) {
            out.push_str(value);
            rest = &rest[consumed..];
            continue;
        }

        if rest.starts_with(RESERVED_FRAME_LITERAL) {
            let after = &rest[RESERVED_FRAME_LITERAL.len()..];
            let prev_is_word = out.chars().next_back().map_or(false, is_word_char);
            let next_is_word = next_rendered_char(after, bindings).map_or(false, is_word_char);
            if !prev_is_word && !next_is_word {
                out.push_str(&bindings.frame);
                rest = after;
                continue;
            }
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// `Some((value, bytes consumed))` when `text` starts with a known placeholder.
fn placeholder_at<'b>(text: &str, bindings: &'b Bindings) -> Option<(&'b str, usize)> {
    let inner = text.strip_prefix("{{")?;
    let end = inner.find("}}")?;
    let value = bindings.lookup(&inner[..end])?;
    Some((value, end + 4))
}

/// First character the reader will see after this point once rendered.
fn next_rendered_char(text: &str, bindings: &Bindings) -> Option<char> {
    match placeholder_at(text, bindings) {
        Some((value, consumed)) if value.is_empty() => next_rendered_char(&text[consumed..], bindings),
        Some((value, _)) => value.chars().next(),
        None => text.chars().next(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataShape, PivotConfig};
    use crate::config::SelectionPolicy;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn bindings(frame: &str, y: &str, x: &str) -> Bindings {
        Bindings {
            frame: frame.to_string(),
            dependent: y.to_string(),
            independent: x.to_string(),
        }
    }

    fn test_with_steps(steps: &[(&str, &str)]) -> TestDefinition {
        let steps: Vec<serde_json::Value> = steps.iter()
            .map(|(title, code)| serde_json::json!({ "titulo": title, "codigo": code }))
            .collect();
        serde_json::from_value(serde_json::json!({
            "titulo": "Teste de Mann-Whitney U",
            "formato_dados": { "colunas": ["ID", "Grupo", "Peso"] },
            "pivot_config": { "allowed": true, "default_cols": 2 },
            "etapas_r": steps,
        })).unwrap()
    }

    fn seeded_state(test: &TestDefinition) -> AnalysisState {
        let mut state = AnalysisState::new(DEFAULT_FRAME_NAME, SelectionPolicy::Preserve);
        let shape = test.data_shape.clone().unwrap_or_default();
        state.seed(&shape, test.pivot_config, false);
        state
    }

    #[test]
    fn substitutes_every_placeholder() {
        let template = "m <- lm({{y}} ~ {{x}}, data = {{df}})\ncor({{df}}${{var1}}, {{df}}${{var2}})\nboxplot({{y}} ~ {{grupo}}, data = dados)";
        let rendered = substitute(template, &bindings("meus_dados", "Peso", "Grupo"));
        assert_eq!(
            rendered,
            "m <- lm(Peso ~ Grupo, data = meus_dados)\ncor(meus_dados$Peso, meus_dados$Grupo)\nboxplot(Peso ~ Grupo, data = meus_dados)"
        );
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn reserved_literal_only_as_whole_word() {
        let template = "dados_brutos <- dados\nmeus_dados2 <- rbind(dados, dados)\n# dados.";
        let rendered = substitute(template, &bindings("coleta", "y", "x"));
        assert_eq!(rendered, "dados_brutos <- coleta\nmeus_dados2 <- rbind(coleta, coleta)\n# coleta.");
    }

    #[test]
    fn reserved_literal_boundary_sees_substituted_text() {
        let rendered = substitute("{{y}}dados dados{{x}} (dados)", &bindings("f", "Peso", "Grupo"));
        assert_eq!(rendered, "Pesodados dadosGrupo (f)");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let rendered = substitute("{{y}} {{x}}", &bindings("df", "{{x}}", "dados"));
        assert_eq!(rendered, "{{x}} dados");
    }

    #[test]
    fn unknown_and_unterminated_placeholders_are_kept() {
        let rendered = substitute("{{foo}} {{y", &bindings("df", "Peso", "Grupo"));
        assert_eq!(rendered, "{{foo}} {{y");
    }

    #[test]
    fn empty_selections_render_markers() {
        let test = test_with_steps(&[("1. Teste", "wilcox.test({{y}} ~ {{x}}, data = {{df}})")]);
        let state = seeded_state(&test);
        let steps = render(RenderSource::TestSteps(&test), &state);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].code, "wilcox.test([SELECIONE_VAR_Y] ~ [SELECIONE_VAR_X], data = meus_dados)");
    }

    #[test]
    fn pivot_mode_switches_frame_but_not_variables() {
        let test = test_with_steps(&[("1. Teste", "wilcox.test({{y}} ~ {{x}}, data = {{df}})\nsummary({{df}})")]);
        let mut state = seeded_state(&test);
        state.select_dependent("Peso").unwrap();
        state.select_independent("Grupo").unwrap();

        let wide = render(RenderSource::TestSteps(&test), &state);
        state.set_pivot_mode(true).unwrap();
        let long = render(RenderSource::TestSteps(&test), &state);

        assert_eq!(wide.len(), 1);
        assert_eq!(long.len(), 2);
        assert_eq!(long[0].title, pivot::PIVOT_STEP_TITLE);
        assert_eq!(wide[0].code, "wilcox.test(Peso ~ Grupo, data = meus_dados)\nsummary(meus_dados)");
        assert_eq!(long[1].code, "wilcox.test(Peso ~ Grupo, data = meus_dados_long)\nsummary(meus_dados_long)");
    }

    #[test]
    fn workflow_source_uses_workflow_steps() {
        let workflows = crate::catalog::builtin::workflows();
        let workflow = &workflows["guide_correlacao"];
        let mut state = AnalysisState::new("coleta", SelectionPolicy::Preserve);
        state.seed(&DataShape::new(&["Altura", "Peso"], Vec::new()), PivotConfig::default(), false);
        state.select_dependent("Altura").unwrap();
        state.select_independent("Peso").unwrap();

        let steps = render(RenderSource::WorkflowSteps(workflow), &state);
        assert_eq!(steps[0].code, "shapiro.test(coleta$Altura)\nshapiro.test(coleta$Peso)");
        assert_eq!(steps[1].code, "plot(coleta$Altura, coleta$Peso, main='Scatterplot')");
    }

    proptest! {
        #[test]
        fn render_is_deterministic(
            frame in "[a-z][a-z_]{0,10}",
            y in "[A-Za-z]{0,8}",
            x in "[A-Za-z]{0,8}",
            pivot in any::<bool>(),
        ) {
            let test = test_with_steps(&[
                ("1", "t.test({{y}} ~ {{x}}, data = {{df}})"),
                ("2", "summary(dados); cor({{var1}}, {{var2}}); {{grupo}}"),
            ]);
            let mut state = seeded_state(&test);
            state.set_frame_name(&frame);
            state.selected_dependent = y;
            state.selected_independent = x;
            state.set_pivot_mode(pivot).unwrap();

            let first = render(RenderSource::TestSteps(&test), &state);
            let second = render(RenderSource::TestSteps(&test), &state);
            prop_assert_eq!(first, second);
        }
    }
}

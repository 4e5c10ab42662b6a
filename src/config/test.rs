// src/config/test.rs
use serde::{Serialize, Deserialize};
use std::fmt;

/// One statistical test as described by the catalog file.
///
/// Field names follow the catalog's JSON keys (`titulo`, `etapas_r`, ...);
/// English aliases are accepted so hand-written catalogs can use either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestDefinition {
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    #[serde(rename = "descricao", alias = "description", default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "hipoteses", alias = "hypotheses", default)]
    pub hypotheses: Hypotheses,
    #[serde(rename = "pressupostos", alias = "assumptions", default)]
    pub assumptions: Vec<Assumption>,
    #[serde(rename = "formato_dados", alias = "data_shape", default)]
    pub data_shape: Option<DataShape>,
    #[serde(alias = "pivot", default)]
    pub pivot_config: PivotConfig,
    #[serde(rename = "etapas_r", alias = "code_steps", default)]
    pub code_steps: Vec<CodeStep>,
    #[serde(rename = "saida_exemplo", alias = "example_output", default)]
    pub example_output: Option<ExampleOutput>,
    #[serde(default)]
    pub report: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Hypotheses {
    #[serde(rename = "nula", alias = "null", default)]
    pub null: String,
    #[serde(rename = "alternativa", alias = "alternative", default)]
    pub alternative: String,
}

/// Older catalog entries list assumptions as bare strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Assumption {
    Plain(String),
    Detailed(AssumptionDetail),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssumptionDetail {
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    #[serde(rename = "icone", alias = "icon", default)]
    pub icon: Option<String>,
    #[serde(rename = "descricao", alias = "description", default)]
    pub description: String,
    #[serde(rename = "violacao", alias = "violation_note", default)]
    pub violation_note: Option<String>,
}

impl Assumption {
    pub fn name(&self) -> &str {
        match self {
            Assumption::Plain(text) => text,
            Assumption::Detailed(detail) => &detail.name,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataShape {
    #[serde(rename = "colunas", alias = "columns", default)]
    pub columns: Vec<String>,
    #[serde(rename = "exemplo", alias = "example_rows", default)]
    pub example_rows: Vec<Vec<ExampleCell>>,
}

impl DataShape {
    pub fn new(columns: &[&str], example_rows: Vec<Vec<ExampleCell>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            example_rows,
        }
    }
}

/// A cell of an example row. Catalog authors mix quoted and bare numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ExampleCell {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl fmt::Display for ExampleCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleCell::Text(text) => write!(f, "{}", text),
            ExampleCell::Integer(value) => write!(f, "{}", value),
            ExampleCell::Float(value) => write!(f, "{}", value),
            ExampleCell::Flag(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ExampleCell {
    fn from(text: &str) -> Self {
        ExampleCell::Text(text.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PivotConfig {
    #[serde(default)]
    pub allowed: bool,
    #[serde(rename = "default_cols", alias = "default_column_count", default)]
    pub default_column_count: usize,
}

/// A titled code template. Used by tests and by guided workflows alike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeStep {
    #[serde(rename = "titulo", alias = "title")]
    pub title: String,
    #[serde(rename = "codigo", alias = "code_template")]
    pub code_template: String,
}

impl CodeStep {
    pub fn new(title: &str, code_template: &str) -> Self {
        Self {
            title: title.to_string(),
            code_template: code_template.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExampleOutput {
    #[serde(rename = "texto", alias = "raw_text")]
    pub raw_text: String,
    #[serde(rename = "destaques", alias = "highlights", default)]
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    #[serde(rename = "termo", alias = "term")]
    pub term: String,
    #[serde(rename = "significado", alias = "meaning")]
    pub meaning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_assumptions_and_numeric_cells() {
        let json = r#"{
            "titulo": "Teste Qualquer",
            "descricao": "desc",
            "tags": ["qualquer"],
            "hipoteses": { "nula": "igual", "alternativa": "diferente" },
            "pressupostos": [
                "Independência",
                { "nome": "Normalidade", "icone": "🔔", "descricao": "Dados normais", "violacao": "Use Mann-Whitney" }
            ],
            "formato_dados": { "colunas": ["ID", "Grupo", "Peso"], "exemplo": [["1", "A", 10.5], [2, "B", 11]] },
            "pivot_config": { "allowed": true, "default_cols": 3 },
            "etapas_r": [{ "titulo": "1. Teste", "codigo": "t.test({{y}} ~ {{x}}, data = {{df}})" }]
        }"#;

        let test: TestDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(test.title, "Teste Qualquer");
        assert_eq!(test.assumptions.len(), 2);
        assert_eq!(test.assumptions[0], Assumption::Plain("Independência".to_string()));
        assert_eq!(test.assumptions[1].name(), "Normalidade");

        let shape = test.data_shape.unwrap();
        assert_eq!(shape.columns, vec!["ID", "Grupo", "Peso"]);
        assert_eq!(shape.example_rows[0][2].to_string(), "10.5");
        assert_eq!(shape.example_rows[1][0].to_string(), "2");
        assert_eq!(test.pivot_config, PivotConfig { allowed: true, default_column_count: 3 });
        assert!(test.example_output.is_none());
        assert!(test.report.is_none());
    }

    #[test]
    fn accepts_english_keys_and_missing_sections() {
        let json = r#"{ "title": "Minimal", "code_steps": [{ "title": "a", "code_template": "b" }] }"#;
        let test: TestDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(test.title, "Minimal");
        assert_eq!(test.code_steps[0].code_template, "b");
        assert!(!test.pivot_config.allowed);
        assert!(test.tags.is_empty());
    }
}

// src/file/script.rs
use super::FileHandler;
use crate::render::RenderedStep;
use anyhow::{Result, Context, anyhow};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const STEP_MARKER: &str = "# ==== ";
const STEP_MARKER_END: &str = " ====";

/// A rendered analysis ready to be written as an `.R` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptFile {
    pub title: String,
    pub frame: String,
    pub session_id: Uuid,
    pub generated_at: DateTime<Local>,
    pub steps: Vec<RenderedStep>,
}

impl ScriptFile {
    pub fn to_r_source(&self) -> String {
        let mut out = format!(
            "# {}\n# frame: {}\n# generated: {}\n# session: {}\n",
            self.title,
            self.frame,
            self.generated_at.to_rfc3339(),
            self.session_id,
        );
        for step in &self.steps {
            out.push('\n');
            out.push_str(&format!("{}{}{}\n", STEP_MARKER, step.title, STEP_MARKER_END));
            out.push_str(&step.code);
            out.push('\n');
        }
        out
    }

    pub fn parse(source: &str) -> Result<Self> {
        let mut lines = source.lines();
        let mut header = |key: &str| -> Result<String> {
            let line = lines.next().ok_or_else(|| anyhow!("Script header is truncated"))?;
            let value = line.strip_prefix("# ")
                .ok_or_else(|| anyhow!("Malformed script header line: {}", line))?;
            if key.is_empty() {
                return Ok(value.to_string());
            }
            value.strip_prefix(key)
                .map(|v| v.to_string())
                .ok_or_else(|| anyhow!("Expected \"{}\" in script header, found: {}", key, line))
        };

        let title = header("")?;
        let frame = header("frame: ")?;
        let generated_at = DateTime::parse_from_rfc3339(&header("generated: ")?)
            .context("Invalid timestamp in script header")?
            .with_timezone(&Local);
        let session_id = Uuid::parse_str(&header("session: ")?)
            .context("Invalid session id in script header")?;

        let mut steps: Vec<RenderedStep> = Vec::new();
        let mut code_lines: Vec<&str> = Vec::new();
        for line in lines {
            let marker = line.strip_prefix(STEP_MARKER)
                .and_then(|rest| rest.strip_suffix(STEP_MARKER_END));
            match marker {
                Some(step_title) => {
                    flush_step(&mut steps, &mut code_lines);
                    steps.push(RenderedStep { title: step_title.to_string(), code: String::new() });
                }
                None if !steps.is_empty() => code_lines.push(line),
                None => {}
            }
        }
        flush_step(&mut steps, &mut code_lines);

        Ok(Self { title, frame, session_id, generated_at, steps })
    }
}

// Steps are separated by one blank line, which is not part of the code.
fn flush_step(steps: &mut [RenderedStep], code_lines: &mut Vec<&str>) {
    if let Some(last) = steps.last_mut() {
        while code_lines.last().map_or(false, |line| line.is_empty()) {
            code_lines.pop();
        }
        last.code = code_lines.join("\n");
    }
    code_lines.clear();
}

/// File name for a test's exported script, without extension. Both parts
/// are slugged so the name never leaves the export directory.
pub fn script_stem(frame: &str, title: &str) -> String {
    let frame = match slug(frame) {
        frame if frame.is_empty() => "dados".to_string(),
        frame => frame,
    };
    format!("{}_{}", frame, slug(title))
}

/// ASCII alphanumerics joined by single underscores; accents are folded
/// first.
fn slug(text: &str) -> String {
    crate::catalog::normalize(text)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[derive(Debug)]
pub struct ScriptFileHandler;

impl ScriptFileHandler {
    pub fn new() -> Self {
        Self
    }
}

impl FileHandler<ScriptFile> for ScriptFileHandler {
    fn load(&self, path: &Path) -> Result<ScriptFile> {
        let content = fs::read_to_string(path)?;
        ScriptFile::parse(&content)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }

    fn save(&self, data: &ScriptFile, path: &Path) -> Result<()> {
        fs::write(path, data.to_r_source())
            .with_context(|| format!("Failed to write script {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn script() -> ScriptFile {
        ScriptFile {
            title: "Teste de Mann-Whitney U".to_string(),
            frame: "meus_dados".to_string(),
            session_id: Uuid::new_v4(),
            generated_at: Local::now(),
            steps: vec![
                RenderedStep {
                    title: "1. Teste de Mann-Whitney".to_string(),
                    code: "wilcox.test(Peso ~ Grupo, data = meus_dados)".to_string(),
                },
                RenderedStep {
                    title: "2. Medianas por grupo".to_string(),
                    code: "tapply(meus_dados$Peso, meus_dados$Grupo, median)\n\n# done".to_string(),
                },
            ],
        }
    }

    #[test]
    fn header_carries_title_and_session() {
        let script = script();
        let source = script.to_r_source();
        assert!(source.starts_with("# Teste de Mann-Whitney U\n# frame: meus_dados\n"));
        assert!(source.contains(&format!("# session: {}", script.session_id)));
        assert!(source.contains("# ==== 1. Teste de Mann-Whitney ====\nwilcox.test"));
    }

    #[test]
    fn saved_script_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.R");
        let handler = ScriptFileHandler::new();
        let script = script();
        handler.save(&script, &path).unwrap();

        let loaded = handler.load(&path).unwrap();
        assert_eq!(loaded.steps, script.steps);
        assert_eq!(loaded.session_id, script.session_id);
        assert_eq!(loaded.generated_at.timestamp(), script.generated_at.timestamp());
    }

    #[test]
    fn stem_is_filesystem_friendly() {
        assert_eq!(
            script_stem("coleta", "Teste t de Student para Amostras Independentes (Não Pareado)"),
            "coleta_teste_t_de_student_para_amostras_independentes_nao_pareado"
        );
        assert_eq!(script_stem("df", "Correlação de Pearson"), "df_correlacao_de_pearson");
    }

    #[test]
    fn frame_cannot_introduce_path_separators() {
        let stem = script_stem("../escape", "Teste t");
        assert_eq!(stem, "escape_teste_t");
        assert!(!stem.contains('/') && !stem.contains('\\'));
        assert_eq!(script_stem("a/b\\c", "Teste t"), "a_b_c_teste_t");
        assert_eq!(script_stem("..", "Teste t"), "dados_teste_t");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(ScriptFile::parse("").is_err());
        assert!(ScriptFile::parse("# t\n# frame: f\n# generated: yesterday\n").is_err());
    }
}

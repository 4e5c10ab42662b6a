// src/render/import.rs

/// File formats the import guide knows how to read into R.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportFormat {
    #[default]
    Excel,
    Csv,
    Text,
}

impl ImportFormat {
    pub const ALL: [ImportFormat; 3] = [ImportFormat::Excel, ImportFormat::Csv, ImportFormat::Text];

    pub fn next(self) -> Self {
        match self {
            ImportFormat::Excel => ImportFormat::Csv,
            ImportFormat::Csv => ImportFormat::Text,
            ImportFormat::Text => ImportFormat::Excel,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImportFormat::Excel => "Excel (.xlsx)",
            ImportFormat::Csv => "CSV (.csv)",
            ImportFormat::Text => "Text (.txt)",
        }
    }

    pub fn hint(self) -> Option<&'static str> {
        match self {
            ImportFormat::Excel => None,
            ImportFormat::Csv => Some("Semicolon separated, comma as decimal mark"),
            ImportFormat::Text => Some("Tab or space separated"),
        }
    }

    /// R code that reads the user's file into `frame`.
    pub fn snippet(self, frame: &str) -> String {
        match self {
            ImportFormat::Excel => format!(
                "if(!require(readxl)) install.packages(\"readxl\")\nlibrary(readxl)\n\n# file.choose() opens a file picker\n{frame} <- read_excel(file.choose())\n\nhead({frame})",
                frame = frame
            ),
            ImportFormat::Csv => format!(
                "# read.csv2 expects sep = \";\" and dec = \",\"\n{frame} <- read.csv2(file.choose(), stringsAsFactors = TRUE)\n\n# On encoding errors (common on Windows):\n# {frame} <- read.csv2(file.choose(), fileEncoding = \"latin1\")",
                frame = frame
            ),
            ImportFormat::Text => format!(
                "# Tab separated:\n{frame} <- read.delim(file.choose(), dec = \",\")\n\n# Space separated:\n# {frame} <- read.table(file.choose(), header = TRUE, dec = \",\")",
                frame = frame
            ),
        }
    }
}

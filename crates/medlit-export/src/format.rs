use crate::error::{ExportError, Result};
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::str::FromStr;

pub const NBIB_CONTENT_TYPE: &str = "application/nbib";

/// File formats offered for search-result downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
    Bibtex,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Xlsx,
        ExportFormat::Json,
        ExportFormat::Bibtex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
            ExportFormat::Bibtex => "bibtex",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Json => "application/json",
            ExportFormat::Bibtex => "application/x-bibtex",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Bibtex => "bib",
            other => other.as_str(),
        }
    }

    /// `pubmed_results_YYYYmmdd_HHMMSS.<ext>`
    pub fn download_filename<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!("pubmed_results_{}.{}", at.format("%Y%m%d_%H%M%S"), self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            "bibtex" | "bib" => Ok(ExportFormat::Bibtex),
            _ => Err(ExportError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

/// How a single-article citation is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CitationFormat {
    #[default]
    Nbib,
    Bibtex,
}

impl CitationFormat {
    pub fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            None | Some("") | Some("nbib") | Some("medline") => Ok(CitationFormat::Nbib),
            Some("bibtex") | Some("bib") => Ok(CitationFormat::Bibtex),
            Some(other) => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            CitationFormat::Nbib => NBIB_CONTENT_TYPE,
            CitationFormat::Bibtex => ExportFormat::Bibtex.content_type(),
        }
    }

    /// `cite_{pmid}.nbib` or `cite_{pmid}.bib`
    pub fn filename(&self, pmid: &str) -> String {
        let ext = match self {
            CitationFormat::Nbib => "nbib",
            CitationFormat::Bibtex => "bib",
        };
        let safe: String = pmid.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        format!("cite_{}.{}", safe, ext)
    }
}

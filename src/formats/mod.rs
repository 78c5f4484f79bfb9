//! Capability registry and per-format text extractors.
//!
//! Every supported extension is listed in [`FormatRegistry::builtin`]. Formats
//! that depend on an optional parser are tagged available only when the
//! matching cargo feature was compiled in; the orchestrator consults the
//! registry before dispatching a file.

#[cfg(feature = "docx")]
pub mod docx;
#[cfg(any(feature = "docx", feature = "pptx"))]
pub mod ooxml;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod plain_text;
#[cfg(feature = "pptx")]
pub mod pptx;
#[cfg(any(feature = "xlsx", feature = "xls"))]
pub mod spreadsheet;

use serde::Serialize;
use std::path::Path;

/// Turns one file into a flat text blob for pattern scanning.
pub type ExtractFn = fn(&Path) -> anyhow::Result<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Docx,
    Doc,
    Xlsx,
    Xls,
    Pptx,
    Ppt,
    Pdf,
    Txt,
}

#[derive(Debug, Clone)]
pub struct SupportedFormat {
    pub extension: &'static str,
    pub label: &'static str,
    pub kind: FormatKind,
    /// Cargo feature backing this format, `None` when it needs no optional parser.
    pub capability: Option<&'static str>,
    pub available: bool,
    extract: ExtractFn,
}

impl SupportedFormat {
    fn new(
        extension: &'static str,
        label: &'static str,
        kind: FormatKind,
        capability: Option<&'static str>,
        available: bool,
        extract: ExtractFn,
    ) -> Self {
        Self {
            extension,
            label,
            kind,
            capability,
            available,
            extract,
        }
    }

    pub fn extract_text(&self, path: &Path) -> anyhow::Result<String> {
        (self.extract)(path)
    }
}

#[cfg(feature = "docx")]
const DOCX_EXTRACT: ExtractFn = docx::extract_text;
#[cfg(not(feature = "docx"))]
const DOCX_EXTRACT: ExtractFn = capability_missing;

#[cfg(feature = "pptx")]
const PPTX_EXTRACT: ExtractFn = pptx::extract_text;
#[cfg(not(feature = "pptx"))]
const PPTX_EXTRACT: ExtractFn = capability_missing;

#[cfg(any(feature = "xlsx", feature = "xls"))]
const WORKBOOK_EXTRACT: ExtractFn = spreadsheet::extract_text;
#[cfg(not(any(feature = "xlsx", feature = "xls")))]
const WORKBOOK_EXTRACT: ExtractFn = capability_missing;

#[cfg(feature = "pdf")]
const PDF_EXTRACT: ExtractFn = pdf::extract_text;
#[cfg(not(feature = "pdf"))]
const PDF_EXTRACT: ExtractFn = capability_missing;

#[allow(dead_code)]
fn capability_missing(path: &Path) -> anyhow::Result<String> {
    anyhow::bail!("no parser compiled in for {}", path.display())
}

#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<SupportedFormat>,
}

impl FormatRegistry {
    pub fn builtin() -> Self {
        use FormatKind::*;

        let formats = vec![
            SupportedFormat::new("docx", "Word", Docx, Some("docx"), cfg!(feature = "docx"), DOCX_EXTRACT),
            SupportedFormat::new("doc", "Word (legacy)", Doc, None, true, plain_text::extract_legacy_doc),
            SupportedFormat::new("xlsx", "Excel", Xlsx, Some("xlsx"), cfg!(feature = "xlsx"), WORKBOOK_EXTRACT),
            SupportedFormat::new("xls", "Excel (legacy)", Xls, Some("xls"), cfg!(feature = "xls"), WORKBOOK_EXTRACT),
            SupportedFormat::new("pptx", "PowerPoint", Pptx, Some("pptx"), cfg!(feature = "pptx"), PPTX_EXTRACT),
            SupportedFormat::new("ppt", "PowerPoint (legacy)", Ppt, None, true, plain_text::reject_legacy_ppt),
            SupportedFormat::new("pdf", "PDF", Pdf, Some("pdf"), cfg!(feature = "pdf"), PDF_EXTRACT),
            SupportedFormat::new("txt", "Text file", Txt, None, true, plain_text::extract_text),
        ];

        Self { formats }
    }

    /// Marks the given extensions unavailable for this run.
    pub fn with_disabled<S: AsRef<str>>(mut self, disabled: &[S]) -> Self {
        for format in &mut self.formats {
            if disabled
                .iter()
                .any(|d| d.as_ref().trim_start_matches('.').eq_ignore_ascii_case(format.extension))
            {
                format.available = false;
            }
        }
        self
    }

    pub fn formats(&self) -> &[SupportedFormat] {
        &self.formats
    }

    /// Lowercase extensions without the leading dot, regardless of availability.
    pub fn extensions(&self) -> Vec<String> {
        self.formats.iter().map(|f| f.extension.to_string()).collect()
    }

    pub fn lookup(&self, extension: &str) -> Option<&SupportedFormat> {
        let ext = extension.trim_start_matches('.');
        self.formats
            .iter()
            .find(|f| f.extension.eq_ignore_ascii_case(ext))
    }

    pub fn lookup_path(&self, path: &Path) -> Option<&SupportedFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| self.lookup(e))
    }

    /// Features that were compiled out, in table order without repeats.
    pub fn missing_capabilities(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for format in &self.formats {
            if let Some(capability) = format.capability {
                if !capability_compiled(capability) && !missing.contains(&capability) {
                    missing.push(capability);
                }
            }
        }
        missing
    }

    pub fn display_summary(&self) -> String {
        let mut summary = String::from("Supported formats:\n");
        for format in &self.formats {
            summary.push_str(&format!(
                "  .{:<5} {:<20} {}\n",
                format.extension,
                format.label,
                if format.available { "available" } else { "unavailable" }
            ));
        }
        summary
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn capability_compiled(capability: &str) -> bool {
    match capability {
        "docx" => cfg!(feature = "docx"),
        "pptx" => cfg!(feature = "pptx"),
        "xlsx" => cfg!(feature = "xlsx"),
        "xls" => cfg!(feature = "xls"),
        "pdf" => cfg!(feature = "pdf"),
        _ => false,
    }
}

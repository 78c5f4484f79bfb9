use crate::config::ReportConfig;
use crate::error::{DocMailsError, Result};
use crate::extractor::FoundEmails;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const REPORT_HEADER: [&str; 3] = ["Email address", "File count", "Files"];
pub const FILE_SEPARATOR: &str = "; ";

#[cfg(feature = "xlsx")]
pub const WORKSHEET_NAME: &str = "Found emails";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Outcome of writing both reports; one failing never blocks the other.
#[derive(Debug)]
pub struct ReportOutcome {
    pub csv: Result<PathBuf>,
    /// `None` when the spreadsheet report is switched off.
    pub xlsx: Option<Result<PathBuf>>,
}

impl ReportOutcome {
    pub fn written(&self) -> Vec<&Path> {
        let mut paths = Vec::new();
        if let Ok(path) = &self.csv {
            paths.push(path.as_path());
        }
        if let Some(Ok(path)) = &self.xlsx {
            paths.push(path.as_path());
        }
        paths
    }

    pub fn failures(&self) -> Vec<&DocMailsError> {
        let mut failures = Vec::new();
        if let Err(err) = &self.csv {
            failures.push(err);
        }
        if let Some(Err(err)) = &self.xlsx {
            failures.push(err);
        }
        failures
    }
}

/// Writes the aggregated findings as CSV and XLSX into a directory.
///
/// Rows are sorted by email, existing files are overwritten.
pub struct ReportWriter {
    directory: PathBuf,
    csv_file_name: String,
    xlsx_file_name: String,
    include_xlsx: bool,
    #[cfg_attr(not(feature = "xlsx"), allow(dead_code))]
    max_column_width: u32,
}

impl ReportWriter {
    pub fn new<P: Into<PathBuf>>(directory: P, config: &ReportConfig) -> Self {
        Self {
            directory: directory.into(),
            csv_file_name: config.csv_file_name.clone(),
            xlsx_file_name: config.xlsx_file_name.clone(),
            include_xlsx: config.write_xlsx,
            max_column_width: config.max_column_width,
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.directory.join(&self.csv_file_name)
    }

    pub fn xlsx_path(&self) -> PathBuf {
        self.directory.join(&self.xlsx_file_name)
    }

    pub fn write_reports(&self, found: &FoundEmails) -> ReportOutcome {
        let csv = self.write_csv(found);
        let xlsx = self.include_xlsx.then(|| self.write_xlsx(found));

        for err in [csv.as_ref().err(), xlsx.as_ref().and_then(|r| r.as_ref().err())]
            .into_iter()
            .flatten()
        {
            tracing::debug!("{}", err);
        }

        ReportOutcome { csv, xlsx }
    }

    /// UTF-8 with a byte order mark so spreadsheet programs detect the encoding.
    pub fn write_csv(&self, found: &FoundEmails) -> Result<PathBuf> {
        let path = self.csv_path();
        let export_error = |message: String| DocMailsError::Export {
            path: path.display().to_string(),
            message,
        };

        let mut file = fs::File::create(&path).map_err(|e| export_error(e.to_string()))?;
        file.write_all(UTF8_BOM)
            .map_err(|e| export_error(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new().from_writer(file);
        writer
            .write_record(REPORT_HEADER)
            .map_err(|e| export_error(e.to_string()))?;

        for (email, files) in found {
            writer
                .write_record([
                    email.clone(),
                    files.len().to_string(),
                    files.join(FILE_SEPARATOR),
                ])
                .map_err(|e| export_error(e.to_string()))?;
        }

        writer.flush().map_err(|e| export_error(e.to_string()))?;
        tracing::info!("Wrote {} row(s) to {}", found.len(), path.display());

        Ok(path)
    }

    #[cfg(feature = "xlsx")]
    pub fn write_xlsx(&self, found: &FoundEmails) -> Result<PathBuf> {
        use rust_xlsxwriter::{Workbook, XlsxError};

        let path = self.xlsx_path();
        let export_error = |e: XlsxError| DocMailsError::Export {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(WORKSHEET_NAME).map_err(export_error)?;

        for (col, title) in REPORT_HEADER.iter().enumerate() {
            worksheet
                .write_string(0, col as u16, *title)
                .map_err(export_error)?;
        }

        for (index, (email, files)) in found.iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_string(row, 0, email).map_err(export_error)?;
            worksheet
                .write_number(row, 1, files.len() as f64)
                .map_err(export_error)?;
            worksheet
                .write_string(row, 2, files.join(FILE_SEPARATOR))
                .map_err(export_error)?;
        }

        for (col, width) in column_widths(found, self.max_column_width)
            .into_iter()
            .enumerate()
        {
            worksheet
                .set_column_width(col as u16, width)
                .map_err(export_error)?;
        }

        workbook.save(&path).map_err(export_error)?;
        tracing::info!("Wrote {} row(s) to {}", found.len(), path.display());

        Ok(path)
    }

    #[cfg(not(feature = "xlsx"))]
    pub fn write_xlsx(&self, _found: &FoundEmails) -> Result<PathBuf> {
        Err(DocMailsError::CapabilityUnavailable {
            capability: "xlsx".to_string(),
        })
    }
}

/// Longest rendered value per column, header included, plus two, capped.
#[cfg_attr(not(feature = "xlsx"), allow(dead_code))]
fn column_widths(found: &FoundEmails, cap: u32) -> [u32; 3] {
    let mut widths = REPORT_HEADER.map(|title| title.chars().count());

    for (email, files) in found {
        let cells = [
            email.chars().count(),
            files.len().to_string().len(),
            files.join(FILE_SEPARATOR).chars().count(),
        ];
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell);
        }
    }

    widths.map(|w| (w as u32 + 2).min(cap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn findings() -> FoundEmails {
        let mut found = FoundEmails::new();
        found.insert(
            "bob@example.com".to_string(),
            vec!["/docs/b.txt".to_string()],
        );
        found.insert(
            "alice@example.com".to_string(),
            vec!["/docs/a.txt".to_string(), "/docs/b.txt".to_string()],
        );
        found
    }

    fn writer(dir: &Path) -> ReportWriter {
        ReportWriter::new(dir, &ReportConfig::default())
    }

    #[test]
    fn test_csv_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = writer(temp_dir.path()).write_csv(&findings()).unwrap();

        assert_eq!(path, temp_dir.path().join("found_emails.csv"));

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), REPORT_HEADER);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec!["alice@example.com", "2", "/docs/a.txt; /docs/b.txt"],
                vec!["bob@example.com", "1", "/docs/b.txt"],
            ]
        );
    }

    #[test]
    fn test_csv_overwrites_existing_report() {
        let temp_dir = TempDir::new().unwrap();
        let writer = writer(temp_dir.path());
        fs::write(writer.csv_path(), "stale content that is longer than the new report body").unwrap();

        writer.write_csv(&FoundEmails::new()).unwrap();

        let content = fs::read_to_string(writer.csv_path()).unwrap();
        assert!(!content.contains("stale"));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_csv_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let writer = writer(&temp_dir.path().join("gone"));

        let err = writer.write_csv(&findings()).unwrap_err();
        assert!(matches!(err, DocMailsError::Export { .. }));
    }

    #[test]
    fn test_column_widths_are_capped() {
        let mut found = findings();
        found.insert("x@example.com".to_string(), vec!["y".repeat(300)]);

        let widths = column_widths(&found, 100);
        assert_eq!(widths[0], "alice@example.com".len() as u32 + 2);
        assert_eq!(widths[1], "File count".len() as u32 + 2);
        assert_eq!(widths[2], 100);
    }

    #[test]
    fn test_xlsx_disabled_in_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = ReportConfig {
            write_xlsx: false,
            ..ReportConfig::default()
        };
        let writer = ReportWriter::new(temp_dir.path(), &config);

        let outcome = writer.write_reports(&findings());
        assert!(outcome.xlsx.is_none());
        assert_eq!(outcome.written(), vec![writer.csv_path().as_path()]);
        assert!(outcome.failures().is_empty());
        assert!(!writer.xlsx_path().exists());
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_xlsx_report() {
        use calamine::{open_workbook_auto, Data, Reader};

        let temp_dir = TempDir::new().unwrap();
        let writer = writer(temp_dir.path());
        let outcome = writer.write_reports(&findings());
        assert_eq!(outcome.written().len(), 2);

        let mut workbook = open_workbook_auto(writer.xlsx_path()).unwrap();
        assert_eq!(workbook.sheet_names(), vec![WORKSHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(WORKSHEET_NAME).unwrap();
        assert_eq!(range.get_size(), (3, 3));
        assert_eq!(range.get((0, 0)), Some(&Data::String("Email address".to_string())));
        assert_eq!(range.get((1, 0)), Some(&Data::String("alice@example.com".to_string())));
        assert_eq!(range.get((1, 1)), Some(&Data::Float(2.0)));
        assert_eq!(range.get((2, 2)), Some(&Data::String("/docs/b.txt".to_string())));
    }

    #[cfg(not(feature = "xlsx"))]
    #[test]
    fn test_xlsx_without_capability() {
        let temp_dir = TempDir::new().unwrap();
        let err = writer(temp_dir.path()).write_xlsx(&findings()).unwrap_err();

        assert!(matches!(err, DocMailsError::CapabilityUnavailable { .. }));
    }
}

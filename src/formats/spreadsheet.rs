use anyhow::{Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use std::path::Path;

/// Every non-empty cell of every sheet, one cell per line, row by row.
///
/// Handles both `.xlsx` and legacy `.xls`. The container is sniffed from the
/// bytes, so the extension's case or a misnamed file does not matter.
pub fn extract_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read spreadsheet: {}", path.display()))?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let mut text = String::new();

    for sheet_name in workbook.sheet_names().to_vec() {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                tracing::debug!("Skipping sheet {} in {}: {}", sheet_name, path.display(), e);
                continue;
            }
        };

        for row in range.rows() {
            for cell in row {
                if let Some(value) = cell_text(cell) {
                    text.push_str(&value);
                    text.push('\n');
                }
            }
        }
    }

    Ok(text)
}

fn cell_text(cell: &Data) -> Option<String> {
    let value = match cell {
        Data::Empty => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Error(e) => format!("{:?}", e),
    };

    (!value.is_empty()).then_some(value)
}

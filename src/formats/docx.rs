use crate::formats::ooxml;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Body paragraphs joined by newlines, followed by every table cell on its own line.
pub fn extract_text(path: &Path) -> Result<String> {
    let mut archive = ooxml::open_package(path)?;
    let xml = ooxml::read_part(&mut archive, DOCUMENT_PART)?;

    let content = parse_document_xml(&xml)
        .with_context(|| format!("Malformed {} in {}", DOCUMENT_PART, path.display()))?;

    Ok(content.into_text())
}

#[derive(Debug, Default)]
struct DocumentContent {
    paragraphs: Vec<String>,
    cells: Vec<String>,
}

impl DocumentContent {
    fn into_text(self) -> String {
        let mut text = self.paragraphs.join("\n");
        for cell in self.cells {
            text.push('\n');
            text.push_str(&cell);
        }
        text
    }
}

#[derive(Default)]
struct ParseState {
    content: DocumentContent,
    paragraphs: Vec<String>,
    // Paragraphs of every table cell still open; nested tables push more.
    open_cells: Vec<Vec<String>>,
    run_depth: usize,
    in_text: bool,
}

impl ParseState {
    fn push_text(&mut self, text: &str) {
        if let Some(paragraph) = self.paragraphs.last_mut() {
            paragraph.push_str(text);
        }
    }

    fn finish_paragraph(&mut self, text: String) {
        match self.open_cells.last_mut() {
            Some(cell) => cell.push(text),
            None => self.content.paragraphs.push(text),
        }
    }
}

fn parse_document_xml(xml: &str) -> Result<DocumentContent> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut state = ParseState::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => state.paragraphs.push(String::new()),
                b"w:r" => state.run_depth += 1,
                b"w:t" => state.in_text = true,
                b"w:tc" => state.open_cells.push(Vec::new()),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => state.finish_paragraph(String::new()),
                b"w:tab" if state.run_depth > 0 => state.push_text("\t"),
                b"w:br" | b"w:cr" if state.run_depth > 0 => state.push_text("\n"),
                _ => {}
            },
            Event::Text(t) if state.in_text => {
                let text = t.unescape()?;
                state.push_text(&text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => state.in_text = false,
                b"w:r" => state.run_depth = state.run_depth.saturating_sub(1),
                b"w:p" => {
                    if let Some(paragraph) = state.paragraphs.pop() {
                        state.finish_paragraph(paragraph);
                    }
                }
                b"w:tc" => {
                    if let Some(cell) = state.open_cells.pop() {
                        state.content.cells.push(cell.join("\n"));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(state.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::ooxml::test_support::write_package;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Contact:</w:t></w:r><w:r><w:t xml:space="preserve"> sales@</w:t></w:r><w:r><w:t>firm.com</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>R&amp;D</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Support</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>help@firm.com</w:t></w:r></w:p><w:p><w:r><w:t>second line</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
  </w:body>
</w:document>"#;

    #[test]
    fn test_paragraphs_then_table_cells() {
        let content = parse_document_xml(DOCUMENT).unwrap();

        assert_eq!(
            content.paragraphs,
            vec!["Contact: sales@firm.com", "", "Name\tR&D"]
        );
        assert_eq!(content.cells, vec!["Support", "help@firm.com\nsecond line"]);
        assert_eq!(
            content.into_text(),
            "Contact: sales@firm.com\n\nName\tR&D\nSupport\nhelp@firm.com\nsecond line"
        );
    }

    #[test]
    fn test_extract_text_from_package() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("letter.docx");
        write_package(&path, &[("word/document.xml", DOCUMENT)]);

        let text = extract_text(&path).unwrap();
        assert!(text.contains("sales@firm.com"));
        assert!(text.contains("help@firm.com"));
    }

    #[test]
    fn test_package_without_document_part() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.docx");
        write_package(&path, &[("word/styles.xml", "<w:styles/>")]);

        assert!(extract_text(&path).is_err());
    }

    #[test]
    fn test_malformed_xml() {
        assert!(parse_document_xml("<w:document><w:body></w:document>").is_err());
    }
}

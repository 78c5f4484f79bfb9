use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;

/// Text layer of each page in page order, pages separated by newlines.
pub fn extract_text(path: &Path) -> Result<String> {
    let doc = Document::load(path)
        .with_context(|| format!("Failed to load PDF: {}", path.display()))?;

    let pages = doc.get_pages();
    tracing::debug!("{} page(s) in {}", pages.len(), path.display());

    let mut texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let text = doc
            .extract_text(&[*page_number])
            .with_context(|| format!("Failed to read page {} of {}", page_number, path.display()))?;
        texts.push(text);
    }

    Ok(texts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use tempfile::TempDir;

    fn write_pdf(path: &Path, lines: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_extracts_every_page() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.pdf");
        write_pdf(&path, &["Billing: billing@report.io", "Press: press@report.io"]);

        let text = extract_text(&path).unwrap();
        let billing = text.find("billing@report.io").unwrap();
        let press = text.find("press@report.io").unwrap();
        assert!(billing < press);
    }

    #[test]
    fn test_malformed_pdf() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.pdf");
        std::fs::write(&path, "%PDF-1.4\nthis is not a real pdf").unwrap();

        let err = extract_text(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to load PDF"));
    }
}

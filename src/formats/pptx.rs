use crate::formats::ooxml;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Text of every slide in presentation order, one line per text paragraph.
pub fn extract_text(path: &Path) -> Result<String> {
    let mut archive = ooxml::open_package(path)?;
    let slides = ooxml::numbered_parts(&archive, SLIDE_PREFIX);
    tracing::debug!("{} slide(s) in {}", slides.len(), path.display());

    let mut lines = Vec::new();
    for name in slides {
        let xml = ooxml::read_part(&mut archive, &name)?;
        let slide = parse_slide_xml(&xml)
            .with_context(|| format!("Malformed {} in {}", name, path.display()))?;
        lines.extend(slide);
    }

    Ok(lines.join("\n"))
}

/// Paragraphs (`a:p`) of one slide, including shapes nested in groups and tables.
fn parse_slide_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut lines = Vec::new();
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"a:p" => paragraph = Some(String::new()),
                b"a:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"a:p" => lines.push(String::new()),
                b"a:br" => {
                    if let Some(p) = paragraph.as_mut() {
                        p.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(p) = paragraph.as_mut() {
                    p.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    if let Some(p) = paragraph.take() {
                        lines.push(p);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(lines)
}

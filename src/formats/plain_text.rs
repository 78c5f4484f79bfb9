use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn extract_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decode_ignoring_invalid(&bytes))
}

/// Legacy Word documents have no parser here; their bytes are scanned as text,
/// which recovers addresses stored uncompressed and little else.
pub fn extract_legacy_doc(path: &Path) -> Result<String> {
    extract_text(path)
}

pub fn reject_legacy_ppt(_path: &Path) -> Result<String> {
    anyhow::bail!("an additional library is required for .ppt files")
}

/// UTF-8 decode that drops invalid byte sequences instead of replacing them.
pub fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_drops_invalid_sequences() {
        let bytes = b"jo\xffhn@exa\xc3mple.com";
        assert_eq!(decode_ignoring_invalid(bytes), "john@example.com");
    }

    #[test]
    fn test_decode_keeps_valid_unicode() {
        let text = "Почта: ivan@example.ru";
        assert_eq!(decode_ignoring_invalid(text.as_bytes()), text);
    }

    #[test]
    fn test_extract_text_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "Contact: Alice@Example.com").unwrap();

        assert_eq!(extract_text(&path).unwrap(), "Contact: Alice@Example.com");
    }

    #[test]
    fn test_legacy_doc_reads_raw_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("old.doc");
        fs::write(&path, b"\xd0\xcf\x11\xe0 binary header old@example.com \x00\x01").unwrap();

        assert!(extract_legacy_doc(&path).unwrap().contains("old@example.com"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = extract_text(Path::new("/no/such/file.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[test]
    fn test_legacy_ppt_always_rejected() {
        let err = reject_legacy_ppt(Path::new("deck.ppt")).unwrap_err();
        assert!(err.to_string().contains(".ppt"));
    }
}

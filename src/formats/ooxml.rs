//! Shared access to Office Open XML packages (zip containers of XML parts).

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

pub fn open_package(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    ZipArchive::new(file)
        .with_context(|| format!("{} is not a valid Office Open XML package", path.display()))
}

pub fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<String> {
    let mut part = archive
        .by_name(name)
        .with_context(|| format!("Package part {} is missing", name))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .with_context(|| format!("Failed to read package part {}", name))?;

    Ok(xml)
}

/// Part names matching `{prefix}{N}.xml`, ordered by N.
pub fn numbered_parts(archive: &ZipArchive<File>, prefix: &str) -> Vec<String> {
    let mut parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name.strip_prefix(prefix)?.strip_suffix(".xml")?.parse().ok()?;
            Some((number, name.to_string()))
        })
        .collect();

    parts.sort();
    parts.into_iter().map(|(_, name)| name).collect()
}

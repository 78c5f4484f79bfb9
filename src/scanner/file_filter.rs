use crate::formats::FormatRegistry;
use std::path::Path;

/// Accepts files whose extension is in the supported set, ignoring case.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
}

impl FileFilter {
    /// Every extension the registry knows, available or not; availability is
    /// decided at dispatch time so unavailable formats still get an error record.
    pub fn new(registry: &FormatRegistry) -> Self {
        Self {
            extensions: registry.extensions(),
        }
    }

    pub fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.extensions.contains(&ext_lower)
            })
            .unwrap_or(false)
    }

    pub fn get_extensions(&self) -> &[String] {
        &self.extensions
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&FormatRegistry::builtin())
    }
}

use crate::error::{DocMailsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub report: ReportConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extensions whose extractor is switched off even when compiled in.
    pub disabled_formats: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub csv_file_name: String,
    pub xlsx_file_name: String,
    pub write_xlsx: bool,
    pub max_column_width: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_errors_shown: usize,
    pub list_emails: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            csv_file_name: "found_emails.csv".to_string(),
            xlsx_file_name: "found_emails.xlsx".to_string(),
            // The workbook report needs the xlsx writer compiled in
            write_xlsx: cfg!(feature = "xlsx"),
            max_column_width: 100,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_errors_shown: 10,
            list_emails: true,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DocMailsError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DocMailsError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| DocMailsError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["docmails.toml", ".docmails.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        tracing::debug!("Using configuration file {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref disabled) = cli_args.disabled_formats {
            self.scan.disabled_formats.extend(
                disabled
                    .iter()
                    .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                    .filter(|s| !s.is_empty()),
            );
        }

        if let Some(max_errors) = cli_args.max_errors_shown {
            self.display.max_errors_shown = max_errors;
        }

        if cli_args.no_xlsx {
            self.report.write_xlsx = false;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| DocMailsError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| DocMailsError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (label, name) in [
            ("CSV report", &self.report.csv_file_name),
            ("Excel report", &self.report.xlsx_file_name),
        ] {
            if name.trim().is_empty() {
                return Err(DocMailsError::Config {
                    message: format!("{} file name must not be empty", label),
                });
            }

            // Reports always land in the scanned directory itself.
            if name.contains('/') || name.contains('\\') {
                return Err(DocMailsError::Config {
                    message: format!("{} file name must not contain a path: {}", label, name),
                });
            }
        }

        if self.report.csv_file_name == self.report.xlsx_file_name {
            return Err(DocMailsError::Config {
                message: "CSV and Excel reports must use different file names".to_string(),
            });
        }

        if self.report.max_column_width == 0 {
            return Err(DocMailsError::Config {
                message: "Maximum column width must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub disabled_formats: Option<Vec<String>>,
    pub max_errors_shown: Option<usize>,
    pub no_xlsx: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled_formats(mut self, formats: Option<Vec<String>>) -> Self {
        self.disabled_formats = formats;
        self
    }

    pub fn with_max_errors_shown(mut self, max_errors: Option<usize>) -> Self {
        self.max_errors_shown = max_errors;
        self
    }

    pub fn with_no_xlsx(mut self, no_xlsx: bool) -> Self {
        self.no_xlsx = no_xlsx;
        self
    }
}

use crate::config::{CliOverrides, Config};
use crate::error::{DocMailsError, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "docmails")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find email addresses in office documents, PDFs and text files")]
#[command(
    long_about = "docmails walks a directory tree, extracts the text of every Word, Excel, \
                  PowerPoint, PDF and plain text file it finds, and collects the email \
                  addresses they contain. Results are saved as CSV and Excel reports in \
                  the scanned directory."
)]
#[command(after_help = "EXAMPLES:\n  \
    docmails                         ask for a directory interactively\n  \
    docmails ~/Documents/contracts   scan one directory and exit\n  \
    docmails ./inbox --disable pdf,doc --no-xlsx\n  \
    docmails ./inbox --output-format json > report.json")]
pub struct Cli {
    /// Directory to scan. Without it the tool prompts for one, repeatedly.
    pub directory: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Start scans without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Extensions to skip for this run (comma-separated)
    #[arg(long, value_delimiter = ',', help = "Formats to treat as unsupported (e.g., pdf,doc)")]
    pub disable: Option<Vec<String>>,

    /// Number of processing errors listed after a scan
    #[arg(long, help = "How many processing errors to list (default: 10)")]
    pub max_errors: Option<usize>,

    /// Only write the CSV report
    #[arg(long, help = "Skip the Excel report")]
    pub no_xlsx: bool,

    /// Show supported formats and whether this build can read them
    #[arg(long)]
    pub list_formats: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_disabled_formats(self.disable.clone())
            .with_max_errors_shown(self.max_errors)
            .with_no_xlsx(self.no_xlsx)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Accepts an existing directory, expanding a leading `~`.
pub fn validate_directory(input: &str) -> Result<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DocMailsError::InvalidPath {
            path: "no directory given".to_string(),
        });
    }

    let path = expand_home(trimmed);
    if !path.is_dir() {
        return Err(DocMailsError::InvalidPath {
            path: if path.exists() {
                format!("{} is not a directory", path.display())
            } else {
                path.display().to_string()
            },
        });
    }

    Ok(path)
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/").or_else(|| (input == "~").then_some("")) {
        if let Some(home) = std::env::var_os("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(input)
}

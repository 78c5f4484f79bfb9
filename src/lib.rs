pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod matcher;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, DisplayConfig, ReportConfig, ScanConfig};
pub use error::{DocMailsError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    CallbackObserver, EmailExtractor, FoundEmails, ReportOutcome, ReportWriter, ScanObserver,
    ScanProgress, ScanReport,
};
pub use formats::{FormatKind, FormatRegistry, SupportedFormat};
pub use matcher::EmailMatcher;
pub use scanner::{DocumentFile, DocumentScanner, FileFilter};
pub use ui::{InteractiveShell, OutputFormatter, OutputMode, ProgressManager, ShellSummary};

use std::path::Path;
use std::time::Instant;
use tokio::task;

/// Main library interface for DocMails functionality
pub struct DocMails {
    config: Config,
    registry: FormatRegistry,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl DocMails {
    /// Create a new DocMails instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let registry = FormatRegistry::builtin().with_disabled(&config.scan.disabled_formats);
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            registry,
            output_formatter,
            progress_manager,
        }
    }

    /// Create DocMails instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Scan a directory on a blocking worker while the progress bar follows
    /// the extractor's notifications.
    pub async fn scan_directory(&self, directory: &Path) -> Result<ScanReport> {
        let started = Instant::now();
        let file_progress = self.progress_manager.create_file_progress(0);

        let observer = {
            let progress_pb = file_progress.clone();
            let status_pb = file_progress.clone();
            CallbackObserver::new()
                .with_progress(move |processed, total| {
                    ui::progress::update_file_progress(&progress_pb, processed, total);
                })
                .with_status(move |status| status_pb.set_message(status.to_string()))
        };

        let mut extractor = EmailExtractor::new(self.registry.clone())?.with_observer(observer);
        let root = directory.to_path_buf();

        let outcome = task::spawn_blocking(move || {
            extractor.process_directory(&root)?;
            Ok::<_, DocMailsError>(extractor.into_report())
        })
        .await
        .map_err(|e| DocMailsError::ScanFailed {
            message: format!("Scan task failed: {}", e),
        })
        .and_then(|result| result);

        match &outcome {
            Ok(report) => ui::progress::finish_progress_with_summary(
                &file_progress,
                &format!("Processed {} files", report.processed_files),
                started.elapsed(),
            ),
            Err(_) => file_progress.abandon_with_message("Scan failed"),
        }

        outcome
    }

    /// Reports land in the scanned directory and are only written when
    /// something was found.
    pub fn save_reports(&self, directory: &Path, report: &ScanReport) -> Option<ReportOutcome> {
        if report.found_emails.is_empty() {
            return None;
        }

        let writer = ReportWriter::new(directory, &self.config.report);
        Some(writer.write_reports(&report.found_emails))
    }

    /// Print everything a finished scan produced, in the order a user reads it.
    pub fn present_report(&self, report: &ScanReport, outcome: Option<&ReportOutcome>) {
        let formatter = &self.output_formatter;

        if report.total_files == 0 {
            formatter.warning("No files found!");
        }

        formatter.print_scan_summary(report, self.config.display.max_errors_shown);
        if let Some(outcome) = outcome {
            formatter.print_report_outcome(outcome);
        }
        if self.config.display.list_emails {
            formatter.print_findings(&report.found_emails);
        }

        if formatter.mode() == OutputMode::Json {
            formatter.print_json_report(report, outcome);
        }

        let reports_written = outcome.map(|o| !o.written().is_empty()).unwrap_or(false);
        formatter.print_completion_dialog(report, reports_written);
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Get progress manager reference
    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &DocMailsError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Scan a directory with default settings and no terminal output.
pub async fn scan_simple(directory: &Path) -> Result<ScanReport> {
    let docmails = DocMails::new(Config::default(), OutputMode::Plain, 0, true);
    docmails.scan_directory(directory).await
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_instance(config: Config) -> DocMails {
        DocMails::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_docmails_creation() {
        let mut config = Config::default();
        config.scan.disabled_formats = vec!["pdf".to_string()];

        let docmails = quiet_instance(config);
        assert!(!docmails.progress_manager().is_enabled());
        assert!(!docmails.registry().lookup("pdf").unwrap().available);
        assert!(docmails.registry().lookup("txt").unwrap().available);
    }

    #[tokio::test]
    async fn test_scan_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "alice@example.com").unwrap();
        std::fs::write(
            temp_dir.path().join("b.txt"),
            "Bob@Example.com ALICE@example.com",
        )
        .unwrap();

        let report = scan_simple(temp_dir.path()).await.unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.processed_files, 2);
        assert_eq!(report.unique_emails, 2);
        assert_eq!(report.found_emails["alice@example.com"].len(), 2);
        assert_eq!(report.found_emails["bob@example.com"].len(), 1);
    }

    #[tokio::test]
    async fn test_scan_invalid_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = scan_simple(&temp_dir.path().join("missing")).await;

        assert!(matches!(result, Err(DocMailsError::InvalidPath { .. })));
    }

    #[tokio::test]
    async fn test_reports_only_written_with_findings() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("empty.txt"), "nothing here").unwrap();

        let docmails = quiet_instance(Config::default());
        let report = docmails.scan_directory(temp_dir.path()).await.unwrap();

        assert_eq!(report.processed_files, 1);
        assert!(docmails.save_reports(temp_dir.path(), &report).is_none());
        assert!(!temp_dir.path().join("found_emails.csv").exists());
    }

    #[tokio::test]
    async fn test_save_reports_into_scanned_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "alice@example.com").unwrap();

        let mut config = Config::default();
        config.report.write_xlsx = false;
        let docmails = quiet_instance(config);

        let report = docmails.scan_directory(temp_dir.path()).await.unwrap();
        let outcome = docmails.save_reports(temp_dir.path(), &report).unwrap();

        assert!(outcome.failures().is_empty());
        assert!(temp_dir.path().join("found_emails.csv").exists());
        assert!(!temp_dir.path().join("found_emails.xlsx").exists());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("docmails.toml");

        DocMails::generate_sample_config(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.report.csv_file_name, "found_emails.csv");
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}

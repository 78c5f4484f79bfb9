use crate::cli::validate_directory;
use crate::error::{DocMailsError, Result};
use crate::ui::OutputMode;
use crate::DocMails;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::path::{Path, PathBuf};

/// Tally of what happened across the scans of one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShellSummary {
    pub scans_completed: usize,
    pub file_errors: bool,
    pub fatal_errors: bool,
}

impl ShellSummary {
    /// 0 when everything went through, 2 when some files or reports failed,
    /// 1 when a scan could not run at all.
    pub fn exit_code(&self) -> i32 {
        if self.fatal_errors {
            1
        } else if self.file_errors {
            2
        } else {
            0
        }
    }
}

/// Prompt loop around [`DocMails::scan_directory`].
///
/// With a directory from the command line it runs a single scan; otherwise
/// it keeps asking for directories until the user quits.
pub struct InteractiveShell<'a> {
    docmails: &'a DocMails,
    assume_yes: bool,
    theme: ColorfulTheme,
}

impl<'a> InteractiveShell<'a> {
    pub fn new(docmails: &'a DocMails) -> Self {
        Self {
            docmails,
            assume_yes: false,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub async fn run(&self, directory: Option<PathBuf>) -> Result<ShellSummary> {
        let formatter = self.docmails.output_formatter();
        formatter.print_banner(self.docmails.registry());

        let mut summary = ShellSummary::default();

        if let Some(directory) = directory {
            let directory = validate_directory(&directory.to_string_lossy())?;
            self.scan_once(&directory, &mut summary).await;
            return Ok(summary);
        }

        if !formatter.is_interactive() {
            return Err(DocMailsError::InvalidPath {
                path: "no directory given and no terminal to ask for one".to_string(),
            });
        }

        while let Some(directory) = self.prompt_directory()? {
            if !self.confirm_start(&directory)? {
                formatter.info("Scan cancelled.");
                continue;
            }
            self.scan_once(&directory, &mut summary).await;
        }

        Ok(summary)
    }

    /// `None` when the user leaves the prompt empty or types `q`.
    fn prompt_directory(&self) -> Result<Option<PathBuf>> {
        let formatter = self.docmails.output_formatter();

        loop {
            let input: String = Input::with_theme(&self.theme)
                .with_prompt("Directory to scan (empty or q to quit)")
                .allow_empty(true)
                .interact_text()?;

            let input = input.trim();
            if input.is_empty() || input.eq_ignore_ascii_case("q") {
                return Ok(None);
            }

            match validate_directory(input) {
                Ok(path) => return Ok(Some(path)),
                Err(err) => formatter.print_user_friendly_error(&err),
            }
        }
    }

    fn confirm_start(&self, directory: &Path) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(format!("Scan {} for email addresses?", directory.display()))
            .default(true)
            .interact()?;

        Ok(confirmed)
    }

    /// A failed scan is shown and recorded; the session itself carries on.
    async fn scan_once(&self, directory: &Path, summary: &mut ShellSummary) {
        let formatter = self.docmails.output_formatter();
        formatter.print_scan_start(&directory.display().to_string());

        let report = match self.docmails.scan_directory(directory).await {
            Ok(report) => report,
            Err(err) => {
                tracing::error!("Scan of {} failed: {}", directory.display(), err);
                summary.fatal_errors = true;
                formatter.print_error_dialog(&err);
                return;
            }
        };

        let outcome = self.docmails.save_reports(directory, &report);
        self.docmails.present_report(&report, outcome.as_ref());

        summary.scans_completed += 1;
        let export_failed = outcome
            .as_ref()
            .map(|o| !o.failures().is_empty())
            .unwrap_or(false);
        if report.has_errors() || export_failed {
            summary.file_errors = true;
        }

        if formatter.mode() == OutputMode::Human {
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn quiet_docmails(config: Config) -> DocMails {
        DocMails::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ShellSummary::default().exit_code(), 0);

        let partial = ShellSummary {
            scans_completed: 1,
            file_errors: true,
            fatal_errors: false,
        };
        assert_eq!(partial.exit_code(), 2);

        let fatal = ShellSummary {
            fatal_errors: true,
            ..partial
        };
        assert_eq!(fatal.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_single_scan_from_argument() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.txt"), "alice@example.com").unwrap();

        let mut config = Config::default();
        config.report.write_xlsx = false;
        let docmails = quiet_docmails(config);

        let summary = InteractiveShell::new(&docmails)
            .with_assume_yes(true)
            .run(Some(temp_dir.path().to_path_buf()))
            .await
            .unwrap();

        assert_eq!(summary.scans_completed, 1);
        assert_eq!(summary.exit_code(), 0);
        assert!(temp_dir.path().join("found_emails.csv").exists());
    }

    #[tokio::test]
    async fn test_file_errors_are_reported_in_summary() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("slides.ppt"), "legacy").unwrap();

        let docmails = quiet_docmails(Config::default());
        let summary = InteractiveShell::new(&docmails)
            .run(Some(temp_dir.path().to_path_buf()))
            .await
            .unwrap();

        assert!(summary.file_errors);
        assert_eq!(summary.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_invalid_argument_directory() {
        let temp_dir = TempDir::new().unwrap();
        let docmails = quiet_docmails(Config::default());

        let result = InteractiveShell::new(&docmails)
            .run(Some(temp_dir.path().join("missing")))
            .await;

        assert!(matches!(result, Err(DocMailsError::InvalidPath { .. })));
    }

    #[tokio::test]
    async fn test_no_directory_without_terminal() {
        let docmails = quiet_docmails(Config::default());

        let result = InteractiveShell::new(&docmails).run(None).await;

        assert!(result.is_err());
    }
}

use crate::error::{DocMailsError, Result};
use crate::formats::FormatRegistry;
use crate::matcher::EmailMatcher;
use crate::scanner::{DocumentFile, DocumentScanner};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Lowercased email to the files it was seen in, in discovery order.
pub type FoundEmails = BTreeMap<String, Vec<String>>;

/// Receives progress and status updates while a scan runs.
///
/// Called synchronously from whichever thread runs
/// [`EmailExtractor::process_directory`].
pub trait ScanObserver: Send {
    fn on_progress(&self, processed: usize, total: usize);
    fn on_status(&self, message: &str);
}

type ProgressFn = Box<dyn Fn(usize, usize) + Send>;
type StatusFn = Box<dyn Fn(&str) + Send>;

/// Observer built from two optional closures.
#[derive(Default)]
pub struct CallbackObserver {
    progress: Option<ProgressFn>,
    status: Option<StatusFn>,
}

impl CallbackObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn with_status<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + 'static,
    {
        self.status = Some(Box::new(callback));
        self
    }
}

impl ScanObserver for CallbackObserver {
    fn on_progress(&self, processed: usize, total: usize) {
        if let Some(callback) = &self.progress {
            callback(processed, total);
        }
    }

    fn on_status(&self, message: &str) {
        if let Some(callback) = &self.status {
            callback(message);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ScanProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self) {
        self.files_processed += 1;
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Everything a finished scan produced, detached from the extractor.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub scanned_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total_files: usize,
    pub processed_files: usize,
    pub unique_emails: usize,
    pub found_emails: FoundEmails,
    pub errors: Vec<String>,
}

impl ScanReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Walks a directory, runs the matching extractor on each file and
/// aggregates addresses case-insensitively.
///
/// State is owned by the instance and rebuilt on each
/// [`process_directory`](Self::process_directory) that finds files.
pub struct EmailExtractor {
    registry: FormatRegistry,
    scanner: DocumentScanner,
    matcher: EmailMatcher,
    observer: Option<Box<dyn ScanObserver>>,
    found_emails: FoundEmails,
    progress: ScanProgress,
    root: Option<PathBuf>,
    scanned_at: DateTime<Utc>,
}

impl EmailExtractor {
    pub fn new(registry: FormatRegistry) -> Result<Self> {
        let scanner = DocumentScanner::new(&registry);

        Ok(Self {
            registry,
            scanner,
            matcher: EmailMatcher::new()?,
            observer: None,
            found_emails: FoundEmails::new(),
            progress: ScanProgress::default(),
            root: None,
            scanned_at: Utc::now(),
        })
    }

    pub fn with_observer<O: ScanObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn found_emails(&self) -> &FoundEmails {
        &self.found_emails
    }

    pub fn errors(&self) -> &[String] {
        &self.progress.errors
    }

    pub fn processed_files(&self) -> usize {
        self.progress.files_processed
    }

    pub fn total_files(&self) -> usize {
        self.progress.total_files
    }

    pub fn process_directory<P: AsRef<Path>>(&mut self, root: P) -> Result<()> {
        let root = root.as_ref();

        self.report_status("Searching for files...");
        let files = self.scanner.find_files(root)?;
        self.root = Some(root.to_path_buf());
        self.scanned_at = Utc::now();

        if files.is_empty() {
            self.report_status("No files found!");
            return Ok(());
        }

        self.found_emails.clear();
        self.progress = ScanProgress::new(files.len());

        let total = files.len();
        self.report_status(&format!("Found {} files. Starting processing...", total));

        for (index, file) in files.iter().enumerate() {
            self.report_status(&format!(
                "Processing: {} ({}/{})",
                file.filename,
                index + 1,
                total
            ));
            self.process_file(file);
        }

        tracing::info!(
            "Scan of {} finished: {} processed, {} unique emails, {} errors",
            root.display(),
            self.progress.files_processed,
            self.found_emails.len(),
            self.progress.errors.len()
        );
        self.report_status(&format!(
            "Processing complete! Unique emails found: {}",
            self.found_emails.len()
        ));

        Ok(())
    }

    /// Files without an available extractor are recorded as errors and do
    /// not count as processed.
    fn process_file(&mut self, file: &DocumentFile) {
        let path_display = file.source_path.display().to_string();
        tracing::debug!("Extracting {}", file.display_path());

        let format = match self.registry.lookup_path(&file.source_path) {
            Some(format) if format.available => format,
            _ => {
                tracing::debug!("No extractor available for {}", path_display);
                self.progress.add_error(format!(
                    "Unsupported format or missing capability: {}",
                    path_display
                ));
                return;
            }
        };

        let emails = match format.extract_text(&file.source_path) {
            Ok(text) => self.matcher.extract(&text),
            Err(err) => {
                let error = DocMailsError::Extraction {
                    path: path_display.clone(),
                    reason: format!("{:#}", err),
                };
                tracing::debug!("{}", error);
                self.progress.add_error(error.to_string());
                Default::default()
            }
        };

        let lowered: BTreeSet<String> = emails.iter().map(|e| e.to_lowercase()).collect();
        for email in lowered {
            self.found_emails
                .entry(email)
                .or_default()
                .push(path_display.clone());
        }

        self.progress.update_file();
        self.report_progress();
    }

    pub fn into_report(self) -> ScanReport {
        ScanReport {
            root: self
                .root
                .as_ref()
                .map(|r| r.display().to_string())
                .unwrap_or_default(),
            scanned_at: self.scanned_at,
            duration_ms: self.progress.elapsed().as_millis() as u64,
            total_files: self.progress.total_files,
            processed_files: self.progress.files_processed,
            unique_emails: self.found_emails.len(),
            found_emails: self.found_emails,
            errors: self.progress.errors,
        }
    }

    fn report_progress(&self) {
        if let Some(observer) = &self.observer {
            observer.on_progress(self.progress.files_processed, self.progress.total_files);
        }
    }

    fn report_status(&self, message: &str) {
        tracing::debug!("{}", message);
        if let Some(observer) = &self.observer {
            observer.on_status(message);
        }
    }
}

use crate::error::{DocMailsError, UserFriendlyError};
use crate::extractor::{FoundEmails, ReportOutcome, ScanReport};
use crate::formats::FormatRegistry;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ENVELOPE: Emoji = Emoji("📧 ", "@ ");

const RULE_WIDTH: usize = 60;

pub struct OutputFormatter {
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Prompts only make sense for a person at a terminal.
    pub fn is_interactive(&self) -> bool {
        self.mode == OutputMode::Human && self.term.is_term()
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &DocMailsError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_banner(&self, registry: &FormatRegistry) {
        if self.should_show_message(0) && self.mode != OutputMode::Json {
            if self.use_colors {
                println!(
                    "{}{}",
                    ENVELOPE,
                    style("Email address extractor").bold().cyan()
                );
            } else {
                println!("Email address extractor");
            }

            let extensions: Vec<String> = registry
                .formats()
                .iter()
                .filter(|f| f.available)
                .map(|f| format!(".{}", f.extension))
                .collect();
            println!("Scans {} files for email addresses.", extensions.join(" "));
            println!();
        }

        let missing = registry.missing_capabilities();
        if !missing.is_empty() {
            self.warning(&format!(
                "Built without support for: {}. Rebuild with `--features {}` to enable them; \
                 files of these formats will be reported as unsupported.",
                missing.join(", "),
                missing.join(",")
            ));
        }
    }

    pub fn print_formats(&self, registry: &FormatRegistry) {
        match self.mode {
            OutputMode::Json => {
                let formats: Vec<_> = registry
                    .formats()
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "extension": f.extension,
                            "label": f.label,
                            "kind": f.kind,
                            "capability": f.capability,
                            "available": f.available,
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "formats",
                    "formats": formats
                }));
            }
            _ => print!("{}", registry.display_summary()),
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                self.print_rule();
                if self.use_colors {
                    println!("{}", style(title).bold().cyan());
                } else {
                    println!("{}", title);
                }
                self.print_rule();
            }
            OutputMode::Json => {}
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_scan_start(&self, directory: &str) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        self.print_header("Starting processing...");
        println!("Directory: {}", directory);
    }

    pub fn print_scan_summary(&self, report: &ScanReport, max_errors: usize) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        self.print_header("Processing results");
        println!("Total files processed: {}", self.highlight(report.processed_files));
        println!("Unique email addresses found: {}", self.highlight(report.unique_emails));

        if report.has_errors() {
            println!();
            println!("Errors during processing: {}", report.errors.len());
            let (shown, hidden) = capped_errors(&report.errors, max_errors);
            for error in shown {
                println!("  - {}", error);
            }
            if hidden > 0 {
                println!("  ... and {} more errors", hidden);
            }
        }
    }

    pub fn print_report_outcome(&self, outcome: &ReportOutcome) {
        if self.mode == OutputMode::Json {
            return;
        }

        match &outcome.csv {
            Ok(path) => self.success(&format!("Results saved to CSV: {}", path.display())),
            Err(err) => self.error(&format!("Error saving CSV: {}", err)),
        }

        match &outcome.xlsx {
            Some(Ok(path)) => self.success(&format!("Results saved to Excel: {}", path.display())),
            Some(Err(err)) => self.error(&format!("Error saving Excel: {}", err)),
            None => {}
        }
    }

    pub fn print_findings(&self, found: &FoundEmails) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }

        if found.is_empty() {
            println!();
            println!("No email addresses found.");
            return;
        }

        self.print_header("Found email addresses");
        for line in finding_lines(found) {
            println!("{}", line);
        }
    }

    /// Terminal summary shown after each scan, the shell's stand-in for a dialog box.
    pub fn print_completion_dialog(&self, report: &ScanReport, reports_written: bool) {
        if self.mode == OutputMode::Json {
            return;
        }

        let mut lines = vec![
            "Processing complete!".to_string(),
            String::new(),
            format!("Files processed: {}", report.processed_files),
            format!("Emails found: {}", report.unique_emails),
        ];
        if reports_written {
            lines.push("Results saved in the selected directory.".to_string());
        }

        self.print_dialog("Done", &lines, MessageType::Success);
    }

    pub fn print_error_dialog(&self, error: &DocMailsError) {
        if self.mode == OutputMode::Json {
            self.print_json_object(&serde_json::json!({
                "type": "fatal_error",
                "message": error.user_message(),
                "suggestion": error.suggestion(),
            }));
            return;
        }

        let mut lines = vec![format!("An error occurred: {}", error.user_message())];
        if let Some(suggestion) = error.suggestion() {
            lines.push(String::new());
            lines.push(suggestion);
        }

        self.print_dialog("Error", &lines, MessageType::Error);
    }

    pub fn print_json_report(&self, report: &ScanReport, outcome: Option<&ReportOutcome>) {
        let mut value = serde_json::to_value(report).unwrap_or_else(|_| serde_json::json!({}));

        if let Some(object) = value.as_object_mut() {
            object.insert("type".to_string(), serde_json::json!("scan_report"));
            let (written, failures) = match outcome {
                Some(outcome) => (
                    outcome
                        .written()
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>(),
                    outcome
                        .failures()
                        .iter()
                        .map(|e| e.to_string())
                        .collect::<Vec<_>>(),
                ),
                None => (Vec::new(), Vec::new()),
            };
            object.insert("reports_written".to_string(), serde_json::json!(written));
            object.insert("export_errors".to_string(), serde_json::json!(failures));
        }

        println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_dialog(&self, title: &str, lines: &[String], msg_type: MessageType) {
        let width = lines
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(title.chars().count()))
            .max()
            .unwrap_or(0)
            + 2;

        let border = format!("+{}+", "-".repeat(width));
        let title_line = format!("| {:<w$} |", title, w = width - 2);

        let print = |line: &str| match msg_type {
            MessageType::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        };

        print("");
        if self.use_colors {
            let styled_title = match msg_type {
                MessageType::Error => style(title_line).red().bold().to_string(),
                _ => style(title_line).green().bold().to_string(),
            };
            print(&border);
            print(&styled_title);
        } else {
            print(&border);
            print(&title_line);
        }
        print(&border);
        for line in lines {
            print(&format!("| {:<w$} |", line, w = width - 2));
        }
        print(&border);
    }

    fn print_rule(&self) {
        if self.use_colors {
            println!("{}", style("=".repeat(RULE_WIDTH)).dim());
        } else {
            println!("{}", "=".repeat(RULE_WIDTH));
        }
    }

    fn highlight(&self, value: usize) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

/// The first `max` errors and how many were left out.
pub fn capped_errors(errors: &[String], max: usize) -> (&[String], usize) {
    let shown = errors.len().min(max);
    (&errors[..shown], errors.len() - shown)
}

pub fn finding_lines(found: &FoundEmails) -> Vec<String> {
    found
        .iter()
        .map(|(email, files)| format!("{} (found in {} file(s))", email, files.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }

    #[test]
    fn test_json_mode_is_never_interactive() {
        let formatter = OutputFormatter::new(OutputMode::Json, 0, false);
        assert!(!formatter.is_interactive());
    }

    #[test]
    fn test_capped_errors() {
        let errors: Vec<String> = (1..=13).map(|i| format!("error {}", i)).collect();

        let (shown, hidden) = capped_errors(&errors, 10);
        assert_eq!(shown.len(), 10);
        assert_eq!(shown[9], "error 10");
        assert_eq!(hidden, 3);

        let (shown, hidden) = capped_errors(&errors[..2], 10);
        assert_eq!(shown.len(), 2);
        assert_eq!(hidden, 0);
    }

    #[test]
    fn test_finding_lines() {
        let mut found = FoundEmails::new();
        found.insert("b@example.com".to_string(), vec!["x".to_string()]);
        found.insert(
            "a@example.com".to_string(),
            vec!["x".to_string(), "y".to_string()],
        );

        assert_eq!(
            finding_lines(&found),
            vec![
                "a@example.com (found in 2 file(s))",
                "b@example.com (found in 1 file(s))"
            ]
        );
    }
}

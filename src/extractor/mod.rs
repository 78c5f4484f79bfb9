pub mod file_extractor;
pub mod output_manager;

pub use file_extractor::{
    CallbackObserver, EmailExtractor, FoundEmails, ScanObserver, ScanProgress, ScanReport,
};
pub use output_manager::{ReportOutcome, ReportWriter};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Bar for the per-file phase of a scan. The length is set once the
    /// walker reports how many files it found.
    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Searching for files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn update_file_progress(pb: &ProgressBar, processed: usize, total: usize) {
    if pb.length() != Some(total as u64) {
        pb.set_length(total as u64);
    }
    pb.set_position(processed as u64);
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_manager_creation() {
        let manager = ProgressManager::new(true);
        assert!(manager.is_enabled());

        let disabled_manager = ProgressManager::new(false);
        assert!(!disabled_manager.is_enabled());
    }

    #[test]
    fn test_disabled_progress_bar() {
        let manager = ProgressManager::new(false);

        assert!(manager.create_file_progress(10).is_hidden());
    }

    #[test]
    fn test_update_file_progress_sets_length() {
        let pb = ProgressBar::hidden();

        update_file_progress(&pb, 3, 12);
        assert_eq!(pb.length(), Some(12));
        assert_eq!(pb.position(), 3);

        update_file_progress(&pb, 12, 12);
        assert_eq!(pb.position(), 12);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }
}

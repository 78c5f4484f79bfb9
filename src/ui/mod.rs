pub mod output;
pub mod progress;
pub mod shell;

pub use output::{OutputFormatter, OutputMode};
pub use progress::ProgressManager;
pub use shell::{InteractiveShell, ShellSummary};

use clap::Parser;
use docmails::{
    Cli, DocMails, DocMailsError, InteractiveShell, OutputFormatter, OutputMode,
    UserFriendlyError,
};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "docmails.toml";

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();
    setup_logging(&cli);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let docmails = match DocMails::from_cli(&cli) {
        Ok(docmails) => docmails,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    if cli.list_formats {
        docmails.output_formatter().print_formats(docmails.registry());
        return 0;
    }

    let shell = InteractiveShell::new(&docmails).with_assume_yes(cli.yes);
    match shell.run(cli.directory.clone()).await {
        Ok(summary) => summary.exit_code(),
        Err(e) => {
            docmails.handle_error(&e);
            1
        }
    }
}

/// Logs go to stderr so they never mix with JSON on stdout. `RUST_LOG`
/// takes precedence over `-v`.
fn setup_logging(cli: &Cli) {
    let level = match cli.verbosity_level() {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docmails={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    match DocMails::generate_sample_config(&config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!("  docmails <directory> --config {}", config_path.display());
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &DocMailsError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

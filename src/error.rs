use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocMailsError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid email pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to process {path}: {reason}")]
    Extraction { path: String, reason: String },

    #[error("Failed to write report {path}: {message}")]
    Export { path: String, message: String },

    #[error("Capability not available: {capability}")]
    CapabilityUnavailable { capability: String },

    #[error("Scan failed: {message}")]
    ScanFailed { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for DocMailsError {
    fn user_message(&self) -> String {
        match self {
            DocMailsError::InvalidPath { path } => {
                format!("Invalid directory: {}", path)
            }
            DocMailsError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            DocMailsError::Extraction { path, reason } => {
                format!("Could not read {}: {}", path, reason)
            }
            DocMailsError::Export { path, message } => {
                format!("Could not save report {}: {}", path, message)
            }
            DocMailsError::CapabilityUnavailable { capability } => {
                format!("This build was compiled without {} support", capability)
            }
            DocMailsError::ScanFailed { message } => {
                format!("The scan stopped unexpectedly: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            DocMailsError::InvalidPath { .. } => Some(
                "Check that the directory exists and that you have permission to read it."
                    .to_string(),
            ),
            DocMailsError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config."
                    .to_string(),
            ),
            DocMailsError::Export { .. } => Some(
                "Ensure the scanned directory is writable and the report file is not open in another program."
                    .to_string(),
            ),
            DocMailsError::CapabilityUnavailable { capability } => Some(format!(
                "Rebuild with the `{}` cargo feature enabled.",
                capability
            )),
            DocMailsError::Io(_) => Some(
                "Ensure you have the necessary read/write permissions for the target directory."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for DocMailsError {
    fn from(error: toml::de::Error) -> Self {
        DocMailsError::Config {
            message: error.to_string(),
        }
    }
}

impl From<dialoguer::Error> for DocMailsError {
    fn from(error: dialoguer::Error) -> Self {
        match error {
            dialoguer::Error::IO(e) => DocMailsError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocMailsError>;

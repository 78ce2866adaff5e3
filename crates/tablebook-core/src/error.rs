use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// Every variant is produced before a browser session exists, so a
/// `ConfigError` never has side effects on the booking site.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid booking request: {0}")]
    Validation(String),

    #[error("failed to read selectors file {path}: {source}")]
    SelectorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse selectors file: {0}")]
    SelectorsFileParse(#[source] serde_yaml::Error),
}

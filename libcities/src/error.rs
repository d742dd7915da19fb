//! Error types for Cities

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CitiesError>;

#[derive(Error, Debug)]
pub enum CitiesError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Boundary error: {0}")]
    Parse(#[from] ParseError),

    /// The catalog resolved to a failure state; carries the display message
    #[error("City catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CitiesError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CitiesError::InvalidInput(_) => 3,
            CitiesError::Parse(_) => 2,
            CitiesError::Fetch(_) => 1,
            CitiesError::Unavailable(_) => 1,
            CitiesError::Config(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Failures of the city catalog call
///
/// None of these reach callers of the state store; they are folded into
/// `CitiesState::Failed` by the reducer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Malformed response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return FetchError::Decode(error.to_string());
        }
        match error.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(error.to_string()),
        }
    }
}

/// Malformed boundary point string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected \"lon lat\" pair, got {0:?}")]
    BadPair(String),

    #[error("Invalid coordinate {0:?}")]
    BadNumber(String),
}

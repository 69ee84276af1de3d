//! Error types for the onboarding core.

/// Top-level error type.
///
/// Every variant is recoverable: the stage that produced it keeps its input so
/// the user can correct and resubmit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Service error ({status:?}): {message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    #[error("Contract error: {reason}")]
    Contract { reason: String },

    #[error("Cannot {action} during the {stage} stage")]
    OutOfOrder { stage: String, action: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn network(e: impl std::fmt::Display) -> Self {
        Self::Network {
            reason: e.to_string(),
        }
    }

    pub(crate) fn service(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn contract(reason: impl Into<String>) -> Self {
        Self::Contract {
            reason: reason.into(),
        }
    }

    /// Whether the error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::OutOfOrder { .. })
    }

    /// Inline message to show next to the form that failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Network { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Service { message, .. } => message.clone(),
            Self::Contract { .. } => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
            Self::OutOfOrder { .. } => "This step is not available right now.".to_string(),
            Self::Config(e) => e.to_string(),
        }
    }
}

/// Local, pre-network validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    EmptyField { field: &'static str },

    #[error("Missing verification identifier")]
    MissingVerificationId,

    #[error("Enter all {expected} digits of the code (got {actual})")]
    CodeLength { expected: usize, actual: usize },

    #[error("The code only contains digits (got {0:?})")]
    NonDigitCode(char),

    #[error("A new code can be requested in {remaining}s")]
    ResendLocked { remaining: u32 },

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("{city} is not a city of {region}")]
    CityNotInRegion { region: String, city: String },

    #[error("Select a region before choosing a city")]
    CityWithoutRegion,

    #[error("Select a city for {region}")]
    MissingCity { region: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Missing store identifier")]
    MissingStoreId,
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

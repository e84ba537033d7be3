use thiserror::Error;

/// How a failed query should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The query stopped for an ordinary reason (unknown city).
    Warning,
    /// Something went wrong talking to the provider or handling its data.
    Error,
}

/// Closed set of failures a weather query can end with.
///
/// Library-specific errors (`reqwest`, `serde_json`) are mapped onto these at
/// the retrieval boundary, so callers only ever match on this enum.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("city name is empty")]
    EmptyCity,

    #[error("no location found for '{0}'")]
    CityNotFound(String),

    #[error("provider responded with status {status}")]
    Provider { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WeatherError {
    /// User-facing text for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCity => "City is required.".to_string(),
            Self::CityNotFound(_) => "City not found. Try another spelling.".to_string(),
            Self::Provider { status } => format!("Provider error: {status}"),
            Self::Network(_) => "Network error.".to_string(),
            Self::Unexpected(detail) => format!("Unexpected error: {detail}"),
            Self::InvalidConfig(detail) => format!("Invalid configuration: {detail}"),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::CityNotFound(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unexpected(format!("malformed provider payload: {err}"))
    }
}

use thiserror::Error;

/// Fallback message when the provider rejects a city without saying why.
pub const DEFAULT_NOT_FOUND: &str = "City not found";

/// Why a search did not produce a [`WeatherRecord`](crate::WeatherRecord).
///
/// Every fault below the query service boundary (network, HTTP, JSON) is folded
/// into one of these before it reaches the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Blank search text. The controller declines silently; never shown.
    #[error("search text is empty")]
    EmptyInput,

    /// No API key, or the key is still a placeholder. Needs reconfiguration.
    #[error("OpenWeatherMap API key is not configured")]
    MissingCredential,

    /// Provider answered with a non-success status code.
    #[error("city not found: {0}")]
    CityNotFound(String),

    /// Request could not be completed or its body could not be decoded.
    #[error("weather request failed")]
    TransportFailure,
}

impl LookupError {
    /// Text for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::EmptyInput => String::new(),
            LookupError::MissingCredential => "Please set your OpenWeatherMap API key \
                 (run `skyview configure` or set OPENWEATHER_API_KEY)."
                .to_string(),
            LookupError::CityNotFound(message) => message.clone(),
            LookupError::TransportFailure => "Error fetching data".to_string(),
        }
    }

    /// Whether searching again without reconfiguring can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LookupError::CityNotFound(_) | LookupError::TransportFailure
        )
    }
}

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while fetching weather.
///
/// The `Display` output of every variant is the message shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Please enter a city name")]
    EmptyCity,

    #[error("API key is not configured. Please check your environment setup.")]
    MissingApiKey,

    #[error("{}", status_message(.0))]
    HttpStatus(StatusCode),

    #[error("Request timed out. Please check your connection and try again.")]
    Timeout,

    #[error("Network error. Please check your internet connection.")]
    Network(#[source] reqwest::Error),

    #[error("Failed to parse weather data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response from weather service: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        let err = err.without_url();
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
            FetchError::Network(err)
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

/// User-facing message for a non-success HTTP status.
pub fn status_message(status: &StatusCode) -> &'static str {
    match status.as_u16() {
        404 => "City not found. Please check the spelling and try again.",
        401 => "Invalid API key. Please check your configuration.",
        429 => "Too many requests. Please wait a moment and try again.",
        500 | 503 => "Weather service is temporarily unavailable.",
        _ => "Failed to fetch weather data.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_have_specific_messages() {
        let cases = [
            (404, "City not found. Please check the spelling and try again."),
            (401, "Invalid API key. Please check your configuration."),
            (429, "Too many requests. Please wait a moment and try again."),
            (500, "Weather service is temporarily unavailable."),
            (503, "Weather service is temporarily unavailable."),
        ];

        for (code, expected) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(FetchError::HttpStatus(status).to_string(), expected);
        }
    }

    #[test]
    fn unknown_status_falls_back_to_generic_message() {
        for code in [400, 403, 502] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(status_message(&status), "Failed to fetch weather data.");
        }
    }

    #[test]
    fn other_passes_message_through() {
        let err = FetchError::Other("something odd".into());
        assert_eq!(err.to_string(), "something odd");
    }
}

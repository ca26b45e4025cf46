use thiserror::Error;

/// Failures that can escape the geocode/fetch steps.
///
/// Note the taxonomy is deliberately small: a geocoding query with zero hits
/// is not an error (the controller turns it into its Empty outcome), and a
/// non-success status on the forecast call is swallowed inside the fetcher.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The HTTP call itself failed (connect, send, or reading the body).
    #[error("transport failure talking to OpenWeather: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered but the payload did not match the expected shape.
    #[error("malformed OpenWeather payload: {0}")]
    Parse(#[from] serde_json::Error),
}

use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    Config,
    error::ForecastError,
    model::{Coord, GeoCandidate, RawSample},
    provider::openweather::OpenWeatherClient,
};

pub mod openweather;

/// Maximum number of geocoding candidates requested per lookup.
pub const GEO_CANDIDATE_LIMIT: usize = 5;

/// Capability: resolve a free-text city name to coordinate candidates.
///
/// `city` must be non-empty. Candidates come back in the order the service
/// ranked them; an empty list is a normal result meaning "no location
/// found", not an error.
#[async_trait]
pub trait GeoResolver: Send + Sync + Debug {
    async fn resolve(&self, city: &str) -> Result<Vec<GeoCandidate>, ForecastError>;
}

/// Capability: fetch the raw fixed-interval forecast samples for a
/// coordinate pair, metric units.
///
/// A non-success HTTP status yields `Ok(vec![])` rather than an error. That
/// silent-empty path is kept from the source behavior on purpose; it is
/// logged at warn level but never surfaced to the caller.
#[async_trait]
pub trait ForecastFetcher: Send + Sync + Debug {
    async fn fetch(&self, coord: Coord) -> Result<Vec<RawSample>, ForecastError>;
}

/// Construct the OpenWeather client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `cityweather configure` and enter your OpenWeather API key."
        )
    })?;

    Ok(OpenWeatherClient::new(api_key.to_owned(), config.country.clone()))
}

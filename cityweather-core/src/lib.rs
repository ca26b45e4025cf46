//! Core library for the `cityweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The geocoding and forecast capability traits, with an OpenWeather client
//! - The pure per-date aggregation of raw forecast samples
//! - The search controller that orchestrates resolve → fetch → aggregate
//!
//! It is used by `cityweather-cli`, but can also be reused by other binaries
//! or services.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod search;

pub use aggregate::{DEFAULT_DAY_LIMIT, aggregate, aggregate_in};
pub use config::Config;
pub use error::ForecastError;
pub use model::{Coord, DailySummary, GeoCandidate, Notice, RawSample, SearchState};
pub use provider::{ForecastFetcher, GeoResolver, openweather::OpenWeatherClient};
pub use search::SearchController;

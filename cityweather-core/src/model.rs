use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One geocoding hit for a city query. The geocoding endpoint returns more
/// fields (name, state, country); only the coordinates are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoCandidate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCandidate {
    pub fn coord(&self) -> Coord {
        Coord { lat: self.lat, lon: self.lon }
    }
}

/// One raw forecast data point at the service's fixed interval (3 hours).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Epoch seconds (UTC).
    pub timestamp: i64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub pressure: u32,
    pub humidity: u8,
}

/// Aggregated readings for one calendar date.
///
/// `min_temp`/`max_temp` are running extrema over every sample falling on
/// `date`; `pressure` and `humidity` are pinned to the first sample seen for
/// that date. The asymmetry is contract, kept from the source behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub pressure: u32,
    pub humidity: u8,
}

/// User-facing outcome notice for a settled search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoLocationFound,
    FetchFailed,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::NoLocationFound => f.write_str("No location found"),
            Notice::FetchFailed => f.write_str("Error fetching data"),
        }
    }
}

/// Presentation state owned by [`crate::search::SearchController`].
///
/// Replaced wholesale at transition points; consumers never observe a
/// partially updated request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query_city: String,
    pub summaries: Vec<DailySummary>,
    pub is_loading: bool,
    pub notice: Option<Notice>,
}

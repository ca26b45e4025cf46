use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::ForecastError,
    model::{Coord, GeoCandidate, RawSample},
    provider::{ForecastFetcher, GEO_CANDIDATE_LIMIT, GeoResolver},
};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Client for the two OpenWeather endpoints the pipeline needs: direct
/// geocoding and the 5-day/3-hour forecast.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    country: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, country: String) -> Self {
        Self::with_base_url(api_key, country, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host, used by tests to target a
    /// local mock server.
    pub fn with_base_url(api_key: String, country: String, base_url: String) -> Self {
        Self { api_key, country, base_url, http: Client::new() }
    }
}

#[async_trait]
impl GeoResolver for OpenWeatherClient {
    async fn resolve(&self, city: &str) -> Result<Vec<GeoCandidate>, ForecastError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let scoped_query = format!("{},{}", city, self.country);
        let limit = GEO_CANDIDATE_LIMIT.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", scoped_query.as_str()),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = res.text().await?;
        let candidates: Vec<GeoCandidate> = serde_json::from_str(&body)?;

        tracing::debug!(city, hits = candidates.len(), "geocoding lookup finished");

        // Service order, no re-ranking. Zero hits is a normal result.
        Ok(candidates)
    }
}

#[async_trait]
impl ForecastFetcher for OpenWeatherClient {
    async fn fetch(&self, coord: Coord) -> Result<Vec<RawSample>, ForecastError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);
        let lat = coord.lat.to_string();
        let lon = coord.lon.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // Kept from the source behavior: a failed forecast call is an
            // empty sample list, not an error. The warn line is the only
            // trace it leaves.
            tracing::warn!(%status, "forecast request failed, returning no samples");
            return Ok(Vec::new());
        }

        let body = res.text().await?;
        let parsed: OwForecastResponse = serde_json::from_str(&body)?;

        let samples = parsed
            .list
            .into_iter()
            .map(|entry| RawSample {
                timestamp: entry.dt,
                min_temp: entry.main.temp_min,
                max_temp: entry.main.temp_max,
                pressure: entry.main.pressure,
                humidity: entry.main.humidity,
            })
            .collect();

        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwSampleMain {
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwSampleMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::with_base_url("TESTKEY".into(), "IN".into(), server.uri())
    }

    #[tokio::test]
    async fn resolve_keeps_service_order_and_scopes_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Pune,IN"))
            .and(query_param("limit", "5"))
            .and(query_param("appid", "TESTKEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "Pune", "lat": 18.52, "lon": 73.85, "country": "IN" },
                { "name": "Pune, Nanded", "lat": 19.14, "lon": 77.31, "country": "IN" },
            ])))
            .mount(&server)
            .await;

        let hits = client(&server).resolve("Pune").await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], GeoCandidate { lat: 18.52, lon: 73.85 });
        assert_eq!(hits[1], GeoCandidate { lat: 19.14, lon: 77.31 });
    }

    #[tokio::test]
    async fn resolve_empty_array_is_a_normal_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let hits = client(&server).resolve("Nowhereville").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn resolve_propagates_http_failure_as_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).resolve("Pune").await.unwrap_err();
        assert!(matches!(err, ForecastError::Transport(_)));
    }

    #[tokio::test]
    async fn fetch_parses_samples_with_metric_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "TESTKEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [
                    { "dt": 1_756_300_800, "main": {
                        "temp": 21.3, "temp_min": 20.1, "temp_max": 22.4,
                        "pressure": 1006, "humidity": 74 } },
                    { "dt": 1_756_311_600, "main": {
                        "temp": 24.0, "temp_min": 23.0, "temp_max": 25.5,
                        "pressure": 1004, "humidity": 61 } },
                ]
            })))
            .mount(&server)
            .await;

        let samples =
            client(&server).fetch(Coord { lat: 18.52, lon: 73.85 }).await.unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples[0],
            RawSample {
                timestamp: 1_756_300_800,
                min_temp: 20.1,
                max_temp: 22.4,
                pressure: 1006,
                humidity: 74,
            }
        );
    }

    #[tokio::test]
    async fn fetch_swallows_non_success_status_into_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "cod": 401, "message": "Invalid API key"
            })))
            .mount(&server)
            .await;

        let samples =
            client(&server).fetch(Coord { lat: 18.52, lon: 73.85 }).await.unwrap();
        assert!(samples.is_empty());
    }

    #[tokio::test]
    async fn fetch_rejects_malformed_payload_as_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "list": [ { "dt": "not-a-number", "main": {} } ]
            })))
            .mount(&server)
            .await;

        let err =
            client(&server).fetch(Coord { lat: 18.52, lon: 73.85 }).await.unwrap_err();
        assert!(matches!(err, ForecastError::Parse(_)));
    }
}

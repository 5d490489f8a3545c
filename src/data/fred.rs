//! FRED API integration for monthly indicator series.

use chrono::NaiveDate;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::data::resample::to_monthly;
use crate::domain::{ObservationSeries, UnitMode};
use crate::error::{AppError, FetchError};

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Anything that can produce one monthly series per identifier.
///
/// The reload pipeline only talks to this trait, so it can be driven by canned
/// data as easily as by the live API.
pub trait SeriesSource {
    /// Fetch `series_id` expressed in `unit_mode`, bounded by `observation_end`.
    fn fetch(
        &self,
        series_id: &str,
        unit_mode: UnitMode,
        observation_end: NaiveDate,
    ) -> Result<ObservationSeries, FetchError>;
}

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::new(2, "Missing FRED_API_KEY in environment (.env)."))?;
        if api_key.trim().is_empty() {
            return Err(AppError::new(2, "FRED_API_KEY is empty."));
        }
        Ok(Self::new(api_key.trim()))
    }
}

impl FredClient {
    /// `series/observations` request: ascending order, bounded by `observation_end`.
    fn observations_request(
        &self,
        series_id: &str,
        unit_mode: UnitMode,
        observation_end: NaiveDate,
    ) -> RequestBuilder {
        let end = observation_end.format("%Y-%m-%d").to_string();
        self.client.get(BASE_URL).query(&[
            ("series_id", series_id),
            ("api_key", self.api_key.as_str()),
            ("file_type", "json"),
            ("units", unit_mode.fred_units()),
            ("sort_order", "asc"),
            ("observation_end", end.as_str()),
        ])
    }
}

impl SeriesSource for FredClient {
    fn fetch(
        &self,
        series_id: &str,
        unit_mode: UnitMode,
        observation_end: NaiveDate,
    ) -> Result<ObservationSeries, FetchError> {
        let series_id = series_id.trim();
        if series_id.is_empty() {
            return Err(FetchError::InvalidIdentifier);
        }

        debug!(
            series_id,
            units = unit_mode.fred_units(),
            observation_end = %observation_end,
            "requesting observations"
        );

        let resp = self
            .observations_request(series_id, unit_mode, observation_end)
            .send()
            // The request URL carries the API key; keep it out of messages.
            .map_err(|e| FetchError::Request {
                series_id: series_id.to_string(),
                reason: e.without_url().to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                series_id: series_id.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body: ObservationsResponse = resp.json().map_err(|e| FetchError::Decode {
            series_id: series_id.to_string(),
            reason: e.without_url().to_string(),
        })?;

        observations_to_series(series_id, &body.observations)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObservationsResponse {
    #[serde(default)]
    pub(crate) observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Observation {
    date: String,
    value: String,
}

/// Parse raw observations and normalize them to one point per month.
pub(crate) fn observations_to_series(
    series_id: &str,
    observations: &[Observation],
) -> Result<ObservationSeries, FetchError> {
    let mut out = Vec::with_capacity(observations.len());
    for obs in observations {
        let value = match parse_value(&obs.value) {
            Some(v) => v,
            None => continue,
        };
        let date = NaiveDate::parse_from_str(obs.date.trim(), "%Y-%m-%d").map_err(|_| {
            FetchError::InvalidDate {
                series_id: series_id.to_string(),
                date: obs.date.clone(),
            }
        })?;
        out.push((date, value));
    }

    let series = to_monthly(&out);
    debug!(series_id, raw = observations.len(), valid = out.len(), months = series.len(), "resampled");

    if series.is_empty() {
        return Err(FetchError::Empty {
            series_id: series_id.to_string(),
        });
    }
    Ok(series)
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::domain::Month;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> ObservationsResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn missing_values_are_dropped() {
        let body = parse(json!({
            "observations": [
                { "date": "2024-01-01", "value": "101.5" },
                { "date": "2024-02-01", "value": "." },
                { "date": "2024-03-01", "value": "abc" },
                { "date": "2024-04-01", "value": "NaN" },
                { "date": "2024-05-01", "value": "104.0" }
            ]
        }));
        let series = observations_to_series("TEST", &body.observations).unwrap();
        let jan = Month::new(2024, 1).unwrap();
        assert_eq!(series.get(jan), Some(101.5));
        // Feb-Apr are bridged from January; May is its own value.
        assert_eq!(series.get(Month::new(2024, 4).unwrap()), Some(101.5));
        assert_eq!(series.latest(), Some((Month::new(2024, 5).unwrap(), 104.0)));
    }

    #[test]
    fn weekly_points_collapse_to_month_end_value() {
        let body = parse(json!({
            "observations": [
                { "date": "2024-01-06", "value": "1.0" },
                { "date": "2024-01-13", "value": "2.0" },
                { "date": "2024-01-20", "value": "3.0" },
                { "date": "2024-02-03", "value": "4.0" }
            ]
        }));
        let series = observations_to_series("WEEKLY", &body.observations).unwrap();
        assert_eq!(series.values(), vec![3.0, 4.0]);
    }

    #[test]
    fn all_missing_is_empty_error() {
        let body = parse(json!({
            "observations": [ { "date": "2024-01-01", "value": "." } ]
        }));
        let err = observations_to_series("GONE", &body.observations).unwrap_err();
        assert_eq!(err, FetchError::Empty { series_id: "GONE".to_string() });

        let body = parse(json!({ "error_code": 400 }));
        assert!(observations_to_series("GONE", &body.observations).is_err());
    }

    #[test]
    fn bad_date_is_reported() {
        let body = parse(json!({
            "observations": [ { "date": "01/02/2024", "value": "1.0" } ]
        }));
        let err = observations_to_series("BAD", &body.observations).unwrap_err();
        assert!(matches!(err, FetchError::InvalidDate { .. }));
    }

    fn query(client: &FredClient, unit_mode: UnitMode) -> HashMap<String, String> {
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let request = client.observations_request("PCE", unit_mode, end).build().unwrap();
        assert_eq!(request.url().path(), "/fred/series/observations");
        request.url().query_pairs().into_owned().collect()
    }

    #[test]
    fn request_carries_units_order_and_end_date() {
        let client = FredClient::new("secret");

        let level = query(&client, UnitMode::Level);
        assert_eq!(level["series_id"], "PCE");
        assert_eq!(level["api_key"], "secret");
        assert_eq!(level["file_type"], "json");
        assert_eq!(level["units"], "lin");
        assert_eq!(level["sort_order"], "asc");
        assert_eq!(level["observation_end"], "2024-06-30");

        let yoy = query(&client, UnitMode::YearOverYear);
        assert_eq!(yoy["units"], "pc1");
        assert_eq!(yoy["observation_end"], "2024-06-30");
    }

    #[test]
    fn empty_identifier_is_rejected_without_request() {
        let client = FredClient::new("key");
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let err = client.fetch("  ", UnitMode::Level, end).unwrap_err();
        assert_eq!(err, FetchError::InvalidIdentifier);
    }
}

//! FRED API integration for the dashboard's indicator series.

use chrono::NaiveDate;
use reqwest::blocking::Client;

use crate::error::AppError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const OBS_LIMIT: usize = 10000;

/// FRED series ID for the auxiliary market-index overlay.
pub const AUX_INDEX_SERIES: &str = "NASDAQCOM";

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("FRED_API_KEY")
            .map_err(|_| AppError::usage("Missing FRED_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch one series' observations as a raw JSON payload.
    ///
    /// The payload is returned unvalidated; shape checking belongs to the
    /// parse boundary so that malformed responses are classified there and
    /// answered with fallback data.
    pub fn fetch_payload(
        &self,
        series_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<serde_json::Value, AppError> {
        let mut req = self.client.get(BASE_URL).query(&[
            ("series_id", series_id),
            ("api_key", &self.api_key),
            ("file_type", "json"),
            ("sort_order", "asc"),
            ("limit", &OBS_LIMIT.to_string()),
        ]);

        if let Some(date) = start {
            req = req.query(&[("observation_start", &date.to_string())]);
        }
        if let Some(date) = end {
            req = req.query(&[("observation_end", &date.to_string())]);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::data(format!("FRED request for {series_id} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "FRED request for {series_id} failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| AppError::data(format!("Failed to read FRED response for {series_id}: {e}")))
    }
}

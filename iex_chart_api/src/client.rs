//! HTTP client for the IEX chart endpoint.

use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::{
    types::ChartRecord,
    window::{filter_records, TimeWindow},
    Error,
};

/// Production API root; the version segment is part of the base.
pub const DEFAULT_BASE_URL: &str = "https://api.iextrading.com/1.0";

/// `chrono` format of the `date` field in chart records.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// The only history range requested from the chart endpoint.
const CHART_RANGE: &str = "2y";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the IEX stock chart API.
///
/// Holds configuration only. Each fetch builds a fresh `reqwest::Client`
/// with the configured timeout and issues exactly one GET, so calls share
/// no state and may run concurrently.
#[derive(Debug, Clone)]
pub struct Client {
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
    /// Format used to parse each record's `date`.
    date_format: String,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production IEX API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the request deadline (30 seconds by default).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the `chrono` format used to parse record dates.
    pub fn with_date_format(mut self, date_format: &str) -> Self {
        self.date_format = date_format.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds `<base>/stock/<symbol>/chart/2y`, percent-encoding the symbol as a single path segment.
    pub fn chart_url(&self, symbol: &str) -> Result<Url, Error> {
        let symbol = validate_symbol(symbol)?;
        let mut url = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL '{}': {}", self.base_api_url, e);
            Error::InvalidUrl(format!("{}: {}", self.base_api_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL '{}' cannot carry a path", self.base_api_url);
                Error::InvalidUrl(format!("{}: cannot be a base", self.base_api_url))
            })?
            .pop_if_empty()
            .extend(["stock", symbol, "chart", CHART_RANGE]);
        Ok(url)
    }

    /// Fetches the full two-year chart for `symbol` in upstream order.
    pub async fn fetch_chart(&self, symbol: &str) -> Result<Vec<ChartRecord>, Error> {
        let url = self.chart_url(symbol)?;
        tracing::debug!("Fetching chart from {}", url);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Fetch(e)
            })?;
        let resp = client.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to get chart for {}: {}", symbol, e);
            Error::Fetch(e)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Fetch(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let records = serde_json::from_str::<Vec<ChartRecord>>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse chart: {} | body: {}", e, snippet);
            Error::Parse(e)
        })?;
        tracing::debug!("Fetched {} chart records for {}", records.len(), symbol);

        Ok(records)
    }

    /// Fetches the chart for `symbol` and keeps the records whose end-of-day
    /// (23:59:59 UTC) lies strictly between `start_millis` and `end_millis`.
    ///
    /// Returns an empty vector without a request when `start_millis >= end_millis`.
    /// Only the last two years are ever available; earlier bounds simply match nothing.
    pub async fn fetch_records_by_millis(
        &self,
        symbol: &str,
        start_millis: i64,
        end_millis: i64,
    ) -> Result<Vec<ChartRecord>, Error> {
        validate_symbol(symbol)?;
        let window = TimeWindow::new(start_millis, end_millis);
        if window.is_empty() {
            tracing::debug!(
                "Empty window [{}, {}) for {}, skipping request",
                start_millis,
                end_millis,
                symbol
            );
            return Ok(Vec::new());
        }

        let records = self.fetch_chart(symbol).await?;
        let total = records.len();
        let kept = filter_records(records, window, &self.date_format)?;
        tracing::debug!("Kept {} of {} records for {}", kept.len(), total, symbol);
        Ok(kept)
    }

    /// Same as [`Client::fetch_records_by_millis`] with the bounds given as UTC instants.
    pub async fn fetch_records(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ChartRecord>, Error> {
        self.fetch_records_by_millis(symbol, start.timestamp_millis(), end.timestamp_millis())
            .await
    }
}

fn validate_symbol(symbol: &str) -> Result<&str, Error> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        tracing::error!("Refusing to fetch chart for empty symbol");
        return Err(Error::InvalidSymbol(symbol.to_string()));
    }
    // `PathSegmentsMut` drops dot segments instead of encoding them.
    if trimmed == "." || trimmed == ".." {
        tracing::error!("Refusing to fetch chart for dot-segment symbol '{}'", trimmed);
        return Err(Error::InvalidSymbol(symbol.to_string()));
    }
    Ok(trimmed)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

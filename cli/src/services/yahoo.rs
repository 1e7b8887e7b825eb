use crate::models::{CompanyProfile, FetchRequest, PricePoint, PriceSeries, Symbol};
use crate::services::provider::{MarketDataError, MarketDataProvider};
use crate::utils::{log_fetch, Logger, Timer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const MAX_RETRIES: u32 = 5;

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub rate_limit_per_minute: u32,
    pub random_agent: bool,
    /// Page that sets the session cookie the crumb is tied to.
    pub cookie_url: String,
    /// First retry delay; doubles per attempt, plus up to one unit of jitter.
    pub retry_base_delay: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            rate_limit_per_minute: 60,
            random_agent: true,
            cookie_url: COOKIE_URL.to_string(),
            retry_base_delay: Duration::from_secs(1),
        }
    }
}

/// Yahoo Finance chart and quote-summary client.
pub struct YahooClient {
    client: Client,
    config: YahooConfig,
    request_timestamps: Mutex<Vec<Instant>>,
    crumb: Mutex<Option<String>>,
    logger: Logger,
}

impl YahooClient {
    pub fn new(config: YahooConfig) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            config,
            request_timestamps: Mutex::new(Vec::new()),
            crumb: Mutex::new(None),
            logger: Logger::new("YAHOO"),
        })
    }

    pub fn with_defaults() -> Result<Self, MarketDataError> {
        Self::new(YahooConfig::default())
    }

    fn user_agent(&self) -> &'static str {
        if self.config.random_agent {
            USER_AGENTS
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or(USER_AGENTS[0])
        } else {
            USER_AGENTS[0]
        }
    }

    async fn enforce_rate_limit(&self) {
        if self.config.rate_limit_per_minute == 0 {
            return;
        }
        let window = Duration::from_secs(60);
        let mut timestamps = self.request_timestamps.lock().await;
        let now = Instant::now();

        timestamps.retain(|&t| now.duration_since(t) < window);

        if timestamps.len() >= self.config.rate_limit_per_minute as usize {
            if let Some(&oldest) = timestamps.first() {
                let wait = window.saturating_sub(now.duration_since(oldest));
                if !wait.is_zero() {
                    self.logger
                        .debug_with_data("Rate limit reached, waiting", wait);
                    sleep(wait + Duration::from_millis(100)).await;
                }
            }
        }

        timestamps.push(Instant::now());
    }

    /// GET with retries on 429, 5xx and transport errors. Other client errors are final.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, MarketDataError> {
        for attempt in 0..MAX_RETRIES {
            self.enforce_rate_limit().await;

            if attempt > 0 {
                let factor = 2.0_f64.powi(attempt as i32 - 1) + rand::random::<f64>();
                let delay = self.config.retry_base_delay.mul_f64(factor);
                sleep(delay.min(Duration::from_secs(60))).await;
            }

            let response = self
                .client
                .get(url)
                .query(query)
                .header("Accept", "application/json, text/plain, */*")
                .header("Accept-Language", "en-US,en;q=0.9")
                .header("User-Agent", self.user_agent())
                .send()
                .await;

            let resp = match response {
                Ok(resp) => resp,
                Err(e) => {
                    self.logger.warn_with_error(&format!("Request to {} failed (attempt {})", url, attempt + 1), &e);
                    continue;
                }
            };

            let status = resp.status();
            if status.is_success() {
                match resp.json::<Value>().await {
                    Ok(data) => return Ok(data),
                    Err(e) => {
                        self.logger.warn_with_error("Unreadable response body", &e);
                        continue;
                    }
                }
            }

            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                self.logger.warn(&format!("{} returned {}, retrying", url, status));
                continue;
            }

            let body = resp.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), body));
        }

        Err(MarketDataError::RetriesExhausted { attempts: MAX_RETRIES })
    }

    async fn crumb(&self, refresh: bool) -> Result<String, MarketDataError> {
        let mut cached = self.crumb.lock().await;
        if !refresh {
            if let Some(crumb) = cached.as_ref() {
                return Ok(crumb.clone());
            }
        }

        // Only the session cookie matters; the status of this page does not.
        let _ = self
            .client
            .get(&self.config.cookie_url)
            .header("User-Agent", self.user_agent())
            .send()
            .await;

        let crumb = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.config.base_url))
            .header("User-Agent", self.user_agent())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let crumb = crumb.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(MarketDataError::InvalidResponse("could not obtain crumb".to_string()));
        }

        self.logger.debug("Obtained new crumb");
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn quote_summary(&self, symbol: &Symbol, crumb: String) -> Result<Value, MarketDataError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.config.base_url, symbol);
        let query = [
            ("modules", "assetProfile,price".to_string()),
            ("crumb", crumb),
        ];
        self.get_json(&url, &query).await
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn history(&self, request: &FetchRequest) -> Result<PriceSeries, MarketDataError> {
        let url = format!("{}/v8/finance/chart/{}", self.config.base_url, request.symbol);
        let query = [
            ("interval", request.interval.provider_code().to_string()),
            ("range", request.lookback.as_str().to_string()),
            ("includePrePost", "false".to_string()),
        ];

        log_fetch(&format!(
            "{} history interval={} range={}",
            request.symbol, request.interval, request.lookback
        ));
        let timer = Timer::start(&format!("{} history fetch", request.symbol));

        let data = match self.get_json(&url, &query).await {
            Ok(data) => data,
            // Unknown symbols are reported as 404 with a "Not Found" error object
            Err(MarketDataError::Provider { code, .. }) if code.eq_ignore_ascii_case("not found") => {
                self.logger.warn(&format!("No data for {}", request.symbol));
                return Ok(PriceSeries::empty());
            }
            Err(e) => return Err(e),
        };

        let series = parse_chart_response(data)?;
        let series = match request.interval.resample_secs() {
            Some(bucket) => series.resample(bucket),
            None => series,
        };

        timer.log_elapsed();
        log_fetch(&format!("{}: {} bars", request.symbol, series.len()));
        Ok(series)
    }

    async fn company_profile(&self, symbol: &Symbol) -> Result<CompanyProfile, MarketDataError> {
        let crumb = self.crumb(false).await?;
        let data = match self.quote_summary(symbol, crumb).await {
            Err(e) if e.is_unauthorized() => {
                self.logger.info("Crumb rejected, refreshing");
                let crumb = self.crumb(true).await?;
                self.quote_summary(symbol, crumb).await?
            }
            other => other?,
        };

        parse_quote_summary(data, symbol)
    }
}

fn error_from_body(status: u16, body: String) -> MarketDataError {
    let error = serde_json::from_str::<Value>(&body).ok().and_then(|v| {
        ["chart", "quoteSummary", "finance"]
            .iter()
            .find_map(|key| v.get(*key).and_then(|inner| inner.get("error")).cloned())
            .filter(|e| !e.is_null())
    });

    match error {
        Some(err) => MarketDataError::Provider {
            code: err["code"].as_str().unwrap_or("unknown").to_string(),
            description: err["description"].as_str().unwrap_or_default().to_string(),
        },
        None => MarketDataError::Status { status, body },
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ProviderErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Converts a `/v8/finance/chart` payload into a series.
///
/// Bars with a missing price are dropped; a missing volume counts as zero.
pub fn parse_chart_response(data: Value) -> Result<PriceSeries, MarketDataError> {
    let envelope: ChartEnvelope = serde_json::from_value(data)?;

    if let Some(err) = envelope.chart.error {
        return Err(MarketDataError::Provider {
            code: err.code,
            description: err.description,
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty());
    };
    if result.timestamp.is_empty() {
        return Ok(PriceSeries::empty());
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let length = result.timestamp.len();
    if [quote.open.len(), quote.high.len(), quote.low.len(), quote.close.len()]
        .iter()
        .any(|&len| len != length)
    {
        return Err(MarketDataError::InvalidResponse("Inconsistent array lengths".to_string()));
    }

    let mut points = Vec::with_capacity(length);
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) =
            (quote.open[i], quote.high[i], quote.low[i], quote.close[i])
        else {
            continue;
        };

        let time = DateTime::<Utc>::from_timestamp(ts, 0).ok_or_else(|| {
            MarketDataError::InvalidResponse(format!("Cannot convert timestamp {} at index {}", ts, i))
        })?;
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0.0).max(0.0) as u64;

        points.push(PricePoint::new(time, open, high, low, close, volume));
    }

    Ok(PriceSeries::from_unsorted(points)?)
}

/// Extracts the company fields out of a `/v10/finance/quoteSummary` payload.
pub fn parse_quote_summary(data: Value, symbol: &Symbol) -> Result<CompanyProfile, MarketDataError> {
    let summary = data
        .get("quoteSummary")
        .ok_or_else(|| MarketDataError::InvalidResponse("missing quoteSummary".to_string()))?;

    if let Some(err) = summary.get("error").filter(|e| !e.is_null()) {
        return Err(MarketDataError::Provider {
            code: err["code"].as_str().unwrap_or("unknown").to_string(),
            description: err["description"].as_str().unwrap_or_default().to_string(),
        });
    }

    let mut profile = CompanyProfile::unknown(symbol.as_str());
    let Some(result) = summary.get("result").and_then(|r| r.get(0)) else {
        return Ok(profile);
    };

    let text = |section: &str, key: &str| {
        result
            .get(section)
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    profile.long_name = text("price", "longName").or_else(|| text("price", "shortName"));
    profile.currency = text("price", "currency");
    profile.exchange = text("price", "exchangeName");
    profile.country = text("assetProfile", "country");
    profile.sector = text("assetProfile", "sector");
    profile.industry = text("assetProfile", "industry");
    profile.website = text("assetProfile", "website");

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex as StdMutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    type Hits = Arc<StdMutex<HashMap<String, usize>>>;

    /// Local HTTP/1.1 server answering one request per connection.
    /// `route` gets the request path and how many times that path has been hit.
    async fn serve<F>(route: F) -> (String, Hits)
    where
        F: Fn(&str, usize) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits: Hits = Arc::new(StdMutex::new(HashMap::new()));
        let route = Arc::new(route);
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let route = route.clone();
                let counter = counter.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }

                    let head = String::from_utf8_lossy(&buf).to_string();
                    let target = head.split_whitespace().nth(1).unwrap_or("/");
                    let path = target.split('?').next().unwrap_or("/").to_string();
                    let nth = {
                        let mut hits = counter.lock().unwrap();
                        let n = hits.entry(path.clone()).or_insert(0);
                        *n += 1;
                        *n
                    };

                    let (status, body) = (*route)(&path, nth);
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        (format!("http://{}", addr), hits)
    }

    fn hit_count(hits: &Hits, path: &str) -> usize {
        hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    fn client_for(base_url: &str) -> YahooClient {
        YahooClient::new(YahooConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
            rate_limit_per_minute: 0,
            random_agent: false,
            cookie_url: format!("{}/cookie", base_url),
            retry_base_delay: Duration::ZERO,
        })
        .unwrap()
    }

    fn daily(symbol: &str) -> FetchRequest {
        FetchRequest::parse(symbol, Some("1d"), Some("1mo")).unwrap()
    }

    fn two_bar_chart() -> String {
        json!({
            "chart": {
                "result": [{
                    "timestamp": [1_700_000_000, 1_700_086_400],
                    "indicators": {"quote": [{
                        "open": [1.0, 2.0], "high": [1.5, 2.5], "low": [0.5, 1.5],
                        "close": [1.2, 2.2], "volume": [10, 20]
                    }]}
                }],
                "error": null
            }
        })
        .to_string()
    }

    const CHART_PATH: &str = "/v8/finance/chart/AAPL";

    #[tokio::test]
    async fn test_server_errors_retry_until_exhausted() {
        let (base, hits) = serve(|_, _| (503, "{}".to_string())).await;
        let result = client_for(&base).history(&daily("AAPL")).await;

        assert!(matches!(result, Err(MarketDataError::RetriesExhausted { attempts: 5 })));
        assert_eq!(hit_count(&hits, CHART_PATH), 5);
    }

    #[tokio::test]
    async fn test_throttled_request_succeeds_on_retry() {
        let (base, hits) = serve(|_, n| {
            if n == 1 {
                (429, "Too Many Requests".to_string())
            } else {
                (200, two_bar_chart())
            }
        })
        .await;
        let series = client_for(&base).history(&daily("AAPL")).await.unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(hit_count(&hits, CHART_PATH), 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let body = json!({"chart": {"result": null, "error": {"code": "Bad Request", "description": "Invalid input"}}});
        let (base, hits) = serve(move |_, _| (400, body.to_string())).await;
        let result = client_for(&base).history(&daily("AAPL")).await;

        match result {
            Err(MarketDataError::Provider { code, .. }) => assert_eq!(code, "Bad Request"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(hit_count(&hits, CHART_PATH), 1);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_empty_series() {
        let body = json!({"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}});
        let (base, hits) = serve(move |_, _| (404, body.to_string())).await;
        let series = client_for(&base).history(&daily("NOPE")).await.unwrap();

        assert!(series.is_empty());
        assert_eq!(hit_count(&hits, "/v8/finance/chart/NOPE"), 1);
    }

    #[tokio::test]
    async fn test_connection_refused_is_retried() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let result = client_for(&base).history(&daily("AAPL")).await;
        assert!(matches!(result, Err(MarketDataError::RetriesExhausted { attempts: 5 })));
    }

    #[tokio::test]
    async fn test_rejected_crumb_is_refreshed_once() {
        let summary = json!({
            "quoteSummary": {
                "result": [{"price": {"longName": "Apple Inc."}, "assetProfile": {"sector": "Technology"}}],
                "error": null
            }
        });
        let (base, hits) = serve(move |path, n| match path {
            "/v1/test/getcrumb" => (200, format!("crumb{}", n)),
            "/v10/finance/quoteSummary/AAPL" if n == 1 => (401, "Unauthorized".to_string()),
            "/v10/finance/quoteSummary/AAPL" => (200, summary.to_string()),
            _ => (200, String::new()),
        })
        .await;

        let client = client_for(&base);
        let profile = client
            .company_profile(&Symbol::parse("AAPL").unwrap())
            .await
            .unwrap();

        assert_eq!(profile.name(), "Apple Inc.");
        assert_eq!(profile.sector(), "Technology");
        assert_eq!(hit_count(&hits, "/v1/test/getcrumb"), 2);
        assert_eq!(hit_count(&hits, "/v10/finance/quoteSummary/AAPL"), 2);
        assert_eq!(client.crumb.lock().await.as_deref(), Some("crumb2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_for_the_window() {
        let client = YahooClient::new(YahooConfig {
            rate_limit_per_minute: 2,
            ..YahooConfig::default()
        })
        .unwrap();
        let start = Instant::now();

        client.enforce_rate_limit().await;
        client.enforce_rate_limit().await;
        assert!(start.elapsed() < Duration::from_secs(1));

        // Third request in the same minute waits for the oldest to age out
        client.enforce_rate_limit().await;
        assert!(start.elapsed() >= Duration::from_secs(60));

        // Both early timestamps have expired, so this one goes straight through
        let before = start.elapsed();
        client.enforce_rate_limit().await;
        assert_eq!(start.elapsed(), before);
    }

    #[tokio::test]
    async fn test_yahoo_client_creation() {
        assert!(YahooClient::with_defaults().is_ok());
    }

    #[test]
    fn test_parse_chart_response_drops_null_bars() {
        let data = json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "timestamp": [1_700_000_000, 1_700_086_400, 1_700_172_800],
                    "indicators": {"quote": [{
                        "open":   [10.0, null, 12.0],
                        "high":   [11.0, null, 13.5],
                        "low":    [9.5,  null, 11.0],
                        "close":  [10.5, null, 13.0],
                        "volume": [1000, null, null]
                    }]}
                }],
                "error": null
            }
        });

        let series = parse_chart_response(data).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].close, 10.5);
        assert_eq!(series.points()[0].volume, 1000);
        assert_eq!(series.points()[1].open, 12.0);
        assert_eq!(series.points()[1].volume, 0);
        assert_eq!(series.points()[1].time.timestamp(), 1_700_172_800);
    }

    #[test]
    fn test_parse_chart_response_without_timestamps_is_empty() {
        let data = json!({
            "chart": {
                "result": [{"meta": {}, "indicators": {"quote": [{}]}}],
                "error": null
            }
        });
        assert!(parse_chart_response(data).unwrap().is_empty());
    }

    #[test]
    fn test_parse_chart_response_error_object() {
        let data = json!({
            "chart": {
                "result": null,
                "error": {"code": "Bad Request", "description": "Invalid input - interval=7m is not supported"}
            }
        });
        match parse_chart_response(data) {
            Err(MarketDataError::Provider { code, description }) => {
                assert_eq!(code, "Bad Request");
                assert!(description.contains("interval"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_response_rejects_ragged_columns() {
        let data = json!({
            "chart": {
                "result": [{
                    "timestamp": [1, 2],
                    "indicators": {"quote": [{
                        "open": [1.0], "high": [1.0, 2.0], "low": [1.0, 2.0], "close": [1.0, 2.0]
                    }]}
                }],
                "error": null
            }
        });
        assert!(matches!(
            parse_chart_response(data),
            Err(MarketDataError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_error_from_body_maps_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        match error_from_body(404, body.to_string()) {
            MarketDataError::Provider { code, .. } => assert_eq!(code, "Not Found"),
            other => panic!("unexpected error: {:?}", other),
        }

        let plain = error_from_body(401, "Unauthorized".to_string());
        assert!(plain.is_unauthorized());
    }

    #[test]
    fn test_parse_quote_summary() {
        let symbol = Symbol::parse("aapl").unwrap();
        let data = json!({
            "quoteSummary": {
                "result": [{
                    "assetProfile": {
                        "country": "United States",
                        "sector": "Technology",
                        "industry": "Consumer Electronics",
                        "website": "https://www.apple.com"
                    },
                    "price": {"longName": "Apple Inc.", "currency": "USD", "exchangeName": "NasdaqGS"}
                }],
                "error": null
            }
        });

        let profile = parse_quote_summary(data, &symbol).unwrap();
        assert_eq!(profile.symbol, "AAPL");
        assert_eq!(profile.name(), "Apple Inc.");
        assert_eq!(profile.country(), "United States");
        assert_eq!(profile.sector(), "Technology");
        assert_eq!(profile.industry(), "Consumer Electronics");
        assert_eq!(profile.exchange(), "NasdaqGS");
    }

    #[test]
    fn test_parse_quote_summary_for_index_has_no_sector() {
        let symbol = Symbol::parse("^GSPC").unwrap();
        let data = json!({
            "quoteSummary": {
                "result": [{"price": {"shortName": "S&P 500"}}],
                "error": null
            }
        });
        let profile = parse_quote_summary(data, &symbol).unwrap();
        assert_eq!(profile.name(), "S&P 500");
        assert_eq!(profile.sector(), "N/A");
    }
}

//! Blocking Sheets API client with retry and error classification.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Url;

use crate::values::rows_from_values;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";
pub const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = concat!("hexlink/", env!("CARGO_PKG_VERSION"));

/// Error type for Sheets operations.
#[derive(Debug)]
pub enum SheetsError {
    /// HTTP client could not be built or the URL is invalid
    Client(String),
    /// 401/403: key missing, invalid, or without access to the sheet
    Auth(u16, String),
    /// 400: the request itself was rejected (bad range, bad id)
    Rejected(u16, String),
    /// Any other non-retryable HTTP error
    Http(u16, String),
    /// Still 429 after all retries
    RateLimited(u32),
    /// 5xx or transport failure after all retries
    Upstream(String),
    /// Response body was not the expected JSON
    Parse(String),
}

impl std::fmt::Display for SheetsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsError::Client(msg) => write!(f, "client error: {}", msg),
            SheetsError::Auth(code, msg) => write!(f, "sheets auth failed ({}): {}", code, msg),
            SheetsError::Rejected(code, msg) => {
                write!(f, "sheets request rejected ({}): {}", code, msg)
            }
            SheetsError::Http(code, msg) => write!(f, "sheets error ({}): {}", code, msg),
            SheetsError::RateLimited(attempts) => {
                write!(f, "sheets rate limited after {} attempts", attempts)
            }
            SheetsError::Upstream(msg) => write!(f, "sheets upstream error: {}", msg),
            SheetsError::Parse(msg) => write!(f, "failed to parse sheets response: {}", msg),
        }
    }
}

impl std::error::Error for SheetsError {}

/// Sheets values client (blocking).
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
    backoff: Duration,
}

impl SheetsClient {
    pub fn new(api_key: &str) -> Result<Self, SheetsError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SheetsError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.to_string(),
            backoff: Duration::from_secs(1),
        })
    }

    /// Point the client at another host (mock servers, proxies).
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// First retry delay; doubled on every further retry.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// `{api_base}/v4/spreadsheets/{sheet_id}/values/{table}?key=...`, with
    /// the path segments percent-encoded.
    pub fn values_url(&self, sheet_id: &str, table: &str) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SheetsError::Client(format!("invalid api base {}: {}", self.api_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::Client(format!("invalid api base {}", self.api_base)))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", sheet_id, "values", table]);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    /// Fetch a whole range as rows of text cells.
    pub fn fetch_values(&self, sheet_id: &str, table: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.values_url(sheet_id, table)?;
        debug!("fetching sheet {} range {}", sheet_id, table);
        let body = self.get_with_retry(url)?;
        let rows = rows_from_values(&body)?;
        debug!("fetched {} rows", rows.len());
        Ok(rows)
    }

    fn get_with_retry(&self, url: Url) -> Result<serde_json::Value, SheetsError> {
        let mut backoff = self.backoff;

        for attempt in 0..=MAX_RETRIES {
            match self.http.get(url.clone()).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();

                    if status == 401 || status == 403 {
                        return Err(SheetsError::Auth(status, error_message(resp, status)));
                    }
                    if status == 400 {
                        return Err(SheetsError::Rejected(status, error_message(resp, status)));
                    }
                    if (400..500).contains(&status) && status != 429 {
                        return Err(SheetsError::Http(status, error_message(resp, status)));
                    }

                    // Retryable: 429, 5xx
                    if status == 429 || status >= 500 {
                        if attempt == MAX_RETRIES {
                            return Err(if status == 429 {
                                SheetsError::RateLimited(MAX_RETRIES + 1)
                            } else {
                                SheetsError::Upstream(format!(
                                    "HTTP {} after {} attempts",
                                    status,
                                    MAX_RETRIES + 1
                                ))
                            });
                        }

                        let wait = if status == 429 {
                            resp.headers()
                                .get("retry-after")
                                .and_then(|v| v.to_str().ok())
                                .and_then(|v| v.parse::<u64>().ok())
                                .map(Duration::from_secs)
                                .unwrap_or(backoff)
                        } else {
                            backoff
                        };

                        warn!(
                            "retry {}/{} in {:?} (HTTP {})",
                            attempt + 1,
                            MAX_RETRIES,
                            wait,
                            status
                        );
                        thread::sleep(wait);
                        backoff *= 2;
                        continue;
                    }

                    let text = resp
                        .text()
                        .map_err(|e| SheetsError::Upstream(format!("failed to read body: {}", e)))?;
                    let trimmed = text.trim_start_matches('\u{feff}');
                    return serde_json::from_str(trimmed).map_err(|e| {
                        SheetsError::Parse(format!(
                            "{} (body: {})",
                            e,
                            trimmed.chars().take(200).collect::<String>()
                        ))
                    });
                }
                Err(e) => {
                    if attempt == MAX_RETRIES {
                        return Err(SheetsError::Upstream(format!(
                            "{} after {} attempts",
                            e,
                            MAX_RETRIES + 1
                        )));
                    }
                    warn!("retry {}/{} in {:?} ({})", attempt + 1, MAX_RETRIES, backoff, e);
                    thread::sleep(backoff);
                    backoff *= 2;
                }
            }
        }

        Err(SheetsError::Upstream("retries exhausted".into()))
    }
}

/// Google APIs report errors as `{"error": {"code", "message", "status"}}`.
fn error_message(resp: reqwest::blocking::Response, status: u16) -> String {
    let body: serde_json::Value = resp.json().unwrap_or(serde_json::Value::Null);
    body["error"]["message"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const PATH: &str = "/v4/spreadsheets/sheet123/values/Main";

    fn client(server: &MockServer) -> SheetsClient {
        SheetsClient::new("test-key")
            .unwrap()
            .with_api_base(&server.base_url())
            .with_backoff(Duration::ZERO)
    }

    #[test]
    fn values_url_encodes_segments() {
        let client = SheetsClient::new("k").unwrap().with_api_base("https://example.test/");
        let url = client.values_url("abc", "Sheet 1!A1:I").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/v4/spreadsheets/abc/values/Sheet%201!A1:I?key=k"
        );
    }

    #[test]
    fn fetch_returns_rows() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PATH).query_param("key", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "range": "Main!A1:I3",
                    "values": [
                        ["url", "center", "open"],
                        ["https://t/1", "sun", "", "AAAAAAA"]
                    ]
                }));
        });

        let rows = client(&server).fetch_values("sheet123", "Main").unwrap();
        mock.assert();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][3], "AAAAAAA");
    }

    #[test]
    fn empty_range_has_no_rows() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).json_body(json!({ "range": "Main!A1:Z1000" }));
        });
        assert!(client(&server).fetch_values("sheet123", "Main").unwrap().is_empty());
    }

    #[test]
    fn forbidden_is_auth_error_without_retry() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PATH);
            then.status(403).json_body(json!({
                "error": { "code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED" }
            }));
        });

        let err = client(&server).fetch_values("sheet123", "Main").unwrap_err();
        mock.assert_calls(1);
        match err {
            SheetsError::Auth(403, msg) => assert!(msg.contains("does not have permission")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_range_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PATH);
            then.status(400).json_body(json!({
                "error": { "code": 400, "message": "Unable to parse range: Main" }
            }));
        });
        let err = client(&server).fetch_values("sheet123", "Main").unwrap_err();
        assert!(matches!(err, SheetsError::Rejected(400, _)));
    }

    #[test]
    fn missing_sheet_is_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PATH);
            then.status(404).body("not found");
        });
        let err = client(&server).fetch_values("sheet123", "Main").unwrap_err();
        match err {
            SheetsError::Http(404, msg) => assert_eq!(msg, "HTTP 404"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rate_limit_retries_then_gives_up() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PATH);
            then.status(429)
                .header("retry-after", "0")
                .json_body(json!({ "error": { "message": "Quota exceeded" } }));
        });

        let err = client(&server).fetch_values("sheet123", "Main").unwrap_err();
        mock.assert_calls(4);
        assert!(matches!(err, SheetsError::RateLimited(4)));
    }

    #[test]
    fn server_errors_retry_then_give_up() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path(PATH);
            then.status(503);
        });

        let err = client(&server).fetch_values("sheet123", "Main").unwrap_err();
        mock.assert_calls(4);
        assert!(matches!(err, SheetsError::Upstream(_)));
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).body("<html>oops</html>");
        });
        let err = client(&server).fetch_values("sheet123", "Main").unwrap_err();
        assert!(matches!(err, SheetsError::Parse(_)));
    }
}

//! Workwize public API client (REST, no SDK)
//!
//! [`WorkwizeApi`] is the seam the sync orchestrator depends on;
//! [`HttpWorkwizeClient`] is the reqwest implementation.

pub mod envelope;

use async_trait::async_trait;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use std::time::Duration;

/// Longest upstream body kept in an error
const MAX_ERROR_BODY: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum WorkwizeError {
    #[error("Workwize API returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Workwize API unreachable: {0}")]
    Transport(String),
    #[error("Workwize API request timed out")]
    Timeout,
    #[error("Workwize API returned invalid JSON: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for WorkwizeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WorkwizeError::Timeout
        } else if e.is_decode() {
            WorkwizeError::Decode(e.to_string())
        } else {
            WorkwizeError::Transport(e.to_string())
        }
    }
}

impl From<WorkwizeError> for AppError {
    fn from(e: WorkwizeError) -> Self {
        match e {
            WorkwizeError::Upstream { status, body } => AppError::upstream(status, body),
            WorkwizeError::Transport(msg) => {
                AppError::with_message(ErrorCode::UpstreamUnavailable, msg)
            }
            WorkwizeError::Timeout => AppError::new(ErrorCode::UpstreamTimeout),
            WorkwizeError::Decode(msg) => AppError::with_message(ErrorCode::UpstreamError, msg),
        }
    }
}

/// Read access to the Workwize collections.
///
/// Collection paths are the resource names (`"employees"`, `"assets"`, ...),
/// so fakes only need a path → records mapping.
#[async_trait]
pub trait WorkwizeApi: Send + Sync {
    /// Fetch every page of a collection endpoint (e.g. `"employees"`).
    async fn fetch_collection(&self, path: &str) -> Result<Vec<Value>, WorkwizeError>;

    /// Fetch the address of one employee; `None` when it has none.
    async fn employee_address(&self, employee_id: &str) -> Result<Option<Value>, WorkwizeError>;
}

/// reqwest-backed client for `https://prod-back.goworkwize.com/api/public`
pub struct HttpWorkwizeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_pages: u32,
}

impl HttpWorkwizeClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        max_pages: u32,
    ) -> Result<Self, WorkwizeError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_pages,
        })
    }

    async fn get(&self, path: &str, page: Option<u32>) -> Result<reqwest::Response, WorkwizeError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        Ok(request.send().await?)
    }
}

/// Turn a non-success response into an `Upstream` error with a bounded body.
async fn upstream_error(resp: reqwest::Response) -> WorkwizeError {
    let status = resp.status().as_u16();
    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    WorkwizeError::Upstream { status, body }
}

async fn read_json(resp: reqwest::Response) -> Result<Value, WorkwizeError> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| WorkwizeError::Decode(e.to_string()))
}

#[async_trait]
impl WorkwizeApi for HttpWorkwizeClient {
    async fn fetch_collection(&self, path: &str) -> Result<Vec<Value>, WorkwizeError> {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let resp = self.get(path, Some(page)).await?;
            if !resp.status().is_success() {
                return Err(upstream_error(resp).await);
            }
            let body = read_json(resp).await?;
            let more = envelope::has_next_page(&body, page);
            let batch = envelope::unwrap_records(body);
            let batch_len = batch.len();
            records.extend(batch);

            tracing::debug!(path, page, count = batch_len, "Fetched Workwize page");

            if !more || batch_len == 0 {
                break;
            }
            if page >= self.max_pages {
                tracing::warn!(path, page, "Page cap reached, stopping pagination");
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    async fn employee_address(&self, employee_id: &str) -> Result<Option<Value>, WorkwizeError> {
        let resp = self
            .get(&format!("employees/{employee_id}/addresses"), None)
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(upstream_error(resp).await);
        }
        Ok(envelope::unwrap_single(read_json(resp).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(url: &str, max_pages: u32) -> HttpWorkwizeClient {
        HttpWorkwizeClient::new(url, "test-key", Duration::from_secs(5), max_pages).unwrap()
    }

    #[tokio::test]
    async fn test_single_page_without_metadata() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/warehouses")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .match_header("authorization", "Bearer test-key")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"value":[{"id":"w1","code":"LDW"},{"id":"w2","code":"SYD"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let records = client(&server.url(), 500).fetch_collection("warehouses").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["code"], "LDW");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_follows_last_page() {
        let mut server = Server::new_async().await;
        let page1 = server
            .mock("GET", "/assets")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(
                json!({"data": [{"id": 1}], "meta": {"current_page": 1, "last_page": 2}})
                    .to_string(),
            )
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/assets")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(
                json!({"data": [{"id": 2}], "meta": {"current_page": 2, "last_page": 2}})
                    .to_string(),
            )
            .create_async()
            .await;

        let records = client(&server.url(), 500).fetch_collection("assets").await.unwrap();
        assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
        page1.assert_async().await;
        page2.assert_async().await;
    }

    #[tokio::test]
    async fn test_page_cap_stops_endless_provider() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/orders")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [{"id": 1}], "links": {"next": "more"}}).to_string())
            .expect(3)
            .create_async()
            .await;

        let records = client(&server.url(), 3).fetch_collection("orders").await.unwrap();
        assert_eq!(records.len(), 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_error_carries_status_and_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/employees")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal failure")
            .create_async()
            .await;

        let err = client(&server.url(), 500).fetch_collection("employees").await.unwrap_err();
        match err {
            WorkwizeError::Upstream { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal failure");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_body_truncated() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/products")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("x".repeat(10_000))
            .create_async()
            .await;

        match client(&server.url(), 500).fetch_collection("products").await.unwrap_err() {
            WorkwizeError::Upstream { body, .. } => assert_eq!(body.len(), MAX_ERROR_BODY),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/offices")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client(&server.url(), 500).fetch_collection("offices").await.unwrap_err();
        assert!(matches!(err, WorkwizeError::Decode(_)));
    }

    #[tokio::test]
    async fn test_employee_address_found_and_missing() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/employees/7/addresses")
            .with_status(200)
            .with_body(
                json!({"code": 200, "success": true, "data": {"id": 70, "city": "Leipzig"}})
                    .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/employees/8/addresses")
            .with_status(404)
            .with_body(r#"{"message":"Not found"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/employees/9/addresses")
            .with_status(200)
            .with_body(r#"{"code":200,"success":true,"data":{}}"#)
            .create_async()
            .await;

        let api = client(&server.url(), 500);
        let found = api.employee_address("7").await.unwrap();
        assert_eq!(found.unwrap()["city"], "Leipzig");
        assert!(api.employee_address("8").await.unwrap().is_none());
        assert!(api.employee_address("9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) is closed on test machines
        let api = client("http://127.0.0.1:9", 500);
        let err = api.fetch_collection("employees").await.unwrap_err();
        assert!(matches!(err, WorkwizeError::Transport(_)));
    }

    #[test]
    fn test_error_mapping() {
        let app: AppError = WorkwizeError::Timeout.into();
        assert_eq!(app.code, ErrorCode::UpstreamTimeout);
        let app: AppError = WorkwizeError::Transport("refused".into()).into();
        assert_eq!(app.code, ErrorCode::UpstreamUnavailable);
    }
}

//! GreenBite REST API Client
//!
//! HTTP client for the detection backend: meal detection, leaderboard,
//! emissions trend and health.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{DetectionReport, HealthStatus, LeaderboardEntry, TrendPoint};
use super::error::{ApiError, ApiResult};
use super::DEFAULT_BACKEND_URL;
use crate::capture::CapturedImage;
use crate::session::{DetectionTicket, TicketId};

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Request timeout; `None` leaves the HTTP client default
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// GreenBite backend client
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a meal photo and get its footprint report
    pub async fn detect(&self, image: &CapturedImage) -> ApiResult<DetectionReport> {
        let url = format!("{}/detect", self.base_url);

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.filename.clone())
            .mime_str(&image.mime_type)?;
        let form = Form::new().part("image", part);

        tracing::debug!(
            filename = %image.filename,
            bytes = image.len(),
            "Uploading meal image"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::transport(e, &self.base_url))?;

        self.parse(response).await
    }

    /// Run a session ticket's upload, honoring session aborts
    pub async fn detect_ticket(
        &self,
        ticket: DetectionTicket,
    ) -> (TicketId, ApiResult<DetectionReport>) {
        tracing::debug!(
            ticket = %ticket.id(),
            filename = %ticket.image().filename,
            "Running detection"
        );

        let completed = ticket
            .run(|image| async move { self.detect(&image).await })
            .await;

        (
            completed.id,
            completed.result.unwrap_or(Err(ApiError::Cancelled)),
        )
    }

    /// Users ranked by cumulative CO₂ saved, in backend order
    pub async fn leaderboard(&self) -> ApiResult<Vec<LeaderboardEntry>> {
        let url = format!("{}/leaderboard", self.base_url);
        self.get_json(&url).await
    }

    /// A user's daily emissions, oldest first
    pub async fn trend(&self, user_id: &str) -> ApiResult<Vec<TrendPoint>> {
        self.get_json(&self.trend_url(user_id)).await
    }

    /// Check if the backend is up
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        self.get_json(&url).await
    }

    fn trend_url(&self, user_id: &str) -> String {
        format!("{}/trend/{}", self.base_url, urlencoding::encode(user_id))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::transport(e, &self.base_url))?;

        self.parse(response).await
    }

    async fn parse<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(e, &self.base_url))?;

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DetectionSession;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(ClientConfig::new(server.uri())).unwrap()
    }

    fn report_json() -> serde_json::Value {
        serde_json::json!({
            "detected_items": ["beef burger"],
            "total_co2": 4.12,
            "metaphor": "That's like driving 16.5 km, and a tree would need 68.4 days to absorb it.",
            "swaps": [{
                "original_item": "beef burger",
                "swap_item": "bean burger",
                "co2_saved": 2.8,
                "reasoning": "Beans emit a fraction of beef."
            }],
            "leaderboard_rank": 5
        })
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_urls() {
        let client = ApiClient::new(ClientConfig::new("http://backend:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://backend:8000");
        assert_eq!(client.trend_url("user_1"), "http://backend:8000/trend/user_1");
        assert_eq!(client.trend_url("a/b c"), "http://backend:8000/trend/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_detect_uploads_multipart_image() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/detect"))
            .and(body_string_contains("name=\"image\""))
            .and(body_string_contains("filename=\"capture.jpg\""))
            .and(body_string_contains("image/jpeg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(report_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let report = client
            .detect(&CapturedImage::snapshot(b"not-really-a-jpeg".to_vec()))
            .await
            .unwrap();

        assert_eq!(report.total_co2, 4.12);
        assert_eq!(report.swaps[0].swap_item, "bean burger");
        assert_eq!(report.leaderboard_rank, Some(5));
    }

    #[tokio::test]
    async fn test_detect_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"detail": "Invalid image file"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .detect(&CapturedImage::snapshot(vec![1]))
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("Invalid image file"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/leaderboard"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"oops\": true}"))
            .mount(&server)
            .await;

        let err = client_for(&server).leaderboard().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_backend_down() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(ClientConfig::new(format!("http://{}", addr))).unwrap();
        let err = client.trend("user_1").await.unwrap_err();

        assert!(err.is_backend_down(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_leaderboard_and_trend() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/leaderboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"user_id": "user_1", "user_name": "Aarav", "total_co2_saved": 24.5, "rank": 1},
                {"user_id": "user_2", "user_name": "Diya", "total_co2_saved": 18.2, "rank": 2}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/trend/user_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"date": "2024-01-05", "co2_emitted": 2.3},
                {"date": "2024-01-06", "co2_emitted": 1.9}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let board = client.leaderboard().await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_name, "Aarav");

        let trend = client.trend("user_1").await.unwrap();
        assert_eq!(trend[1].date, "2024-01-06");
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "healthy"})),
            )
            .mount(&server)
            .await;

        assert!(client_for(&server).health().await.unwrap().is_healthy());
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(report_json()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut session = DetectionSession::new();
        session.begin_capture().unwrap();
        let ticket = session.submit(CapturedImage::snapshot(vec![1, 2])).unwrap();

        let (id, result) = client.detect_ticket(ticket).await;
        assert!(session.resolve(id, result.map_err(|e| e.to_string())));
        assert_eq!(session.report().map(|r| r.total_co2), Some(4.12));
    }

    #[tokio::test]
    async fn test_network_failure_keeps_prior_report() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(report_json()))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut session = DetectionSession::new();

        let ticket = session.submit(CapturedImage::snapshot(vec![1])).unwrap();
        let (id, result) = client.detect_ticket(ticket).await;
        session.resolve(id, result.map_err(|e| e.to_string()));

        // Backend goes away
        let dead = ApiClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();
        let ticket = session.submit(CapturedImage::snapshot(vec![2])).unwrap();
        let (id, result) = dead.detect_ticket(ticket).await;
        assert!(result.is_err());
        session.resolve(id, result.map_err(|e| e.to_string()));

        assert!(!session.is_loading());
        assert!(session.error().is_some());
        assert_eq!(session.report().map(|r| r.total_co2), Some(4.12));
    }

    #[tokio::test]
    async fn test_abort_yields_cancelled() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(report_json())
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut session = DetectionSession::new();
        let ticket = session.submit(CapturedImage::snapshot(vec![1])).unwrap();

        session.abort();
        let (id, result) = client.detect_ticket(ticket).await;

        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert!(!session.resolve(id, result.map_err(|e| e.to_string())));
        assert!(session.is_idle());
        assert!(session.report().is_none());
    }
}

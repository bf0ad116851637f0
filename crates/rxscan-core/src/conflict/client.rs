//! HTTP client for the conflict-check endpoint.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::CheckError;
use crate::models::config::ApiConfig;

use super::{error_message, ConflictReport, ConflictRequest};

/// Sends conflict-check requests. One attempt per call, no retries.
#[derive(Debug, Clone)]
pub struct ConflictClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConflictClient {
    /// Create a client from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, CheckError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CheckError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the conflict-check endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/check-conflicts", self.base_url)
    }

    /// Submit both medicine lists and return the backend's report.
    pub async fn check(&self, request: &ConflictRequest) -> Result<ConflictReport, CheckError> {
        let url = self.endpoint();
        info!(
            "Checking {} + {} medicines against {}",
            request.doctor_a_medicines.len(),
            request.doctor_b_medicines.len(),
            url
        );

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckError::Transport(e.to_string()))?;

        debug!("Conflict check returned {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(CheckError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        ConflictReport::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::RiskLevel;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}/", addr), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };

        let content_length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        raw.len() >= header_end + 4 + content_length
    }

    fn config(base_url: String) -> ApiConfig {
        ApiConfig {
            base_url,
            ..ApiConfig::default()
        }
    }

    fn request() -> ConflictRequest {
        ConflictRequest {
            doctor_a_medicines: vec!["metformin".to_string()],
            doctor_b_medicines: vec!["ibuprofen".to_string()],
            user_allergies: Vec::new(),
            session_id: None,
        }
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client = ConflictClient::new(&config("http://localhost:5000/".to_string())).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:5000/check-conflicts");
    }

    #[tokio::test]
    async fn test_check_success() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"doctorA_medicines":["metformin"],"doctorB_medicines":["ibuprofen"],"interactions":[{"pair":"metformin + ibuprofen","reason":"Blood sugar fluctuations."}],"allergy_conflicts":[],"user_allergies":[],"risk_level":"MEDIUM","message":"Moderate risk detected."}"#,
        )
        .await;

        let client = ConflictClient::new(&config(url)).unwrap();
        let report = client.check(&request()).await.unwrap();

        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert_eq!(report.interactions.len(), 1);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /check-conflicts"));
        assert!(raw.contains(r#""doctorA_medicines":["metformin"]"#));
        assert!(!raw.contains("user_allergies"));
    }

    #[tokio::test]
    async fn test_check_error_status() {
        let (url, server) = serve_once(
            "400 Bad Request",
            r#"{"error": "At least one medicine list must contain medicines"}"#,
        )
        .await;

        let client = ConflictClient::new(&config(url)).unwrap();
        let err = client.check(&request()).await.unwrap_err();

        match err {
            CheckError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "At least one medicine list must contain medicines");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_check_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ConflictClient::new(&config(format!("http://{}", addr))).unwrap();
        assert!(matches!(
            client.check(&request()).await,
            Err(CheckError::Transport(_))
        ));
    }
}

//! HTTP client for the signal endpoint.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::{SignalRequest, SignalResponse};

/// Configuration for the signal client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 3,
            // A bar closes every minute; retries must finish well before the next one.
            base_delay_ms: 250,
            max_delay_ms: 5_000,
            user_agent: format!("tickbar/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur while posting a signal.
#[derive(Error, Debug)]
pub enum SignalError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint URL is malformed.
    #[error("Invalid signal URL '{url}': {source}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// The underlying parse error.
        source: url::ParseError,
    },

    /// Server kept failing after all retries.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// The endpoint refused the request.
    #[error("Signal rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error message from the endpoint, or the status text.
        message: String,
    },
}

/// Signal endpoint client with retries.
#[derive(Debug, Clone)]
pub struct SignalClient {
    client: Client,
    endpoint: Url,
    config: ClientConfig,
}

impl SignalClient {
    /// Creates a client posting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(endpoint: &str, config: ClientConfig) -> Result<Self, SignalError> {
        let endpoint = Url::parse(endpoint).map_err(|source| SignalError::InvalidUrl {
            url: endpoint.to_string(),
            source,
        })?;
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn with_defaults(endpoint: &str) -> Result<Self, SignalError> {
        Self::new(endpoint, ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts a signal request.
    ///
    /// Server errors (5xx), rate limiting (429) and transport failures are
    /// retried. A 4xx reply is returned as [`SignalError::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retries or is rejected.
    pub async fn send(&self, request: &SignalRequest) -> Result<SignalResponse, SignalError> {
        let mut attempts = 0;

        loop {
            match self
                .client
                .post(self.endpoint.clone())
                .json(request)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.backoff_delay(attempts);
                            warn!(
                                symbol = %request.symbol,
                                status = status.as_u16(),
                                attempt = attempts,
                                "signal endpoint busy, retrying in {delay:?}"
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(SignalError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    if status.is_client_error() {
                        let body: SignalResponse = response.json().await.unwrap_or_default();
                        return Err(SignalError::Rejected {
                            status: status.as_u16(),
                            message: body.error.unwrap_or_else(|| status.to_string()),
                        });
                    }

                    let body = response.text().await?;
                    debug!(symbol = %request.symbol, %status, "signal delivered");
                    return Ok(serde_json::from_str(&body).unwrap_or_default());
                }
                Err(e) if is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.backoff_delay(attempts);
                    warn!(
                        symbol = %request.symbol,
                        attempt = attempts,
                        error = %e,
                        "signal request failed, retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Exponential backoff capped at `max_delay_ms`, with ±25% jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter keyed on the attempt number.
        let jitter_range = capped / 4;
        let jitter = if jitter_range > 0 {
            (u64::from(attempt) * 17) % (jitter_range * 2)
        } else {
            0
        };

        let delay = (capped + jitter).saturating_sub(jitter_range).max(50);
        Duration::from_millis(delay)
    }
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    if error.is_builder() {
        return false;
    }
    error.is_timeout() || error.is_connect() || error.is_request()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves the canned `(status, body)` replies, one connection each, and
    /// records every request body received.
    async fn serve(replies: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&bodies);

        tokio::spawn(async move {
            for (status, reply) in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                let body = loop {
                    let n = socket.read(&mut chunk).await.unwrap();
                    buf.extend_from_slice(&chunk[..n]);
                    let text = String::from_utf8_lossy(&buf).to_string();
                    if let Some(split) = text.find("\r\n\r\n") {
                        let length = text[..split]
                            .lines()
                            .find_map(|l| {
                                l.to_ascii_lowercase()
                                    .strip_prefix("content-length:")
                                    .map(|v| v.trim().parse::<usize>().unwrap())
                            })
                            .unwrap_or(0);
                        if buf.len() >= split + 4 + length {
                            break text[split + 4..split + 4 + length].to_string();
                        }
                    }
                    if n == 0 {
                        break String::new();
                    }
                };
                recorded.lock().unwrap().push(body);

                let response = format!(
                    "HTTP/1.1 {status} STATUS\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                    reply.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });

        (format!("http://{addr}/api/signal"), bodies)
    }

    fn fast_config(max_retries: u32) -> ClientConfig {
        ClientConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
            ..ClientConfig::default()
        }
    }

    fn request() -> SignalRequest {
        SignalRequest {
            symbol: "NIFTY".to_string(),
            closes: vec![100.0, 105.0],
            price: Some(105.0),
            dry_run: true,
        }
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("tickbar/"));
    }

    #[test]
    fn test_invalid_url() {
        let err = SignalClient::with_defaults("not a url").unwrap_err();
        assert!(matches!(err, SignalError::InvalidUrl { .. }));
    }

    #[test]
    fn test_backoff_delay_calculation() {
        let client = SignalClient::with_defaults("http://127.0.0.1:4000/api/signal").unwrap();

        // base 250ms * 2 = 500ms, ±25%
        let delay1 = client.backoff_delay(1);
        assert!(delay1.as_millis() >= 375 && delay1.as_millis() <= 625);

        let delay2 = client.backoff_delay(2);
        assert!(delay2.as_millis() >= 750 && delay2.as_millis() <= 1250);

        let delay_high = client.backoff_delay(20);
        assert!(delay_high.as_millis() <= 6250);
    }

    #[tokio::test]
    async fn test_send_success() {
        let (url, bodies) = serve(vec![(200, r#"{"result":"HOLD","decisionId":"abc"}"#)]).await;
        let client = SignalClient::new(&url, fast_config(0)).unwrap();

        let response = client.send(&request()).await.unwrap();
        assert_eq!(response.result.as_deref(), Some("HOLD"));

        let sent: SignalRequest = serde_json::from_str(&bodies.lock().unwrap()[0]).unwrap();
        assert_eq!(sent, request());
    }

    #[tokio::test]
    async fn test_send_retries_server_error() {
        let (url, bodies) = serve(vec![(503, "{}"), (200, r#"{"result":"BUY"}"#)]).await;
        let client = SignalClient::new(&url, fast_config(2)).unwrap();

        let response = client.send(&request()).await.unwrap();
        assert_eq!(response.result.as_deref(), Some("BUY"));
        assert_eq!(bodies.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_send_gives_up_after_retries() {
        let (url, _) = serve(vec![(500, "{}"), (500, "{}")]).await;
        let client = SignalClient::new(&url, fast_config(1)).unwrap();

        let err = client.send(&request()).await.unwrap_err();
        assert!(matches!(err, SignalError::ServerError { status: 500 }));
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let (url, _) = serve(vec![(400, r#"{"error":"Invalid input"}"#)]).await;
        let client = SignalClient::new(&url, fast_config(3)).unwrap();

        match client.send(&request()).await.unwrap_err() {
            SignalError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid input");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }
}

use async_trait::async_trait;
use reqwest::Client;
use road_watch_shared::{TrafficQuery, TrafficResponse};
use std::time::Duration;

use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://api.map.baidu.com/traffic/v1/road";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Anything that can answer "what is the traffic on this road right now".
#[async_trait]
pub trait TrafficSource: Send + Sync {
    /// Returns `None` when no usable response could be obtained. The cause
    /// has already been logged.
    async fn fetch(&self, query: &TrafficQuery) -> Option<TrafficResponse>;
}

pub struct TrafficFetcher {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TrafficFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self::with_client(client, config.base_url, config.api_key))
    }

    /// Uses a preconfigured client, which carries its own timeout.
    pub fn with_client(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn try_fetch(&self, query: &TrafficQuery) -> Result<TrafficResponse, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("road_name", query.road_name.as_str()),
                ("city", query.city.as_str()),
                ("ak", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TrafficSource for TrafficFetcher {
    async fn fetch(&self, query: &TrafficQuery) -> Option<TrafficResponse> {
        match self.try_fetch(query).await {
            Ok(response) => Some(response),
            Err(e) => {
                log::error!(
                    "Traffic API request failed for {} ({}): {}",
                    query.road_name,
                    query.city,
                    e
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const OK_BODY: &str = r#"{"status":0,"message":"成功","description":"四平路：双向畅通。","evaluation":{"status":1,"status_desc":"畅通"},"road_traffic":[{"road_name":"四平路","congestion_sections":[]}]}"#;

    async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        String::from_utf8_lossy(&request).into_owned()
    }

    /// Serves a single canned HTTP response and hands back the request head.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request_head(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}/traffic/v1/road", addr), handle)
    }

    fn fetcher(base_url: String, timeout: Duration) -> TrafficFetcher {
        let client = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        TrafficFetcher::with_client(client, base_url, "test-key")
    }

    #[tokio::test]
    async fn sends_query_parameters_and_parses_body() {
        let (url, server) = serve_once("200 OK", OK_BODY).await;
        let fetcher = fetcher(url, DEFAULT_TIMEOUT);

        let response = fetcher
            .fetch(&TrafficQuery::new("X", "CityY"))
            .await
            .expect("response");

        assert_eq!(response.status, 0);
        assert_eq!(response.evaluation_status(), Some(1));
        assert_eq!(response.road_traffic.len(), 1);

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /traffic/v1/road?"));
        assert!(request_line.contains("road_name=X"));
        assert!(request_line.contains("city=CityY"));
        assert!(request_line.contains("ak=test-key"));
    }

    #[tokio::test]
    async fn provider_error_status_is_still_a_response() {
        let (url, server) = serve_once("200 OK", r#"{"status":2,"message":"参数错误"}"#).await;
        let fetcher = fetcher(url, DEFAULT_TIMEOUT);

        let response = fetcher.fetch(&TrafficQuery::new("X", "CityY")).await.unwrap();
        assert_eq!(response.status, 2);
        assert_eq!(response.message.as_deref(), Some("参数错误"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn non_2xx_is_absent() {
        let (url, server) = serve_once("503 Service Unavailable", "{}").await;
        let fetcher = fetcher(url, DEFAULT_TIMEOUT);

        let err = fetcher.try_fetch(&TrafficQuery::new("X", "CityY")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status } if status.as_u16() == 503));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_json_is_absent() {
        let (url, server) = serve_once("200 OK", "<html>busy</html>").await;
        let fetcher = fetcher(url, DEFAULT_TIMEOUT);

        let err = fetcher.try_fetch(&TrafficQuery::new("X", "CityY")).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_refused_is_absent() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = fetcher(format!("http://{}/traffic/v1/road", addr), DEFAULT_TIMEOUT);
        assert!(fetcher.fetch(&TrafficQuery::new("X", "CityY")).await.is_none());
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request_head(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let fetcher = fetcher(
            format!("http://{}/traffic/v1/road", addr),
            Duration::from_millis(200),
        );
        let err = fetcher.try_fetch(&TrafficQuery::new("X", "CityY")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(ref e) if e.is_timeout()));
        server.abort();
    }
}

//! HTTP Forward API
//!
//! reqwest client for the panel backend. The session token goes into the
//! `Authorization` header as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::PanelConfig;
use crate::domain::{DomainError, DomainResult, ForwardRecord, OrderUpdate};
use super::envelope::ApiResponse;
use super::ForwardApi;

const LIST_PATH: &str = "forward/list";
const UPDATE_ORDER_PATH: &str = "forward/update-order";

pub struct HttpForwardApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpForwardApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn from_config(config: &PanelConfig) -> DomainResult<Self> {
        Self::new(&config.api_base_url, config.token.clone(), config.request_timeout())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> DomainResult<ApiResponse<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let mut request = self.client.post(self.endpoint(path)).json(body);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token.as_str());
        }

        let resp = request
            .send()
            .await
            .map_err(|e| DomainError::Transport(format!("{} request failed: {}", path, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DomainError::Transport(format!(
                "{} answered HTTP {}",
                path,
                status.as_u16()
            )));
        }

        resp.json::<ApiResponse<T>>()
            .await
            .map_err(|e| DomainError::Transport(format!("{} response decode failed: {}", path, e)))
    }
}

#[async_trait]
impl ForwardApi for HttpForwardApi {
    async fn fetch_records(&self) -> DomainResult<Vec<ForwardRecord>> {
        let res: ApiResponse<Vec<ForwardRecord>> = self.post(LIST_PATH, &serde_json::json!({})).await?;
        Ok(res.into_result()?.unwrap_or_default())
    }

    async fn push_order(&self, update: &OrderUpdate) -> DomainResult<ApiResponse<()>> {
        self.post(UPDATE_ORDER_PATH, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForwardId, OrderEntry};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer exactly one request with `status` and `body`; yields the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            if name.eq_ignore_ascii_case("content-length") {
                                value.trim().parse::<usize>().ok()
                            } else {
                                None
                            }
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{}/api/v1/", addr), handle)
    }

    fn client(base: &str) -> HttpForwardApi {
        HttpForwardApi::new(base, Some("jwt-token".to_string()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let api = client("http://panel.local/api/v1/");
        assert_eq!(api.endpoint(LIST_PATH), "http://panel.local/api/v1/forward/list");
        assert_eq!(api.endpoint("/forward/update-order"), "http://panel.local/api/v1/forward/update-order");
    }

    #[tokio::test]
    async fn test_fetch_records() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"code":0,"data":[{"id":2,"userId":1,"inx":1},{"id":1,"userId":1}]}"#,
        )
        .await;

        let records = client(&base).fetch_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].server_index(), Some(1));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v1/forward/list"));
        assert!(request.to_lowercase().contains("authorization: jwt-token"));
    }

    #[tokio::test]
    async fn test_push_order_sends_full_set() {
        let (base, server) = serve_once("200 OK", r#"{"code":-1,"msg":"only own forwards"}"#).await;

        let update = OrderUpdate {
            forwards: vec![OrderEntry { id: ForwardId(5), inx: 1 }, OrderEntry { id: ForwardId(1), inx: 2 }],
        };
        let res = client(&base).push_order(&update).await.unwrap();
        assert!(!res.is_success());
        assert_eq!(res.msg.as_deref(), Some("only own forwards"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/v1/forward/update-order"));
        assert!(request.ends_with(r#"{"forwards":[{"id":5,"inx":1},{"id":1,"inx":2}]}"#));
    }

    #[tokio::test]
    async fn test_http_error_is_transport() {
        let (base, server) = serve_once("502 Bad Gateway", "{}").await;

        let err = client(&base).fetch_records().await.unwrap_err();
        assert!(matches!(err, DomainError::Transport(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_rejection_is_surfaced() {
        let (base, server) = serve_once("200 OK", r#"{"code":401,"msg":"token expired"}"#).await;

        let err = client(&base).fetch_records().await.unwrap_err();
        assert_eq!(err, DomainError::Rejected { code: 401, msg: "token expired".to_string() });
        server.await.unwrap();
    }
}

//! HTTP client for the configuration service.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::request::{ApiRequest, ApiResponse};
use super::types::*;
use crate::error::{Result, WebConfigError};

/// Anything that can answer an [`ApiRequest`].
///
/// The HTTP client is the production implementation; tests plug in scripted ones.
pub trait ConfigApi: Send + Sync + 'static {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send;
}

pub struct HttpConfigApi {
    client: Client,
    base_url: String,
}

impl HttpConfigApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn connection_error(&self, e: reqwest::Error) -> WebConfigError {
        if e.is_connect() {
            WebConfigError::Connection(format!("Cannot connect to {}", self.base_url))
        } else {
            WebConfigError::Http(e)
        }
    }

    async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<R> {
        debug!(%path, ?query, "GET");
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let status = response.status();
        let body = response.text().await?;
        decode_get(path, status, &body)
    }

    async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        debug!(%path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(%path, %status, "mutation answered with error status");
        }
        decode_body(path, &body)
    }

    pub async fn menu_tree(&self, show_all: bool) -> Result<Vec<MenuItem>> {
        self.get("/api/menu_tree", &[("show_all", show_all.to_string())])
            .await
    }

    pub async fn symbol(&self, name: &str) -> Result<SymbolDetail> {
        self.get(&format!("/api/symbol/{}", name), &[]).await
    }

    pub async fn changes(&self, mode: ChangeMode) -> Result<ChangeSet> {
        self.get("/api/changes", &[("mode", mode.as_str().to_string())])
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.get("/api/search", &[("q", query.to_string())]).await
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.get("/api/stats", &[]).await
    }

    pub async fn set_value(&self, symbol: &str, value: &str) -> Result<MutationReply> {
        self.post("/api/set_value", &SetValueBody { symbol, value })
            .await
    }

    pub async fn reset_symbol(&self, symbol: &str, kind: Option<ResetKind>) -> Result<MutationReply> {
        self.post("/api/reset_symbol", &ResetBody { symbol, kind })
            .await
    }

    pub async fn save_config(&self, filename: Option<&str>) -> Result<PersistReply> {
        self.post("/api/save_config", &FilenameBody { filename })
            .await
    }

    pub async fn load_config(&self, filename: &str) -> Result<PersistReply> {
        self.post("/api/load_config", &FilenameBody { filename: Some(filename) })
            .await
    }

    pub async fn save_and_exit(&self) -> Result<PersistReply> {
        self.post("/api/save_and_exit", &FilenameBody::default())
            .await
    }

    /// Only reachability matters; the body is not inspected.
    pub async fn heartbeat(&self) -> Result<()> {
        self.client
            .post(self.url("/api/heartbeat"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| self.connection_error(e))?;
        Ok(())
    }
}

impl ConfigApi for HttpConfigApi {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = Result<ApiResponse>> + Send {
        async move {
            match request {
                ApiRequest::MenuTree { show_all } => {
                    self.menu_tree(show_all).await.map(ApiResponse::MenuTree)
                }
                ApiRequest::Symbol { name } => self.symbol(&name).await.map(ApiResponse::Symbol),
                ApiRequest::Changes { mode } => self.changes(mode).await.map(ApiResponse::Changes),
                ApiRequest::Search { query } => self.search(&query).await.map(ApiResponse::Search),
                ApiRequest::Stats => self.stats().await.map(ApiResponse::Stats),
                ApiRequest::SetValue { symbol, value } => self
                    .set_value(&symbol, &value)
                    .await
                    .map(ApiResponse::Mutation),
                ApiRequest::ResetSymbol { symbol, kind } => self
                    .reset_symbol(&symbol, kind)
                    .await
                    .map(ApiResponse::Mutation),
                ApiRequest::SaveConfig { filename } => self
                    .save_config(filename.as_deref())
                    .await
                    .map(ApiResponse::Persist),
                ApiRequest::LoadConfig { filename } => self
                    .load_config(&filename)
                    .await
                    .map(ApiResponse::Persist),
                ApiRequest::SaveAndExit => self.save_and_exit().await.map(ApiResponse::Persist),
                ApiRequest::Heartbeat => self.heartbeat().await.map(|_| ApiResponse::Heartbeat),
            }
        }
    }
}

/// Decode a GET body, turning an error status into [`WebConfigError::Server`]
/// carrying the body's `error` field when there is one.
pub fn decode_get<R: DeserializeOwned>(path: &str, status: StatusCode, body: &str) -> Result<R> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(WebConfigError::Server(message));
    }
    decode_body(path, body)
}

/// Decode a JSON body regardless of status. Mutation replies default to
/// `success: false`, so an error body still yields a usable reply.
pub fn decode_body<R: DeserializeOwned>(path: &str, body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|e| WebConfigError::Parse {
        endpoint: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = HttpConfigApi::new("http://127.0.0.1:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:5000");
        assert_eq!(api.url("/api/stats"), "http://127.0.0.1:5000/api/stats");
    }

    #[test]
    fn test_decode_get_error_status_uses_error_field() {
        let err = decode_get::<SymbolDetail>(
            "/api/symbol/NOPE",
            StatusCode::NOT_FOUND,
            r#"{"error": "Symbol not found"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, WebConfigError::Server(ref m) if m == "Symbol not found"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_decode_get_error_status_without_body() {
        let err = decode_get::<Stats>("/api/stats", StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(err, WebConfigError::Server(ref m) if m.contains("502")));
    }

    #[test]
    fn test_decode_mutation_error_body() {
        // 404 from set_value carries only `error`
        let reply: MutationReply =
            decode_body("/api/set_value", r#"{"error": "Symbol not found"}"#).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("Symbol not found"));
    }

    #[test]
    fn test_decode_garbage_is_transport_failure() {
        let err = decode_body::<Vec<MenuItem>>("/api/menu_tree", "not json").unwrap_err();
        assert!(err.is_transport());
    }
}

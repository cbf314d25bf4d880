use crate::http::{error::HttpError, request::HttpRequest, response::HttpResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for HTTP backends that handle the actual network communication
///
/// Keeps the client backend-agnostic: `ReqwestBackend` for production,
/// a mock for tests.
#[async_trait]
pub trait HttpBackend {
    /// Send an HTTP request and return the response
    async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Default backend using reqwest for real HTTP requests
///
/// Transport knobs (timeout, TLS verification, proxy environment) are
/// plain fields; everything else about the exchange is driven by the
/// compiled [`HttpRequest`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    /// Overall request timeout; `None` means no timeout
    pub timeout: Option<Duration>,
    /// Accept invalid TLS certificates
    pub insecure: bool,
    /// Honor proxy settings from the environment
    pub env_proxy: bool,
}

impl ReqwestBackend {
    fn build_client(&self) -> Result<reqwest::Client, HttpError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if self.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if !self.env_proxy {
            builder = builder.no_proxy();
        }
        builder
            .build()
            .map_err(|e| HttpError::Network(e.to_string()))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let client = self.build_client()?;
        let mut request_builder = client.request(
            reqwest::Method::from_bytes(req.method.as_str().as_bytes())
                .map_err(|e| HttpError::Network(e.to_string()))?,
            &req.url,
        );
        if let Some(ref body) = req.body {
            request_builder = request_builder.body(body.clone());
        }
        for (key, value) in &req.headers {
            request_builder = request_builder.header(key.as_str(), value.to_str().unwrap_or(""));
        }
        let resp = request_builder
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let version = resp.version();
        let mut headers = ::http::HeaderMap::new();
        for (k, v) in resp.headers() {
            headers.insert(k.clone(), v.clone());
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| HttpError::Parse(e.to_string()))?
            .to_vec();
        Ok(HttpResponse {
            status,
            version,
            headers,
            body,
        })
    }
}

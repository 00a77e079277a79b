use anyhow::Result;
use http_body_util::{BodyExt, Full};
use hyper::{body::Bytes, header::HeaderMap, Method, Request, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde_json::Value;

/// Plain HTTP/1 client pointed at a relay under test
#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl TestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(Method::GET, path, &[], Bytes::new()).await
    }

    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> Result<ApiResponse> {
        self.send(Method::GET, path, headers, Bytes::new()).await
    }

    pub async fn options(&self, path: &str, headers: &[(&str, &str)]) -> Result<ApiResponse> {
        self.send(Method::OPTIONS, path, headers, Bytes::new()).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        let json = serde_json::to_vec(body)?;
        self.post_raw(path, "application/json", json).await
    }

    /// POST a body as-is, e.g. truncated JSON
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: impl Into<Bytes>,
    ) -> Result<ApiResponse> {
        self.send(Method::POST, path, &[("content-type", content_type)], body.into())
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        headers: &[(&str, &str)],
        body: Bytes,
    ) -> Result<ApiResponse> {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("{}{}", self.base_url, path));
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let response = self.client.request(builder.body(Full::new(body))?).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response.into_body().collect().await?.to_bytes().to_vec();

        Ok(ApiResponse {
            status,
            body: serde_json::from_slice(&body_bytes).ok(),
            body_bytes,
            headers,
        })
    }
}

/// Relay response with the body kept both raw and, when it parses, as JSON
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub body_bytes: Vec<u8>,
    pub headers: HeaderMap,
}

impl ApiResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "unexpected status, body: {}",
            String::from_utf8_lossy(&self.body_bytes)
        );
        self
    }

    /// The relay's `{"error": ...}` body carries exactly this message
    pub fn assert_error_message(&self, expected: &str) -> &Self {
        let actual = self
            .body
            .as_ref()
            .and_then(|b| b["error"].as_str())
            .unwrap_or_else(|| panic!("no error field in {:?}", self.body));
        assert_eq!(actual, expected);
        self
    }

    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        assert_eq!(self.header(name), Some(expected), "header {name}");
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(self.headers.contains_key(name), "missing header {name}");
        self
    }
}

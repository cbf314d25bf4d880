use crate::http::error::HttpError;
use ::http::{HeaderMap, Version};

/// Represents an HTTP response with status, headers, and body
///
/// The body is kept as raw bytes; rendering decides whether the content is
/// printable text, formattable JSON, or binary data.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    /// Protocol version the response arrived over
    pub version: Version,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the response status indicates any error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Returns the Content-Type header value, if present
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
    }

    /// Returns true if the Content-Type header marks the body as JSON
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.starts_with("application/json") || ct.starts_with("text/json"))
            .unwrap_or(false)
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| HttpError::Parse(format!("Failed to parse JSON response: {e}")))
    }

    /// True when the body contains a null byte, the binary-data heuristic
    pub fn looks_binary(&self) -> bool {
        self.body.contains(&0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_content_type(ct: Option<&'static str>, body: &[u8]) -> HttpResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = ct {
            headers.insert("content-type", ::http::HeaderValue::from_static(ct));
        }
        HttpResponse {
            status: 200,
            version: Version::HTTP_11,
            headers,
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_response_is_error() {
        let mut resp = response_with_content_type(None, b"OK");
        assert!(!resp.is_error());
        resp.status = 404;
        assert!(resp.is_error());
        resp.status = 500;
        assert!(resp.is_error());
    }

    #[test]
    fn test_response_content_type() {
        let resp = response_with_content_type(Some("application/json; charset=utf-8"), b"{}");
        assert_eq!(resp.content_type(), Some("application/json; charset=utf-8"));

        let resp = response_with_content_type(None, b"data");
        assert_eq!(resp.content_type(), None);
    }

    #[test]
    fn test_response_is_json() {
        assert!(response_with_content_type(Some("application/json"), b"{}").is_json());
        assert!(
            response_with_content_type(Some("application/json; charset=utf-8"), b"{}").is_json()
        );
        assert!(response_with_content_type(Some("text/json"), b"{}").is_json());
        assert!(!response_with_content_type(Some("text/html"), b"<p>").is_json());
        assert!(!response_with_content_type(None, b"{}").is_json());
    }

    #[test]
    fn test_response_json_parsing() {
        use serde::Deserialize;

        #[derive(Deserialize, PartialEq, Debug)]
        struct TestData {
            name: String,
            age: u32,
        }

        let resp = response_with_content_type(None, br#"{"name": "Alice", "age": 30}"#);
        let data: TestData = resp.json().unwrap();
        assert_eq!(
            data,
            TestData {
                name: "Alice".to_string(),
                age: 30
            }
        );

        let resp = response_with_content_type(None, b"invalid json");
        let parsed: Result<TestData, _> = resp.json();
        assert!(matches!(parsed.unwrap_err(), HttpError::Parse(_)));
    }

    #[test]
    fn test_response_binary_heuristic() {
        assert!(response_with_content_type(None, b"ab\x00cd").looks_binary());
        assert!(!response_with_content_type(None, b"plain text").looks_binary());
    }
}

use ::http::{HeaderMap, Method};

/// Represents an HTTP request with URL, method, body, and headers
///
/// The compiled form of one invocation: everything the transport needs to
/// put the request on the wire. The body is raw bytes since raw-file and
/// multipart payloads are not guaranteed to be text.
#[derive(Debug, PartialEq, Clone)]
pub struct HttpRequest {
    /// Target URL, query string included
    pub url: String,
    /// HTTP method to use
    pub method: Method,
    /// Optional request body
    pub body: Option<Vec<u8>>,
    /// HTTP headers to send
    pub headers: HeaderMap,
}

impl HttpRequest {
    /// Constructs a new HttpRequest
    pub fn new(url: &str, method: Method, body: Option<Vec<u8>>, headers: HeaderMap) -> Self {
        Self {
            url: url.to_string(),
            method,
            body,
            headers,
        }
    }
}

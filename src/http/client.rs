use crate::http::{
    backend::HttpBackend, error::HttpError, request::HttpRequest, response::HttpResponse,
};

/// HTTP client generic over backend
///
/// Use `ReqwestBackend` for real requests, or a mock for tests.
#[derive(Clone)]
pub struct Client<B: HttpBackend + Send + Sync> {
    pub backend: B,
}

impl<B: HttpBackend + Send + Sync> Client<B> {
    /// Constructs a new Client with the given backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Sends an HTTP request and returns the response
    pub async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.backend.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::http::{HeaderMap, Method, Version};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use tokio_test::block_on;

    struct MockBackend {
        pub last_request: Mutex<Option<HttpRequest>>,
        pub response: HttpResponse,
        pub error: Option<HttpError>,
    }

    #[async_trait]
    impl HttpBackend for MockBackend {
        async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
            let mut last = self.last_request.lock().unwrap();
            *last = Some(req.clone());
            if let Some(ref err) = self.error {
                Err(err.clone())
            } else {
                Ok(self.response.clone())
            }
        }
    }

    // Implementing HttpBackend for Arc<MockBackend> lets tests keep a handle
    // on the backend after the client takes ownership, so they can assert on
    // the request the client actually sent.
    #[async_trait]
    impl HttpBackend for Arc<MockBackend> {
        async fn send(&self, req: &HttpRequest) -> Result<HttpResponse, HttpError> {
            self.as_ref().send(req).await
        }
    }

    #[test]
    fn test_client_send_calls_backend_and_returns_response() {
        let mut expected_headers = HeaderMap::new();
        expected_headers.insert("x-resp", "ok".parse().unwrap());
        let expected_response = HttpResponse {
            status: 200,
            version: Version::HTTP_11,
            headers: expected_headers.clone(),
            body: b"test body".to_vec(),
        };

        let backend = Arc::new(MockBackend {
            last_request: Mutex::new(None),
            response: expected_response.clone(),
            error: None,
        });

        let client = Client::new(backend.clone());
        let req = HttpRequest::new("http://example.com", Method::GET, None, HeaderMap::new());

        let response = block_on(client.send(&req)).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.headers, expected_headers);
        assert_eq!(response.body, b"test body".to_vec());

        let last_req = backend.last_request.lock().unwrap();
        let sent_req = last_req.as_ref().unwrap();
        assert_eq!(sent_req.url, "http://example.com");
        assert_eq!(sent_req.method, Method::GET);
    }

    #[test]
    fn test_client_send_forwards_body_and_headers() {
        let backend = Arc::new(MockBackend {
            last_request: Mutex::new(None),
            response: HttpResponse {
                status: 201,
                version: Version::HTTP_11,
                headers: HeaderMap::new(),
                body: b"created".to_vec(),
            },
            error: None,
        });

        let client = Client::new(backend.clone());
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let req = HttpRequest::new(
            "http://example.com/api",
            Method::POST,
            Some(br#"{"data":"value"}"#.to_vec()),
            headers,
        );

        let response = block_on(client.send(&req)).unwrap();
        assert_eq!(response.status, 201);

        let last_req = backend.last_request.lock().unwrap();
        let sent_req = last_req.as_ref().unwrap();
        assert_eq!(sent_req.method, Method::POST);
        assert_eq!(sent_req.body, Some(br#"{"data":"value"}"#.to_vec()));
        assert_eq!(
            sent_req.headers.get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_client_handles_backend_error() {
        let backend = Arc::new(MockBackend {
            last_request: Mutex::new(None),
            response: HttpResponse {
                status: 500,
                version: Version::HTTP_11,
                headers: HeaderMap::new(),
                body: Vec::new(),
            },
            error: Some(HttpError::Network("Connection failed".to_string())),
        });

        let client = Client::new(backend);
        let req = HttpRequest::new("http://example.com", Method::GET, None, HeaderMap::new());

        let result = block_on(client.send(&req));
        match result.unwrap_err() {
            HttpError::Network(msg) => assert_eq!(msg, "Connection failed"),
            other => panic!("Expected HttpError::Network, got {other:?}"),
        }
    }
}

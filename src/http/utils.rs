use ::http::Method;

/// Method names recognized as a leading command-line token
///
/// Exact uppercase match only, so URLs and tokens are never mistaken for a
/// method.
const METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "DELETE", "PURGE", "TRACE", "OPTIONS", "CONNECT", "PATCH",
];

/// Recognize an explicit leading HTTP method token
pub fn detect_method(token: &str) -> Option<Method> {
    if METHODS.contains(&token) {
        Method::from_bytes(token.as_bytes()).ok()
    } else {
        None
    }
}

use std::fmt;

use crate::http::HttpError;

/// Central error type for the surge application
#[derive(Debug, Clone)]
pub enum SurgeError {
    /// Command-line token and URL errors
    Cli(CliError),
    /// Body compilation errors (json fragments, files)
    Body(BodyError),
    /// HTTP transport errors
    Http(HttpError),
    /// Runtime/system errors
    Runtime(String),
}

/// Command-line argument parsing and validation errors
#[derive(Debug, Clone)]
pub enum CliError {
    /// Token with no unescaped delimiter
    BadToken(String),
    /// No URL argument supplied
    MissingUrl,
    /// URL failed to parse
    InvalidUrl(String),
}

/// Body assembly errors
#[derive(Debug, Clone)]
pub enum BodyError {
    /// A `:=` fragment was not valid JSON
    InvalidJsonFragment { key: String, value: String },
    /// More than one file given while raw-body mode is selected
    MultipleRawBodyFiles(usize),
    /// Could not open or read an uploaded or raw-body file
    FileAccess { path: String, reason: String },
}

impl fmt::Display for SurgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurgeError::Cli(err) => write!(f, "{err}"),
            SurgeError::Body(err) => write!(f, "{err}"),
            SurgeError::Http(err) => write!(f, "{err}"),
            SurgeError::Runtime(msg) => write!(f, "Runtime error: {msg}"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::BadToken(token) => {
                write!(f, "bad key/value: '{token}'")
            }
            CliError::MissingUrl => {
                write!(f, "no URL given")
            }
            CliError::InvalidUrl(url) => {
                write!(f, "invalid URL '{url}'")
            }
        }
    }
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidJsonFragment { key, value } => {
                write!(f, "invalid json for field '{key}': {value}")
            }
            BodyError::MultipleRawBodyFiles(n) => {
                write!(f, "only one input file allowed when setting raw body (got {n})")
            }
            BodyError::FileAccess { path, reason } => {
                write!(f, "unable to read file '{path}': {reason}")
            }
        }
    }
}

impl std::error::Error for SurgeError {}
impl std::error::Error for CliError {}
impl std::error::Error for BodyError {}

impl From<CliError> for SurgeError {
    fn from(err: CliError) -> Self {
        SurgeError::Cli(err)
    }
}

impl From<BodyError> for SurgeError {
    fn from(err: BodyError) -> Self {
        SurgeError::Body(err)
    }
}

impl From<HttpError> for SurgeError {
    fn from(err: HttpError) -> Self {
        SurgeError::Http(err)
    }
}

impl SurgeError {
    /// Provides a helpful suggestion for how to fix the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            SurgeError::Cli(CliError::BadToken(_)) => Some(
                "Tokens need a delimiter: key:value (header), key==value (query), \
                 key=value (body), key:=json (raw json), key@path (file). \
                 Escape literal delimiters with a backslash, e.g. key\\:name=value",
            ),
            SurgeError::Cli(CliError::MissingUrl) => {
                Some("Example: surge httpbin.org/get q==5")
            }
            SurgeError::Body(BodyError::InvalidJsonFragment { .. }) => {
                Some("Example: tags:='[\"a\",\"b\"]' count:=3 active:=true")
            }
            SurgeError::Body(BodyError::MultipleRawBodyFiles(_)) => Some(
                "-@file.bin sends the file as the whole body; drop the other \
                 file tokens or remove the '-' entry",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CliError::BadToken("nodelim".to_string());
        assert!(err.to_string().contains("bad key/value"));
        assert!(err.to_string().contains("nodelim"));
    }

    #[test]
    fn test_body_error_display() {
        let err = BodyError::InvalidJsonFragment {
            key: "count".to_string(),
            value: "{broken".to_string(),
        };
        assert!(err.to_string().contains("invalid json"));
        assert!(err.to_string().contains("count"));

        let err = BodyError::MultipleRawBodyFiles(2);
        assert!(err.to_string().contains("only one input file"));
    }

    #[test]
    fn test_surge_error_suggestion() {
        let err = SurgeError::Cli(CliError::BadToken("x".to_string()));
        assert!(err.suggestion().unwrap().contains("backslash"));

        let err = SurgeError::Runtime("boom".to_string());
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_error_conversions() {
        let http_err = HttpError::Network("connection failed".to_string());
        let surge_err: SurgeError = http_err.into();
        assert!(matches!(surge_err, SurgeError::Http(_)));

        let cli_err: SurgeError = CliError::MissingUrl.into();
        assert!(matches!(cli_err, SurgeError::Cli(_)));
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors = vec![
            SurgeError::Runtime("test runtime error".to_string()),
            SurgeError::Cli(CliError::InvalidUrl("ht!tp::".to_string())),
            SurgeError::Body(BodyError::FileAccess {
                path: "missing.bin".to_string(),
                reason: "not found".to_string(),
            }),
            SurgeError::Http(HttpError::Network("down".to_string())),
        ];

        for err in errors {
            let _ = err.to_string();
            let _ = format!("{err:?}");
        }
    }
}

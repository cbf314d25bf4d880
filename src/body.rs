use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ::http::HeaderMap;
use serde_json::{Map, Value};

use crate::args::{KvBundle, RAW_BODY_KEY};
use crate::error::{BodyError, SurgeError};

/// Merge `=` fields and `:=` fragments into one body-parameter map
///
/// A key with a single `=` value becomes a JSON string, repeated keys become
/// an array of strings. Each `:=` fragment is parsed as JSON on its own and
/// overwrites any `=` field with the same key. A malformed fragment is fatal.
pub fn body_params(bundle: &KvBundle) -> Result<Map<String, Value>, SurgeError> {
    let mut params = Map::new();

    for (k, vs) in &bundle.body {
        let value = if vs.len() == 1 {
            Value::String(vs[0].clone())
        } else {
            Value::Array(vs.iter().cloned().map(Value::String).collect())
        };
        params.insert(k.clone(), value);
    }

    for (k, fragment) in &bundle.json {
        let value: Value =
            serde_json::from_str(fragment).map_err(|_| BodyError::InvalidJsonFragment {
                key: k.clone(),
                value: fragment.clone(),
            })?;
        params.insert(k.clone(), value);
    }

    Ok(params)
}

/// Flatten a decoded JSON value into form fields under a single key
///
/// Booleans and numbers render as their literal text, strings as themselves,
/// arrays contribute one field per element under the same key. An object
/// contributes only its member keys as values; the member values are
/// discarded. That narrowing is longstanding observable behavior for form
/// encoding, and callers needing nested fidelity must send json instead.
pub fn coerce_value(fields: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::Bool(b) => {
            let text = if *b { "true" } else { "false" };
            fields.push((key.to_string(), text.to_string()));
        }
        Value::String(s) => fields.push((key.to_string(), s.clone())),
        Value::Number(n) => fields.push((key.to_string(), n.to_string())),
        Value::Object(map) => {
            for member_key in map.keys() {
                coerce_value(fields, key, &Value::String(member_key.clone()));
            }
        }
        Value::Array(items) => {
            for item in items {
                coerce_value(fields, key, item);
            }
        }
        Value::Null => eprintln!("unknown type for form field '{key}': null"),
    }
}

/// The four mutually exclusive body encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    RawFile,
    Multipart,
    UrlEncoded,
    Json,
}

/// Pure encoding-selection procedure over bundle contents and the two flags
///
/// Priority order: a `-` file entry forces raw-body mode; otherwise any file
/// entry with multipart enabled selects multipart; otherwise any body input
/// selects url-encoded under `--form` and json by default. Returns `None`
/// when there is nothing to send.
pub fn choose_body_kind(
    files: &HashMap<String, String>,
    has_params: bool,
    form: bool,
    multipart: bool,
) -> Option<BodyKind> {
    if files.contains_key(RAW_BODY_KEY) {
        return Some(BodyKind::RawFile);
    }
    if !files.is_empty() && multipart {
        return Some(BodyKind::Multipart);
    }
    if !has_params && files.is_empty() {
        return None;
    }
    if form {
        Some(BodyKind::UrlEncoded)
    } else {
        Some(BodyKind::Json)
    }
}

/// An assembled request body: payload bytes plus their content type
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    /// Opaque file bytes sent verbatim
    RawFile(Vec<u8>),
    /// Multipart form data with file and field parts
    Multipart { boundary: String, bytes: Vec<u8> },
    /// URL-encoded form fields
    UrlEncoded(String),
    /// Serialized body-parameter object
    Json(String),
}

impl RequestPayload {
    /// Content type announced for this encoding
    pub fn content_type(&self) -> String {
        match self {
            RequestPayload::RawFile(_) => "application/octet-stream".to_string(),
            RequestPayload::Multipart { boundary, .. } => {
                format!("multipart/form-data; boundary={boundary}")
            }
            RequestPayload::UrlEncoded(_) => "application/x-www-form-urlencoded".to_string(),
            RequestPayload::Json(_) => "application/json".to_string(),
        }
    }

    /// Set the Content-Type header if not already present
    pub fn apply_content_type(&self, headers: &mut HeaderMap) {
        if !headers.contains_key("content-type") {
            if let Ok(value) = self.content_type().parse() {
                headers.insert("content-type", value);
            }
        }
    }

    /// The wire bytes of this payload
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RequestPayload::RawFile(bytes) => bytes,
            RequestPayload::Multipart { bytes, .. } => bytes,
            RequestPayload::UrlEncoded(text) => text.into_bytes(),
            RequestPayload::Json(text) => text.into_bytes(),
        }
    }
}

fn read_file(path: &str) -> Result<Vec<u8>, BodyError> {
    fs::read(path).map_err(|e| BodyError::FileAccess {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn base_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Assemble the outgoing body from file entries and merged body parameters
///
/// Selects the encoding with [`choose_body_kind`] and produces the payload.
/// File open/read failures are fatal. In raw-body mode extra parameters are
/// ignored with a warning; more than one file entry is an error.
pub fn assemble(
    files: &HashMap<String, String>,
    mut params: Map<String, Value>,
    form: bool,
    multipart: bool,
) -> Result<Option<RequestPayload>, SurgeError> {
    let kind = match choose_body_kind(files, !params.is_empty(), form, multipart) {
        Some(kind) => kind,
        None => return Ok(None),
    };

    match kind {
        BodyKind::RawFile => {
            if files.len() > 1 {
                return Err(BodyError::MultipleRawBodyFiles(files.len()).into());
            }
            if !params.is_empty() {
                eprintln!("warning: extra body parameters ignored when setting raw body");
            }
            let bytes = read_file(&files[RAW_BODY_KEY])?;
            Ok(Some(RequestPayload::RawFile(bytes)))
        }
        BodyKind::Multipart => {
            let boundary = format!("surge-{}", uuid::Uuid::new_v4().simple());
            let mut buf: Vec<u8> = Vec::new();

            // File parts first, sorted by part name for stable output.
            let mut names: Vec<&String> = files.keys().collect();
            names.sort();
            for name in names {
                let path = &files[name.as_str()];
                let content = read_file(path)?;
                let filename = base_filename(path);
                buf.extend_from_slice(
                    format!(
                        "--{boundary}\r\nContent-Disposition: form-data; \
                         name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                buf.extend_from_slice(&content);
                buf.extend_from_slice(b"\r\n");
            }

            let mut fields = Vec::new();
            for (k, v) in &params {
                coerce_value(&mut fields, k, v);
            }
            for (k, v) in &fields {
                buf.extend_from_slice(
                    format!(
                        "--{boundary}\r\nContent-Disposition: form-data; \
                         name=\"{k}\"\r\n\r\n{v}\r\n"
                    )
                    .as_bytes(),
                );
            }

            buf.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
            Ok(Some(RequestPayload::Multipart {
                boundary,
                bytes: buf,
            }))
        }
        BodyKind::UrlEncoded | BodyKind::Json => {
            // With multipart off, file contents join the parameters as
            // plain strings keyed by their original key.
            let mut names: Vec<&String> = files.keys().collect();
            names.sort();
            for name in names {
                let content = read_file(&files[name.as_str()])?;
                params.insert(
                    name.to_string(),
                    Value::String(String::from_utf8_lossy(&content).into_owned()),
                );
            }

            if kind == BodyKind::UrlEncoded {
                let mut fields = Vec::new();
                for (k, v) in &params {
                    coerce_value(&mut fields, k, v);
                }
                let encoded = fields
                    .iter()
                    .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&");
                Ok(Some(RequestPayload::UrlEncoded(encoded)))
            } else {
                let text = serde_json::to_string(&Value::Object(params))
                    .unwrap_or_else(|_| "{}".to_string());
                Ok(Some(RequestPayload::Json(text)))
            }
        }
    }
}

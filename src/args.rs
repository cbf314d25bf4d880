use std::collections::HashMap;

use crate::error::{CliError, SurgeError};

/// The request facet a command-line token targets
///
/// Determined by the first unescaped delimiter found scanning left to right:
/// `:=` json, `:` header, `==` query, `=` body, `@` file. A token with no
/// unescaped delimiter is `Unknown` and rejected during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Header,
    Query,
    Body,
    Json,
    File,
    Unknown,
}

/// Remove backslash escapes from raw token text
///
/// Every `\X` collapses to `X`, whatever `X` is. A trailing lone backslash
/// is dropped. Total over all inputs.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escape = false;
    for c in s.chars() {
        if escape {
            out.push(c);
            escape = false;
            continue;
        }
        if c == '\\' {
            escape = true;
            continue;
        }
        out.push(c);
    }
    out
}

/// Classify one raw argument into (facet, key, value)
///
/// Scans character by character tracking escape state. The two-character
/// delimiters `:=` and `==` are detected by peeking one byte past `:` / `=`;
/// at end of string the peek simply fails and the single-character meaning
/// applies. Key and value are both escape-decoded.
pub fn classify(raw: &str) -> (Facet, String, String) {
    let mut key = String::with_capacity(raw.len());
    let mut escape = false;
    let bytes = raw.as_bytes();
    for (i, c) in raw.char_indices() {
        if escape {
            key.push(c);
            escape = false;
            continue;
        }
        match c {
            '\\' => escape = true,
            ':' => {
                return if bytes.get(i + 1) == Some(&b'=') {
                    (Facet::Json, key, unescape(&raw[i + 2..]))
                } else {
                    (Facet::Header, key, unescape(&raw[i + 1..]))
                };
            }
            '=' => {
                return if bytes.get(i + 1) == Some(&b'=') {
                    (Facet::Query, key, unescape(&raw[i + 2..]))
                } else {
                    (Facet::Body, key, unescape(&raw[i + 1..]))
                };
            }
            '@' => return (Facet::File, key, unescape(&raw[i + 1..])),
            _ => key.push(c),
        }
    }
    (Facet::Unknown, String::new(), String::new())
}

/// Reserved file key selecting raw-body mode
pub const RAW_BODY_KEY: &str = "-";

/// Aggregated per-facet mappings for one invocation
///
/// Headers, json fragments and files overwrite by key; query and body keep
/// an ordered list of values per key, appended in token order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KvBundle {
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, Vec<String>>,
    pub body: HashMap<String, Vec<String>>,
    pub json: HashMap<String, String>,
    pub files: HashMap<String, String>,
}

/// Fold a sequence of raw arguments into a [`KvBundle`]
///
/// Fails on the first token with no unescaped delimiter; aggregation is
/// all-or-nothing.
pub fn parse_args(args: &[String]) -> Result<KvBundle, SurgeError> {
    let mut bundle = KvBundle::default();

    for arg in args {
        let (facet, key, value) = classify(arg);
        match facet {
            Facet::Unknown => {
                return Err(SurgeError::Cli(CliError::BadToken(arg.clone())));
            }
            Facet::Header => {
                bundle.headers.insert(key, value);
            }
            Facet::Query => {
                bundle.query.entry(key).or_default().push(value);
            }
            Facet::Body => {
                bundle.body.entry(key).or_default().push(value);
            }
            Facet::Json => {
                bundle.json.insert(key, value);
            }
            Facet::File => {
                bundle.files.insert(key, value);
            }
        }
    }

    Ok(bundle)
}

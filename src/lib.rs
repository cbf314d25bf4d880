pub mod args;
pub mod body;
pub mod error;
pub mod http;
pub mod render;

use std::io;
use std::time::Duration;

use ::http::{HeaderMap, HeaderValue, Method};
use base64::Engine;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use crate::args::parse_args;
use crate::body::{assemble, body_params};
use crate::error::{CliError, SurgeError};
use crate::http::{detect_method, Client, HttpRequest, ReqwestBackend};

/// Compile terse `key<delimiter>value` tokens into an HTTP request, send
/// it, and render the response for a terminal.
#[derive(Parser)]
#[command(name = "surge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Encode body parameters as a URL-encoded form (implies POST)
    #[arg(short = 'f', long)]
    pub form: bool,

    /// Only show response headers
    #[arg(long = "headers")]
    pub headers_only: bool,

    /// Only show the response body
    #[arg(long = "body")]
    pub body_only: bool,

    /// Echo the compiled request before sending it
    #[arg(short, long)]
    pub verbose: bool,

    /// Basic auth credentials
    #[arg(short = 'a', long, value_name = "USER:PASS")]
    pub auth: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// No formatting or color
    #[arg(short = 'n', long)]
    pub no_formatting: bool,

    /// Raw output (no headers, formatting, or color)
    #[arg(long)]
    pub raw: bool,

    /// Do not use multipart encoding when uploading files
    #[arg(long)]
    pub no_multipart: bool,

    /// Request timeout in seconds (default none)
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Allow insecure TLS connections
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Ignore proxy settings from the environment
    #[arg(long)]
    pub no_env_proxy: bool,

    /// [METHOD] URL [token...]
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Effective options after flag implications are applied
#[derive(Debug, Clone)]
pub struct Options {
    pub form: bool,
    pub headers_only: bool,
    pub body_only: bool,
    pub verbose: bool,
    pub auth: Option<String>,
    pub color: bool,
    pub no_formatting: bool,
    pub raw: bool,
    pub multipart: bool,
    pub timeout: Option<Duration>,
    pub insecure: bool,
    pub env_proxy: bool,
}

impl Options {
    /// Resolve raw CLI flags: no-formatting disables color, raw output
    /// means body only with no formatting or color
    pub fn from_cli(cli: &Cli) -> Self {
        let mut opts = Options {
            form: cli.form,
            headers_only: cli.headers_only,
            body_only: cli.body_only,
            verbose: cli.verbose,
            auth: cli.auth.clone(),
            color: !cli.no_color,
            no_formatting: cli.no_formatting,
            raw: cli.raw,
            multipart: !cli.no_multipart,
            timeout: cli.timeout.map(Duration::from_secs),
            insecure: cli.insecure,
            env_proxy: !cli.no_env_proxy,
        };
        if opts.no_formatting {
            opts.color = false;
        }
        if opts.raw {
            opts.headers_only = false;
            opts.body_only = true;
            opts.color = false;
            opts.no_formatting = true;
        }
        opts
    }
}

pub fn ensure_url_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Compile positional arguments into a ready-to-send request
///
/// Splits off an optional leading method token, parses the URL, classifies
/// and aggregates the remaining tokens, merges `==` pairs into the query
/// string, assembles the body, and lays down headers: defaults first, then
/// the payload content type and auth, with `:` tokens overriding last. A
/// produced payload upgrades an implicit GET to POST.
pub fn compile_request(positional: &[String], opts: &Options) -> Result<HttpRequest, SurgeError> {
    let mut rest = positional;

    let (mut method, mut method_provided) = if opts.form {
        (Method::POST, true)
    } else {
        (Method::GET, false)
    };
    if let Some(first) = rest.first() {
        if let Some(m) = detect_method(first) {
            method = m;
            method_provided = true;
            rest = &rest[1..];
        }
    }

    let url_arg = rest.first().ok_or(CliError::MissingUrl)?;
    let mut url = reqwest::Url::parse(&ensure_url_scheme(url_arg))
        .map_err(|_| CliError::InvalidUrl(url_arg.clone()))?;

    let bundle = parse_args(&rest[1..])?;

    if !bundle.query.is_empty() {
        let mut keys: Vec<&String> = bundle.query.keys().collect();
        keys.sort();
        let mut pairs = url.query_pairs_mut();
        for key in keys {
            for value in &bundle.query[key.as_str()] {
                pairs.append_pair(key, value);
            }
        }
    }

    let params = body_params(&bundle)?;
    let payload = assemble(&bundle.files, params, opts.form, opts.multipart)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        "user-agent",
        HeaderValue::from_static(concat!("surge/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert("accept", HeaderValue::from_static("*/*"));

    if let Some(ref auth) = opts.auth {
        let (user, pass) = auth.split_once(':').unwrap_or((auth.as_str(), ""));
        let token = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{pass}"));
        if let Ok(value) = format!("Basic {token}").parse() {
            headers.insert("authorization", value);
        }
    }

    let body = match payload {
        Some(payload) => {
            payload.apply_content_type(&mut headers);
            if !method_provided {
                method = Method::POST;
            }
            Some(payload.into_bytes())
        }
        None => None,
    };

    for (key, value) in &bundle.headers {
        match (
            key.parse::<::http::HeaderName>(),
            value.parse::<HeaderValue>(),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => eprintln!("warning: ignoring invalid header '{key}: {value}'"),
        }
    }

    Ok(HttpRequest::new(url.as_str(), method, body, headers))
}

/// Run a closure behind an indicatif spinner
pub fn run_with_spinner<F, T>(message: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    match ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner} {msg}")
    {
        Ok(style) => pb.set_style(style),
        Err(_) => pb.set_style(ProgressStyle::default_spinner()),
    }

    let result = f();
    pb.finish_and_clear();
    result
}

fn output_error(e: io::Error) -> SurgeError {
    SurgeError::Runtime(format!("output error: {e}"))
}

/// Execute one invocation end to end and return the process exit code
///
/// Success is 0; a response status of 400 or above maps to `status - 399`.
/// Compilation and transport failures surface as errors for the caller to
/// report.
pub fn run(cli: Cli) -> Result<i32, SurgeError> {
    let opts = Options::from_cli(&cli);
    let req = compile_request(&cli.args, &opts)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if opts.verbose {
        render::print_request(&mut out, &req, opts.color).map_err(output_error)?;
    }

    let client = Client::new(ReqwestBackend {
        timeout: opts.timeout,
        insecure: opts.insecure,
        env_proxy: opts.env_proxy,
    });
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| SurgeError::Runtime(format!("Failed to create async runtime: {e}")))?;

    let spinner_msg = format!("{} {}", req.method, req.url);
    let resp = run_with_spinner(&spinner_msg, || rt.block_on(client.send(&req)))?;

    if !opts.body_only {
        render::print_response_head(&mut out, &resp, opts.color).map_err(output_error)?;
    }
    if !opts.headers_only {
        render::print_body(&mut out, &resp, opts.color, opts.no_formatting, opts.raw)
            .map_err(output_error)?;
    }

    Ok(if resp.is_error() {
        i32::from(resp.status) - 399
    } else {
        0
    })
}

use std::io::{self, Write};

use ::http::{HeaderMap, StatusCode};
use anstyle::{AnsiColor, Style};
use serde_json::Value;

use crate::http::{HttpRequest, HttpResponse};

const INDENT: &str = "    ";

const MSG_NO_BINARY: &str = "\n\n\
+-----------------------------------------+\n\
| NOTE: binary data not shown in terminal |\n\
+-----------------------------------------+";

fn literal_style() -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Blue)))
}

fn key_style() -> Style {
    Style::new()
        .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Blue)))
        .bold()
}

fn string_style() -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)))
}

fn method_style() -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)))
}

fn target_style() -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Cyan)))
}

fn header_key_style() -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Cyan)))
}

fn header_value_style() -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Yellow)))
}

fn paint<W: Write>(out: &mut W, style: Style, text: &str, color: bool) -> io::Result<()> {
    if color {
        write!(out, "{}{}{}", style.render(), text, anstyle::Reset.render())
    } else {
        write!(out, "{text}")
    }
}

/// Pretty-print a decoded JSON value at the given indentation depth
///
/// Object members print one per line, keys sorted lexicographically so the
/// output is stable across runs; the closing brace sits one unit left of the
/// members. Empty objects and arrays stay inline as `{}` / `[]`. Colors mark
/// literals, object keys, and strings; with color off the structure is
/// byte-identical. The initial call uses depth 1.
pub fn render_json<W: Write>(out: &mut W, depth: usize, value: &Value, color: bool) -> io::Result<()> {
    render_value(out, depth, value, false, color)
}

fn render_string<W: Write>(out: &mut W, s: &str, is_key: bool, color: bool) -> io::Result<()> {
    let quoted = serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""));
    let style = if is_key { key_style() } else { string_style() };
    paint(out, style, &quoted, color)
}

fn render_value<W: Write>(
    out: &mut W,
    depth: usize,
    value: &Value,
    is_key: bool,
    color: bool,
) -> io::Result<()> {
    match value {
        Value::Null => paint(out, literal_style(), "null", color),
        Value::Bool(b) => {
            let text = if *b { "true" } else { "false" };
            paint(out, literal_style(), text, color)
        }
        Value::Number(n) => paint(out, literal_style(), &n.to_string(), color),
        Value::String(s) => render_string(out, s, is_key, color),
        Value::Object(map) => {
            if map.is_empty() {
                return write!(out, "{{}}");
            }

            let mut members: Vec<(&String, &Value)> = map.iter().collect();
            members.sort_by(|a, b| a.0.cmp(b.0));

            writeln!(out, "{{")?;
            let mut first = true;
            for (key, member) in members {
                if !first {
                    out.write_all(b",\n")?;
                }
                first = false;
                write!(out, "{}", INDENT.repeat(depth))?;
                render_string(out, key, true, color)?;
                write!(out, ": ")?;
                render_value(out, depth + 1, member, false, color)?;
            }
            out.write_all(b"\n")?;
            write!(out, "{}", INDENT.repeat(depth.saturating_sub(1)))?;
            write!(out, "}}")
        }
        Value::Array(items) => {
            if items.is_empty() {
                return write!(out, "[]");
            }

            writeln!(out, "[")?;
            let mut first = true;
            for item in items {
                if !first {
                    out.write_all(b",\n")?;
                }
                first = false;
                write!(out, "{}", INDENT.repeat(depth))?;
                render_value(out, depth + 1, item, false, color)?;
            }
            out.write_all(b"\n")?;
            write!(out, "{}", INDENT.repeat(depth.saturating_sub(1)))?;
            write!(out, "]")
        }
    }
}

/// Print headers sorted by name, one per line
pub fn print_headers<W: Write>(out: &mut W, headers: &HeaderMap, color: bool) -> io::Result<()> {
    let mut names: Vec<&str> = headers.keys().map(|k| k.as_str()).collect();
    names.sort_unstable();
    for name in names {
        let value = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        paint(out, header_key_style(), name, color)?;
        write!(out, ": ")?;
        paint(out, header_value_style(), value, color)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Echo the compiled request before it is sent: request line, sorted
/// headers, blank line, then the body
pub fn print_request<W: Write>(out: &mut W, req: &HttpRequest, color: bool) -> io::Result<()> {
    let (path, query) = match reqwest::Url::parse(&req.url) {
        Ok(u) => (u.path().to_string(), u.query().map(str::to_string)),
        Err(_) => (req.url.clone(), None),
    };
    let mut target = if path.is_empty() { "/".to_string() } else { path };
    if let Some(q) = query {
        target.push('?');
        target.push_str(&q);
    }

    paint(out, method_style(), req.method.as_str(), color)?;
    paint(out, target_style(), &format!(" {target}"), color)?;
    paint(out, literal_style(), " HTTP/1.1", color)?;
    writeln!(out)?;
    print_headers(out, &req.headers, color)?;
    writeln!(out)?;
    if let Some(ref body) = req.body {
        out.write_all(body)?;
    }
    out.write_all(b"\n\n")
}

/// Print the response status line and sorted headers, then a blank line
pub fn print_response_head<W: Write>(
    out: &mut W,
    resp: &HttpResponse,
    color: bool,
) -> io::Result<()> {
    let reason = StatusCode::from_u16(resp.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    paint(
        out,
        literal_style(),
        &format!("{:?} {}", resp.version, resp.status),
        color,
    )?;
    paint(out, target_style(), &format!(" {reason}"), color)?;
    writeln!(out)?;
    print_headers(out, &resp.headers, color)?;
    writeln!(out)
}

/// Render the response body under the selected output mode
///
/// Raw mode emits bytes unmodified. No-formatting mode emits bytes unless a
/// null byte marks them binary. Default mode pretty-prints JSON content
/// types, passes text content types through, and falls back to the same
/// binary heuristic for everything else; formatted output ends with two
/// newlines.
pub fn print_body<W: Write>(
    out: &mut W,
    resp: &HttpResponse,
    color: bool,
    no_formatting: bool,
    raw: bool,
) -> io::Result<()> {
    if raw {
        return out.write_all(&resp.body);
    }

    if no_formatting {
        if resp.looks_binary() {
            return out.write_all(MSG_NO_BINARY.as_bytes());
        }
        return out.write_all(&resp.body);
    }

    if resp.is_json() {
        match resp.json::<Value>() {
            Ok(value) => render_json(out, 1, &value, color)?,
            // Content-Type lied; show what we got.
            Err(_) => out.write_all(&resp.body)?,
        }
    } else if resp
        .content_type()
        .map(|ct| ct.starts_with("text/"))
        .unwrap_or(false)
    {
        out.write_all(&resp.body)?;
    } else if resp.looks_binary() {
        out.write_all(MSG_NO_BINARY.as_bytes())?;
    } else {
        out.write_all(&resp.body)?;
    }

    out.write_all(b"\n\n")
}

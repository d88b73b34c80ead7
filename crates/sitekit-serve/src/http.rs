use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLine<'a> {
    pub method: &'a str,
    pub target: &'a str,
}

impl RequestLine<'_> {
    pub fn is_head(&self) -> bool {
        self.method.eq_ignore_ascii_case("HEAD")
    }

    pub fn is_supported(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET") || self.is_head()
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("/")
    }

    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }
}

pub fn parse_request_line(request: &str) -> Option<RequestLine<'_>> {
    let first_line = request.lines().next()?;
    let mut parts = first_line.split_whitespace();
    let method = parts.next()?;
    let target = parts.next().unwrap_or("/");
    Some(RequestLine { method, target })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(content_type: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            location: None,
            body,
        }
    }

    pub fn plain(status: u16) -> Self {
        Self {
            status,
            content_type: TEXT_PLAIN.to_string(),
            location: None,
            body: status_text(status).as_bytes().to_vec(),
        }
    }

    pub fn redirect(location: String) -> Self {
        Self {
            location: Some(location),
            ..Self::plain(301)
        }
    }
}

pub fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        301 => "Moved Permanently",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        _ => "Unknown",
    }
}

pub fn write_http_response<W: Write>(
    stream: &mut W,
    response: &Response,
    head_only: bool,
) -> io::Result<()> {
    let mut headers = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
        response.status,
        status_text(response.status),
        response.content_type,
        response.body.len()
    );
    if let Some(location) = response.location.as_deref() {
        headers.push_str(&format!("Location: {location}\r\n"));
    }
    headers.push_str("Connection: close\r\n\r\n");

    let mut bytes = headers.into_bytes();
    if !head_only {
        bytes.extend_from_slice(&response.body);
    }
    stream.write_all(&bytes)?;
    stream.flush()
}

/// Decodes `%XX` escapes in a request path. `None` when an escape is cut
/// short or is not two hex digits, or when the decoded bytes are not UTF-8.
pub fn decode_percent_path(path: &str) -> Option<String> {
    let mut out = Vec::with_capacity(path.len());
    let mut rest = path.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte != b'%' {
            out.push(byte);
            rest = tail;
            continue;
        }
        let [high, low, ..] = *tail else {
            return None;
        };
        out.push((hex_digit(high)? << 4) | hex_digit(low)?);
        rest = &tail[2..];
    }
    String::from_utf8(out).ok()
}

fn hex_digit(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Maps a request path onto `root`. `None` for undecodable paths or any `..`
/// segment.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let decoded = decode_percent_path(request_path)?;
    let normalized = decoded.trim_start_matches('/');
    let mut candidate = root.to_path_buf();
    for segment in normalized.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            return None;
        }
        candidate.push(segment);
    }
    Some(candidate)
}

/// HTML listing of `dir`, entries sorted case-insensitively, directories
/// suffixed with `/`.
pub fn directory_listing(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort_by_key(|name| name.to_lowercase());

    let display_path =
        decode_percent_path(request_path).unwrap_or_else(|| request_path.to_string());
    let title = escape_html(&display_path);
    let mut html = format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Directory listing for {title}</title>\n</head>\n<body>\n<h1>Directory listing for {title}</h1>\n<hr>\n<ul>\n"
    );
    for name in entries {
        let href = match name.strip_suffix('/') {
            Some(dir_name) => format!("{}/", encode_path_segment(dir_name)),
            None => encode_path_segment(&name),
        };
        let _ = writeln!(html, "<li><a href=\"{href}\">{}</a></li>", escape_html(&name));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

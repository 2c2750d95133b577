//! HTTP message types shared by the request builder and response parser.
//!
//! # Design
//! These types describe requests and responses as plain data. `HttpRequest`
//! is built once by the caller and only borrowed by the builder; the parser
//! produces an owned `HttpResponse`. Header maps are `BTreeMap`-backed so the
//! serialized request is deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

/// HTTP method for a request. Only these four are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a body and `Content-Length`.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl FromStr for HttpMethod {
    type Err = ClientError;

    /// Case-insensitive: `get` and `GET` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(ClientError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custom request headers, keyed by name as given.
///
/// Names and values are checked on insert so that nothing placed on the wire
/// can terminate a header line early.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: BTreeMap<String, String>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any earlier value for the same name.
    ///
    /// Names must be RFC 7230 tokens and must not be one the builder writes
    /// itself (`Host`, `Content-Length`, `Connection`, `Transfer-Encoding`).
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        let name = name.trim();
        let value = value.trim();
        if !is_token(name)
            || is_reserved(name)
            || value.contains(|c: char| matches!(c, '\r' | '\n' | '\0'))
        {
            return Err(ClientError::InvalidHeader(format!("{name}:{value}")));
        }
        self.entries.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Build a header set from `Name: value` strings.
    ///
    /// Entries without a `:` are skipped. Later entries win.
    pub fn from_args<I, S>(args: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once(':') {
                Some((name, value)) => headers.insert(name, value)?,
                None => tracing::warn!(header = arg, "skipping header without ':'"),
            }
        }
        Ok(headers)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Headers the builder writes itself.
const RESERVED: [&str; 4] = ["Host", "Content-Length", "Connection", "Transfer-Encoding"];

fn is_reserved(name: &str) -> bool {
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

/// `token` from RFC 7230 section 3.2.6.
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}

/// A request described as plain data, ready for `request::build`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path and query, e.g. `/search?q=1`.
    pub target: String,
    pub host: String,
    pub headers: HeaderSet,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Serialize to the exact bytes written to the connection.
    pub fn encode(&self) -> Vec<u8> {
        crate::request::build(
            self.method,
            &self.target,
            &self.host,
            self.body.as_deref(),
            &self.headers,
        )
    }

    /// The request line and header lines as sent, without CRLF terminators.
    pub fn head_lines(&self) -> Vec<String> {
        let wire = self.encode();
        let head_end = wire
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .unwrap_or(wire.len());
        String::from_utf8_lossy(&wire[..head_end])
            .split("\r\n")
            .map(str::to_string)
            .collect()
    }
}

/// Response headers. Lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: BTreeMap<String, String>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header. A name equal to an existing one ignoring case
    /// replaces it, so the last occurrence wins.
    pub fn insert(&mut self, name: String, value: String) {
        let existing = self
            .entries
            .keys()
            .find(|k| k.eq_ignore_ascii_case(&name))
            .cloned();
        if let Some(existing) = existing {
            self.entries.remove(&existing);
        }
        self.entries.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// The raw status line, trimmed, e.g. `HTTP/1.1 200 OK`.
    pub status_line: String,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// The numeric status code from the status line, if it has one.
    pub fn status_code(&self) -> Option<u16> {
        self.status_line.split_whitespace().nth(1)?.parse().ok()
    }
}

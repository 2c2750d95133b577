//! Request serialization.
//!
//! Appends fixed segments to a byte buffer. The only branch is whether the
//! method carries a body.

use crate::http::{HeaderSet, HttpMethod};

const CRLF: &[u8] = b"\r\n";

/// Serialize a request to the bytes placed on the wire.
///
/// POST and PUT get `Content-Length` (byte length of `body`, 0 if absent),
/// `Connection: close` and the body. Other methods end after the header
/// block and never send a body. `HeaderSet` refuses the names written here,
/// so each of them appears exactly once.
pub fn build(
    method: HttpMethod,
    target: &str,
    host: &str,
    body: Option<&str>,
    headers: &HeaderSet,
) -> Vec<u8> {
    let body = body.unwrap_or_default().as_bytes();
    let mut buf = Vec::with_capacity(64 + target.len() + host.len() + body.len());

    buf.extend_from_slice(method.as_str().as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(target.as_bytes());
    buf.extend_from_slice(b" HTTP/1.1");
    buf.extend_from_slice(CRLF);

    push_header(&mut buf, "Host", host);
    for (name, value) in headers.iter() {
        push_header(&mut buf, name, value);
    }

    if method.carries_body() {
        push_header(&mut buf, "Content-Length", &body.len().to_string());
        push_header(&mut buf, "Connection", "close");
        buf.extend_from_slice(CRLF);
        buf.extend_from_slice(body);
    } else {
        buf.extend_from_slice(CRLF);
    }

    buf
}

fn push_header(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn get_without_headers() {
        let out = text(build(HttpMethod::Get, "/path?q=1", "example.com", None, &HeaderSet::new()));
        assert_eq!(out, "GET /path?q=1 HTTP/1.1\r\nHost: example.com\r\n\r\n");
        assert!(!out.contains("Content-Length"));
    }

    #[test]
    fn custom_headers_follow_host() {
        let headers = HeaderSet::from_args(["X-B: 2", "Accept: */*"]).unwrap();
        let out = text(build(HttpMethod::Delete, "/x", "h.test", None, &headers));
        assert_eq!(
            out,
            "DELETE /x HTTP/1.1\r\nHost: h.test\r\nAccept: */*\r\nX-B: 2\r\n\r\n"
        );
    }

    #[test]
    fn post_appends_length_and_body() {
        let out = text(build(HttpMethod::Post, "/form", "h.test", Some("a=1"), &HeaderSet::new()));
        assert!(out.starts_with("POST /form HTTP/1.1\r\nHost: h.test\r\n"));
        assert!(out.ends_with("Content-Length: 3\r\nConnection: close\r\n\r\na=1"));
    }

    #[test]
    fn put_carries_body_like_post() {
        let out = text(build(HttpMethod::Put, "/r", "h.test", Some("{}"), &HeaderSet::new()));
        assert!(out.ends_with("Content-Length: 2\r\nConnection: close\r\n\r\n{}"));
    }

    #[test]
    fn post_without_body_sends_zero_length() {
        let out = text(build(HttpMethod::Post, "/", "h.test", None, &HeaderSet::new()));
        assert!(out.ends_with("Content-Length: 0\r\nConnection: close\r\n\r\n"));
    }

    #[test]
    fn content_length_counts_bytes_not_chars() {
        let out = text(build(HttpMethod::Post, "/", "h.test", Some("héllo"), &HeaderSet::new()));
        assert!(out.contains("Content-Length: 6\r\n"));
    }

    #[test]
    fn body_is_dropped_for_get() {
        let out = text(build(HttpMethod::Get, "/", "h.test", Some("ignored"), &HeaderSet::new()));
        assert!(out.ends_with("\r\n\r\n"));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn host_line_appears_once() {
        let headers = HeaderSet::from_args(["Accept: text/plain"]).unwrap();
        let out = text(build(HttpMethod::Get, "/", "only.test", None, &headers));
        assert_eq!(out.matches("Host: ").count(), 1);
        assert!(out.contains("Host: only.test\r\n"));
    }

    #[test]
    fn custom_headers_cannot_duplicate_builder_headers() {
        let err = HeaderSet::from_args(["Host: other.test", "content-length: 99"]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader(_)));

        let headers = HeaderSet::from_args(["X-Len: 99", "Accept: */*"]).unwrap();
        let out = text(build(HttpMethod::Post, "/", "example.com", Some("a=1"), &headers));
        assert_eq!(out.matches("Host: ").count(), 1);
        assert_eq!(out.to_ascii_lowercase().matches("content-length: ").count(), 1);
        assert_eq!(out.matches("Connection: ").count(), 1);
        assert!(out.ends_with("Content-Length: 3\r\nConnection: close\r\n\r\na=1"));
    }
}

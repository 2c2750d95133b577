//! Resolution of an absolute URL into the pieces a request needs.

use url::Url;

use crate::error::{ClientError, Result};

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;

/// Where to connect and what to put on the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: String,
    /// Host name or IP literal, without IPv6 brackets.
    pub host: String,
    pub port: u16,
    /// Path and query, never empty.
    pub request_target: String,
}

impl Target {
    /// Parse `raw` as an absolute URL.
    ///
    /// The scheme only picks the default port: 443 for `https`, 80 for
    /// anything else. No TLS is ever negotiated.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host".to_string()))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();

        let scheme = url.scheme().to_string();
        // `Url` drops a port equal to the scheme's known default, so an
        // explicit one is recovered from the raw authority.
        let port = url
            .port()
            .or_else(|| {
                has_explicit_port(raw)
                    .then(|| url.port_or_known_default())
                    .flatten()
            })
            .unwrap_or(match scheme.as_str() {
                "https" => HTTPS_PORT,
                _ => HTTP_PORT,
            });

        let mut request_target = match url.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if let Some(query) = url.query() {
            request_target.push('?');
            request_target.push_str(query);
        }

        Ok(Self {
            scheme,
            host,
            port,
            request_target,
        })
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Whether the authority of `raw` spells out a port, e.g. `wss://h:443/`.
fn has_explicit_port(raw: &str) -> bool {
    let Some((_, rest)) = raw.trim().split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '\\', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    match host_port.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_defaults_to_port_80() {
        let t = Target::parse("http://example.com/path?q=1").unwrap();
        assert_eq!(t.host, "example.com");
        assert_eq!(t.port, 80);
        assert_eq!(t.request_target, "/path?q=1");
    }

    #[test]
    fn https_defaults_to_port_443() {
        let t = Target::parse("https://example.com").unwrap();
        assert_eq!(t.port, 443);
        assert_eq!(t.request_target, "/");
    }

    #[test]
    fn explicit_port_wins() {
        let t = Target::parse("https://example.com:8443/a").unwrap();
        assert_eq!(t.port, 8443);
        assert_eq!(t.authority(), "example.com:8443");
    }

    #[test]
    fn fragment_is_not_sent() {
        let t = Target::parse("http://example.com/doc?x=1#section").unwrap();
        assert_eq!(t.request_target, "/doc?x=1");
    }

    #[test]
    fn ipv6_host_is_unbracketed() {
        let t = Target::parse("http://[::1]:3000/").unwrap();
        assert_eq!(t.host, "::1");
        assert_eq!(t.authority(), "[::1]:3000");
    }

    #[test]
    fn relative_url_is_invalid() {
        let err = Target::parse("example.com/path").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn url_without_host_is_invalid() {
        let err = Target::parse("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { reason, .. } if reason == "missing host"));
    }

    #[test]
    fn explicit_default_port_of_other_schemes_is_kept() {
        assert_eq!(Target::parse("wss://h.test:443/live").unwrap().port, 443);
        assert_eq!(Target::parse("ws://h.test:80/").unwrap().port, 80);
        assert_eq!(Target::parse("ftp://h.test:21/f").unwrap().port, 21);
        assert_eq!(Target::parse("http://h.test:80/").unwrap().port, 80);
        assert_eq!(Target::parse("https://h.test:443/").unwrap().port, 443);
    }

    #[test]
    fn implicit_port_follows_https_rule() {
        assert_eq!(Target::parse("wss://h.test/live").unwrap().port, 80);
        assert_eq!(Target::parse("ftp://h.test/f").unwrap().port, 80);
        assert_eq!(Target::parse("http://user:pw@h.test/").unwrap().port, 80);
        assert_eq!(Target::parse("http://[::1]/").unwrap().port, 80);
    }

    #[test]
    fn explicit_port_detection() {
        assert!(has_explicit_port("wss://h:443/x"));
        assert!(has_explicit_port("http://u:p@[::1]:8080?q"));
        assert!(!has_explicit_port("http://[::1]/"));
        assert!(!has_explicit_port("http://u:p@h/"));
        assert!(!has_explicit_port("http://h:/"));
    }
}

//! Command-line flags.

use std::time::Duration;

use clap::Parser;
use rawcurl_core::{ClientConfig, ClientError, HeaderSet};

#[derive(Debug, Parser)]
#[command(name = "rawcurl")]
#[command(version, about = "Send one HTTP/1.1 request over a raw TCP connection", long_about = None)]
pub struct Args {
    /// Echo the request and response heads with `>` / `<` prefixes
    #[arg(short, long)]
    pub verbose: bool,

    /// HTTP method: GET, DELETE, POST or PUT
    #[arg(short = 'X', long = "request", value_name = "METHOD", default_value = "GET")]
    pub method: String,

    /// Body for POST and PUT requests
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// Extra header as `Name: value`, may be repeated
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Give up connecting after this many seconds
    #[arg(long, value_name = "SECS", value_parser = parse_secs)]
    pub connect_timeout: Option<Duration>,

    /// Give up on any single read or write after this many seconds
    #[arg(long, value_name = "SECS", value_parser = parse_secs)]
    pub max_time: Option<Duration>,

    /// Absolute URL to request
    pub url: String,
}

impl Args {
    pub fn header_set(&self) -> Result<HeaderSet, ClientError> {
        HeaderSet::from_args(&self.headers)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(timeout) = self.connect_timeout {
            config = config.with_connect_timeout(timeout);
        }
        if let Some(timeout) = self.max_time {
            config = config.with_io_timeout(timeout);
        }
        config
    }
}

fn parse_secs(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("`{s}` must be a positive number of seconds"));
    }
    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_get() {
        let args = Args::try_parse_from(["rawcurl", "http://example.com"]).unwrap();
        assert_eq!(args.method, "GET");
        assert!(!args.verbose);
        assert!(args.data.is_none());
        assert_eq!(args.client_config(), ClientConfig::default());
    }

    #[test]
    fn parses_curl_style_flags() {
        let args = Args::try_parse_from([
            "rawcurl",
            "-v",
            "-X",
            "post",
            "-d",
            "a=1",
            "-H",
            "Accept: */*",
            "-H",
            "X-Token: t",
            "http://example.com/form",
        ])
        .unwrap();
        assert!(args.verbose);
        assert_eq!(args.method, "post");
        assert_eq!(args.data.as_deref(), Some("a=1"));

        let headers = args.header_set().unwrap();
        assert_eq!(headers.get("Accept"), Some("*/*"));
        assert_eq!(headers.get("X-Token"), Some("t"));
    }

    #[test]
    fn timeouts_map_to_config() {
        let args = Args::try_parse_from([
            "rawcurl",
            "--connect-timeout",
            "1.5",
            "--max-time",
            "10",
            "http://example.com",
        ])
        .unwrap();
        let config = args.client_config();
        assert_eq!(config.connect_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.read_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.write_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn rejects_non_positive_timeout() {
        assert!(Args::try_parse_from(["rawcurl", "--max-time", "0", "http://x.test"]).is_err());
        assert!(Args::try_parse_from(["rawcurl", "--max-time", "soon", "http://x.test"]).is_err());
    }

    #[test]
    fn url_is_required() {
        assert!(Args::try_parse_from(["rawcurl", "-v"]).is_err());
    }
}

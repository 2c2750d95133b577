//! Single-shot HTTP/1.1 client over a plain TCP connection.
//!
//! # Design
//! Each request is split into `prepare` (validation and resolution, no I/O)
//! and `execute` (dial, write, parse). The connection is owned by `execute`
//! and dropped on return, whichever way it returns. There is exactly one
//! attempt per call.

use std::io::{self, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{HeaderSet, HttpMethod, HttpRequest, HttpResponse};
use crate::response;
use crate::target::Target;

/// A validated request together with the address it goes to.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub target: Target,
    pub request: HttpRequest,
}

#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate `method` and resolve `url` without touching the network.
    ///
    /// The method is checked first, so an unsupported method fails even when
    /// the URL is also bad.
    pub fn prepare(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
        headers: HeaderSet,
    ) -> Result<PreparedRequest> {
        let method: HttpMethod = method.parse()?;
        let target = Target::parse(url)?;
        if body.is_some() && !method.carries_body() {
            tracing::warn!(%method, "ignoring body for method without a body");
        }
        tracing::debug!(
            %method,
            host = %target.host,
            port = target.port,
            request_target = %target.request_target,
            "resolved request"
        );
        let request = HttpRequest {
            method,
            target: target.request_target.clone(),
            host: target.host.clone(),
            headers,
            body,
        };
        Ok(PreparedRequest { target, request })
    }

    /// Connect, send the request and read the whole response.
    pub fn execute(&self, prepared: &PreparedRequest) -> Result<HttpResponse> {
        let stream = self.connect(&prepared.target)?;
        exchange(stream, &prepared.request)
    }

    /// `prepare` followed by `execute`.
    pub fn fetch(
        &self,
        method: &str,
        url: &str,
        body: Option<String>,
        headers: HeaderSet,
    ) -> Result<HttpResponse> {
        let prepared = self.prepare(method, url, body, headers)?;
        self.execute(&prepared)
    }

    fn connect(&self, target: &Target) -> Result<TcpStream> {
        let addr = target.authority();
        let failed = |source: io::Error| ClientError::ConnectionFailure {
            addr: addr.clone(),
            source,
        };

        let host = target.host.as_str();
        let stream = match self.config.connect_timeout {
            Some(timeout) => connect_timeout((host, target.port), timeout),
            None => TcpStream::connect((host, target.port)),
        }
        .map_err(failed)?;

        stream
            .set_read_timeout(self.config.read_timeout)
            .map_err(failed)?;
        stream
            .set_write_timeout(self.config.write_timeout)
            .map_err(failed)?;

        tracing::debug!(%addr, "connected");
        Ok(stream)
    }
}

/// Try each resolved address in turn, returning the last error if none work.
fn connect_timeout<A: ToSocketAddrs>(addr: A, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no addresses resolved")
    }))
}

/// Write `request` to `stream`, then parse one response from it.
pub fn exchange<S: Read + Write>(mut stream: S, request: &HttpRequest) -> Result<HttpResponse> {
    let payload = request.encode();
    stream.write_all(&payload).map_err(ClientError::WriteFailure)?;
    stream.flush().map_err(ClientError::WriteFailure)?;
    tracing::debug!(bytes = payload.len(), "request written");

    response::parse(BufReader::new(stream))
}

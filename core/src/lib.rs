//! Minimal single-shot HTTP/1.1 client core.
//!
//! # Overview
//! Resolves an absolute URL, serializes a request by hand, writes it to a
//! plain TCP connection and parses the status line, headers and a
//! `Content-Length` body back out.
//!
//! # Design
//! - `request::build` turns a method, request-target, host, body and
//!   `HeaderSet` into wire bytes. It never touches the network.
//! - `response::ResponseParser` reads one response from any `BufRead`, so it
//!   is tested against byte slices as easily as sockets.
//! - `Client` glues the two together around a `TcpStream` that lives for
//!   exactly one request.
//! - No TLS, redirects, chunked bodies, pooling or retries.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod target;

pub use client::{exchange, Client, PreparedRequest};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::{HeaderSet, HttpMethod, HttpRequest, HttpResponse, ResponseHeaders};
pub use target::Target;

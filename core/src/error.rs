//! Error types for a single request attempt.
//!
//! # Design
//! Every variant is terminal: nothing is retried or recovered internally.
//! A half-read response is an error, never a partial success. I/O causes
//! are kept as the error source so callers can print the whole chain.

use std::io;

use thiserror::Error;

/// Errors returned while preparing, sending or reading a request.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The method is not one of GET, DELETE, POST, PUT.
    #[error("method not supported: {0}")]
    UnsupportedMethod(String),

    /// The URL could not be parsed into scheme, host and path.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A request header name or value would break the header block.
    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    /// Resolving or dialing the remote address failed.
    #[error("failed to connect to {addr}")]
    ConnectionFailure {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Writing the serialized request failed.
    #[error("failed to write request")]
    WriteFailure(#[source] io::Error),

    /// Reading the status line, headers or body failed.
    #[error("failed to read response")]
    ReadFailure(#[source] io::Error),

    /// The connection closed before any status line byte arrived.
    #[error("connection closed before a status line was received")]
    EmptyResponse,

    /// The connection closed before `Content-Length` body bytes arrived.
    #[error("response body truncated: expected {expected} bytes, received {received}")]
    ShortBody { expected: usize, received: usize },
}

pub type Result<T> = std::result::Result<T, ClientError>;

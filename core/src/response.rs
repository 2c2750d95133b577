//! Response parsing over a buffered byte stream.
//!
//! # Design
//! Parsing is a linear state machine:
//! `AwaitingStatusLine -> ReadingHeaders -> ReadingBody -> Done`.
//! Each `step` consumes the current state and returns the next one, so there
//! is no way back to an earlier state. Only the body length from
//! `Content-Length` is honoured; chunked transfer encoding is not supported.

use std::io::{self, BufRead, Read};

use crate::error::{ClientError, Result};
use crate::http::{HttpResponse, ResponseHeaders};

/// Longest status or header line accepted, including the line ending.
pub const MAX_LINE_LEN: usize = 64 * 1024;

enum State {
    AwaitingStatusLine,
    ReadingHeaders {
        status_line: String,
        headers: ResponseHeaders,
    },
    ReadingBody {
        status_line: String,
        headers: ResponseHeaders,
        length: usize,
    },
    Done(HttpResponse),
}

/// Reads one response from `reader`.
pub struct ResponseParser<R> {
    reader: R,
}

impl<R: BufRead> ResponseParser<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Drive the state machine to completion.
    pub fn parse(mut self) -> Result<HttpResponse> {
        let mut state = State::AwaitingStatusLine;
        loop {
            state = match state {
                State::Done(response) => return Ok(response),
                state => self.step(state)?,
            };
        }
    }

    fn step(&mut self, state: State) -> Result<State> {
        match state {
            State::AwaitingStatusLine => {
                let line = self.read_line()?.ok_or(ClientError::EmptyResponse)?;
                let status_line = line.trim().to_string();
                tracing::debug!(%status_line, "received status line");
                Ok(State::ReadingHeaders {
                    status_line,
                    headers: ResponseHeaders::new(),
                })
            }
            State::ReadingHeaders {
                status_line,
                mut headers,
            } => {
                // End of stream also ends the header block.
                let line = self.read_line()?.unwrap_or_default();
                let line = line.trim();
                if line.is_empty() {
                    let length = content_length(&headers);
                    return Ok(State::ReadingBody {
                        status_line,
                        headers,
                        length,
                    });
                }
                match line.split_once(':') {
                    Some((name, value)) => {
                        headers.insert(name.trim().to_string(), value.trim().to_string())
                    }
                    None => tracing::trace!(line, "skipping malformed header line"),
                }
                Ok(State::ReadingHeaders {
                    status_line,
                    headers,
                })
            }
            State::ReadingBody {
                status_line,
                headers,
                length,
            } => {
                let body = self.read_body(length)?;
                tracing::debug!(bytes = body.len(), "read response body");
                Ok(State::Done(HttpResponse {
                    status_line,
                    headers,
                    body,
                }))
            }
            State::Done(response) => Ok(State::Done(response)),
        }
    }

    /// Read up to and including `\n`. `None` means the stream had ended.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self
            .reader
            .by_ref()
            .take(MAX_LINE_LEN as u64)
            .read_until(b'\n', &mut buf)
            .map_err(ClientError::ReadFailure)?;
        if n == 0 {
            return Ok(None);
        }
        if n == MAX_LINE_LEN && !buf.ends_with(b"\n") {
            return Err(ClientError::ReadFailure(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("response line longer than {MAX_LINE_LEN} bytes"),
            )));
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    fn read_body(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut body = Vec::with_capacity(length.min(64 * 1024));
        self.reader
            .by_ref()
            .take(length as u64)
            .read_to_end(&mut body)
            .map_err(ClientError::ReadFailure)?;
        if body.len() < length {
            return Err(ClientError::ShortBody {
                expected: length,
                received: body.len(),
            });
        }
        Ok(body)
    }
}

/// Parse one response from `reader`.
pub fn parse<R: BufRead>(reader: R) -> Result<HttpResponse> {
    ResponseParser::new(reader).parse()
}

/// Declared body length. Missing or unparseable values count as 0.
fn content_length(headers: &ResponseHeaders) -> usize {
    let Some(raw) = headers.get("Content-Length") else {
        return 0;
    };
    match raw.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            tracing::warn!(value = raw, "unparseable Content-Length, reading no body");
            0
        }
    }
}

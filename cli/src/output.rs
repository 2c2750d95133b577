//! Terminal output for a request/response pair.
//!
//! Verbose mode echoes what went out with `> ` and what came back with
//! `< `. Otherwise only the status line and body are printed.

use std::io::{self, Write};

use rawcurl_core::{HttpRequest, HttpResponse};

pub struct Printer<W> {
    out: W,
    verbose: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn request(&mut self, request: &HttpRequest) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        for line in request.head_lines() {
            writeln!(self.out, "> {line}")?;
        }
        writeln!(self.out, ">")
    }

    pub fn response(&mut self, response: &HttpResponse) -> io::Result<()> {
        if self.verbose {
            writeln!(self.out, "< {}", response.status_line)?;
            for (name, value) in response.headers.iter() {
                writeln!(self.out, "< {name}: {value}")?;
            }
            writeln!(self.out, "<")?;
        } else {
            writeln!(self.out, "{}", response.status_line)?;
        }

        self.out.write_all(&response.body)?;
        if !response.body.is_empty() && !response.body.ends_with(b"\n") {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

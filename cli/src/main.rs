//! `rawcurl`: send one HTTP/1.1 request and print the response.

mod args;
mod output;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rawcurl_core::Client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::Args;
use crate::output::Printer;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rawcurl: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let headers = args.header_set()?;
    let client = Client::new(args.client_config());
    let prepared = client.prepare(&args.method, &args.url, args.data.clone(), headers)?;

    let mut printer = Printer::new(io::stdout().lock(), args.verbose);
    printer.request(&prepared.request)?;

    let response = client
        .execute(&prepared)
        .with_context(|| format!("request to {} failed", args.url))?;
    tracing::debug!(
        status = response.status_code(),
        body_bytes = response.body.len(),
        "response complete"
    );

    printer.response(&response)?;
    Ok(())
}

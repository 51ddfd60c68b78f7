//! CLI command handlers.
//!
//! Every handler reads at most one payload from stdin, writes its result to
//! stdout one value per line, and returns the exit signal for the outcome.

mod apkmirror;
mod apkpure;
mod aptoide;
mod scrape;
mod uptodown;

use std::io::{Read, Write};

use anyhow::{Context, Result};
use apk_finder_core::{MAX_PAYLOAD_BYTES, ParseError, decode_payload};
use tracing::debug;

use crate::ProcessExit;
use crate::cli::Command;

/// Runs one subcommand against `input`, writing results to `out`.
pub(crate) fn run(
    command: &Command,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<ProcessExit> {
    match command {
        Command::Apkmirror(args) => apkmirror::run_apkmirror_command(args, input, out),
        Command::Apkpure(args) => apkpure::run_apkpure_command(args, input, out),
        Command::Aptoide(args) => aptoide::run_aptoide_command(args, input, out),
        Command::Uptodown(args) => uptodown::run_uptodown_command(args, input, out),
        Command::Scrape(args) => scrape::run_scrape_command(args, input, out),
    }
}

/// What stdin held.
#[derive(Debug)]
pub(crate) enum Payload {
    /// Zero bytes.
    Empty,
    /// A decoded payload.
    Text(String),
    /// Bytes that failed decoding.
    Rejected(ParseError),
}

/// Reads the whole of `input`, bounded by [`MAX_PAYLOAD_BYTES`].
pub(crate) fn read_payload(input: &mut impl Read) -> Result<Payload> {
    let limit = u64::try_from(MAX_PAYLOAD_BYTES).unwrap_or(u64::MAX).saturating_add(1);
    let mut bytes = Vec::new();
    input
        .take(limit)
        .read_to_end(&mut bytes)
        .context("failed to read payload from stdin")?;

    let payload = match decode_payload(&bytes) {
        Ok("") => Payload::Empty,
        Ok(text) => Payload::Text(text.to_owned()),
        Err(error) => Payload::Rejected(error),
    };
    debug!(bytes = bytes.len(), "Payload read");
    Ok(payload)
}

/// Reads stdin and hands a non-empty payload to `handle`.
///
/// Empty stdin yields `on_empty`: "no table" for the table and page sources,
/// "no match" for the fragment and scrape commands. Undecodable bytes are a failure.
pub(crate) fn with_payload<F>(
    input: &mut impl Read,
    on_empty: ProcessExit,
    handle: F,
) -> Result<ProcessExit>
where
    F: FnOnce(&str) -> Result<ProcessExit>,
{
    match read_payload(input)? {
        Payload::Empty => {
            debug!(code = on_empty.code(), "Empty stdin");
            Ok(on_empty)
        }
        Payload::Text(text) => handle(&text),
        Payload::Rejected(error) => Err(error).context("stdin payload rejected"),
    }
}

/// Writes each value on its own line.
pub(crate) fn write_lines<I, S>(out: &mut impl Write, values: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for value in values {
        writeln!(out, "{}", value.as_ref()).context("failed to write to stdout")?;
    }
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Prints `value` when present and maps presence to the exit signal.
pub(crate) fn emit_optional(out: &mut impl Write, value: Option<&str>) -> Result<ProcessExit> {
    match value {
        Some(value) => {
            write_lines(out, [value])?;
            Ok(ProcessExit::Success)
        }
        None => Ok(ProcessExit::NoMatch),
    }
}

/// Prints every value and maps an empty list to "no match".
pub(crate) fn emit_list(out: &mut impl Write, values: &[String]) -> Result<ProcessExit> {
    write_lines(out, values)?;
    Ok(crate::app::exit_handler::exit_for_presence(!values.is_empty()))
}

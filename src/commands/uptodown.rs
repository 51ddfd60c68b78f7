//! Uptodown command handler: file id for an allowed architecture.

use std::collections::HashSet;
use std::io::{Read, Write};

use anyhow::Result;
use apk_finder_core::UptodownSource;

use super::{emit_optional, with_payload};
use crate::ProcessExit;
use crate::cli::UptodownArgs;

pub(crate) fn run_uptodown_command(
    args: &UptodownArgs,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<ProcessExit> {
    let allowed: HashSet<String> = args.archs.iter().cloned().collect();
    // A file list has no table to be missing; empty input is just "not found".
    with_payload(input, ProcessExit::NoMatch, |fragment| {
        emit_optional(out, UptodownSource::new().resolve(fragment, &allowed).as_deref())
    })
}

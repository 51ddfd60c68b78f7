//! APKMirror command handler: pick a variant link from a release page.

use std::io::{Read, Write};

use anyhow::Result;
use apk_finder_core::{ApkMirrorSource, ResolutionRequest, ResolutionResult};
use tracing::info;

use super::{with_payload, write_lines};
use crate::ProcessExit;
use crate::app::exit_handler::exit_for_resolution;
use crate::cli::ApkMirrorArgs;

pub(crate) fn run_apkmirror_command(
    args: &ApkMirrorArgs,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<ProcessExit> {
    let source = ApkMirrorSource::with_origin(args.origin.as_str());
    // The release page is already scoped to one package.
    let request = ResolutionRequest::new(String::new())
        .with_arch(args.arch.as_str())
        .with_density(args.dpi.as_str())
        .with_bundle(args.apk_bundle);

    with_payload(input, ProcessExit::NoTable, |html| {
        let result = source.resolve(html, &request);
        match &result {
            ResolutionResult::Found(locator) => write_lines(out, [locator])?,
            ResolutionResult::ParseFailure(error) => eprintln!("Error: {error}"),
            ResolutionResult::NoMatchInTable | ResolutionResult::NoTableFound => {
                info!(outcome = result.label(), "No variant selected");
            }
        }
        Ok(exit_for_resolution(&result))
    })
}

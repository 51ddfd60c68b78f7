//! APKPure command handler: versions and download links from APKPure pages.

use std::io::{Read, Write};

use anyhow::Result;
use apk_finder_core::ApkPureSource;

use super::{emit_list, emit_optional, with_payload, write_lines};
use crate::ProcessExit;
use crate::cli::ApkPureArgs;

pub(crate) fn run_apkpure_command(
    args: &ApkPureArgs,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<ProcessExit> {
    let source = ApkPureSource::with_base_url(args.base_url.as_str());

    if args.url_only {
        let version = if args.download {
            args.version.as_deref()
        } else {
            None
        };
        write_lines(out, [source.page_url(&args.name, &args.package, version)])?;
        return Ok(ProcessExit::Success);
    }

    with_payload(input, ProcessExit::NoTable, |html| {
        if args.latest {
            emit_optional(out, source.latest_version(html).as_deref())
        } else if args.versions {
            emit_list(out, &source.all_versions(html))
        } else {
            emit_optional(out, source.download_link(html).as_deref())
        }
    })
}

//! Aptoide command handler: decode API responses or print the URL to fetch.

use std::io::{Read, Write};

use anyhow::Result;
use apk_finder_core::{AptoideSource, RequestedVersion};
use tracing::debug;

use super::{emit_list, emit_optional, with_payload, write_lines};
use crate::ProcessExit;
use crate::cli::{AptoideAction, AptoideArgs};

pub(crate) fn run_aptoide_command(
    args: &AptoideArgs,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<ProcessExit> {
    let source = AptoideSource::with_api_base(args.api_base.as_str());

    let action = args.action();
    if action == AptoideAction::Url {
        write_lines(out, [api_url(&source, args)])?;
        return Ok(ProcessExit::Success);
    }

    let version = args.version.as_deref().map(RequestedVersion::parse);

    with_payload(input, ProcessExit::NoTable, |json| match action {
        AptoideAction::Latest => {
            emit_optional(out, source.latest_version_from_search(json).as_deref())
        }
        AptoideAction::Versions => emit_list(out, &source.list_versions(json)),
        AptoideAction::FindVercode => {
            let code = match &version {
                Some(RequestedVersion::Exact(name)) => source.find_version_code(json, name),
                _ => None,
            };
            emit_optional(out, code.map(|code| code.to_string()).as_deref())
        }
        AptoideAction::ParseMeta => {
            emit_optional(out, source.download_from_metadata(json).as_deref())
        }
        AptoideAction::Download => {
            let path = match &version {
                Some(RequestedVersion::Exact(_)) => source.download_from_metadata(json),
                _ => source.download_from_search(json),
            };
            emit_optional(out, path.as_deref())
        }
        AptoideAction::Url => Ok(ProcessExit::Success),
    })
}

/// Metadata URL when a version code is known, list-versions URL when a
/// version is named, search URL otherwise.
fn api_url(source: &AptoideSource, args: &AptoideArgs) -> String {
    if let Some(vercode) = args.vercode {
        debug!(vercode, "Building metadata URL");
        source.meta_url(&args.package, vercode, &args.arch)
    } else if args.version.is_some() {
        source.versions_url(&args.package, &args.arch, args.limit)
    } else {
        source.search_url(&args.package, &args.arch)
    }
}

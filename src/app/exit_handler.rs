//! Exit code logic for the apk-finder process.
//!
//! Single responsibility: map resolution outcomes to the process exit signal
//! calling scripts branch on.

use apk_finder_core::ResolutionResult;

use crate::ProcessExit;

/// Maps a variant-table resolution to its exit outcome.
pub(crate) fn exit_for_resolution(result: &ResolutionResult) -> ProcessExit {
    match result {
        ResolutionResult::Found(_) => ProcessExit::Success,
        ResolutionResult::NoMatchInTable => ProcessExit::NoMatch,
        ResolutionResult::NoTableFound => ProcessExit::NoTable,
        ResolutionResult::ParseFailure(_) => ProcessExit::Failure,
    }
}

/// Maps "did the decoder produce anything" to the exit outcome.
pub(crate) fn exit_for_presence(found: bool) -> ProcessExit {
    if found {
        ProcessExit::Success
    } else {
        ProcessExit::NoMatch
    }
}

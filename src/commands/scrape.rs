//! Scrape command handler: text or attribute values for a CSS selector.

use std::io::{Read, Write};

use anyhow::Result;
use apk_finder_core::parser::{compile_selector, parse_document, scrape_attribute, scrape_text};

use super::{emit_list, with_payload};
use crate::ProcessExit;
use crate::cli::ScrapeArgs;

pub(crate) fn run_scrape_command(
    args: &ScrapeArgs,
    input: &mut impl Read,
    out: &mut impl Write,
) -> Result<ProcessExit> {
    // Reject a bad selector before touching stdin.
    let selector = compile_selector(&args.selector)?;

    with_payload(input, ProcessExit::NoMatch, |html| {
        let document = parse_document(html);
        let values = match &args.attribute {
            Some(attribute) if !args.text => scrape_attribute(&document, &selector, attribute),
            _ => scrape_text(&document, &selector),
        };
        emit_list(out, &values)
    })
}

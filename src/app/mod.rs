//! Binary-side plumbing shared by the subcommands.

pub(crate) mod exit_handler;
pub(crate) mod terminal;

//! Subcommand modules for the `mafconv` binary.

pub mod convert;
pub mod to;

//! `doclint` command-line tool
//!
//! Checks a docs-as-code corpus for dangling references and writes its
//! traceability matrix.

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<ExitCode> {
    cli::Cli::parse().run()
}

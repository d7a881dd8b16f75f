use std::path::PathBuf;

use clap::Parser;
use doclint::{Diagnostics, Directory};
use tracing::instrument;

use super::{Outcome, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check identifiers and cross-references across a system's documents")]
pub struct Check {
    /// The system to check (a folder under `20-systems/`)
    #[arg(short, long)]
    system: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<Outcome> {
        let directory = Directory::new(root, self.system);
        let config = directory.config();
        let (index, diagnostics) = directory.lint(&config)?;
        tracing::info!("Checked {} documents", index.len());

        let failed = diagnostics.failed(config.deny_warnings);

        match self.output {
            OutputFormat::Table => print_table(&diagnostics, self.quiet),
            OutputFormat::Json => print_json(&diagnostics, failed)?,
            OutputFormat::Summary => print_summary(&diagnostics),
        }

        Ok(Outcome::new(failed))
    }
}

/// Prints warnings, then errors, then a closing verdict.
///
/// With `quiet`, only errors are printed.
pub fn print_table(diagnostics: &Diagnostics, quiet: bool) {
    if !quiet && !diagnostics.warnings().is_empty() {
        println!("\n{}", "Warnings:".warning());
        for warning in diagnostics.warnings() {
            println!(" - {}", warning.warning());
        }
    }

    if !diagnostics.errors().is_empty() {
        println!("\n{}", "Errors:".error());
        for error in diagnostics.errors() {
            println!(" - {}", error.error());
        }
        return;
    }

    if !quiet {
        println!("\n{}", "OK: references are consistent.".success());
    }
}

fn print_json(diagnostics: &Diagnostics, failed: bool) -> anyhow::Result<()> {
    use serde_json::json;

    let output = json!({
        "status": if failed { "failed" } else { "ok" },
        "errors": diagnostics.errors(),
        "warnings": diagnostics.warnings(),
        "summary": {
            "errors": diagnostics.errors().len(),
            "warnings": diagnostics.warnings().len(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_summary(diagnostics: &Diagnostics) {
    println!(
        "errors={} warnings={}",
        diagnostics.errors().len(),
        diagnostics.warnings().len()
    );
}

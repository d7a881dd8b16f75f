use std::{path::PathBuf, process::ExitCode};

mod check;
mod matrix;
mod terminal;

use check::Check;
use clap::ArgAction;
use matrix::Matrix;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the documents directory
    #[arg(short, long, default_value = "docs", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<ExitCode> {
        Self::setup_logging(self.verbose);
        Ok(self.command.run(self.root)?.into())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Check identifiers and cross-references
    ///
    /// Exits with status 2 if any error is found.
    Check(Check),

    /// Check the corpus, then print or write the traceability matrix
    ///
    /// The matrix joins every screen to its components, requirements, rules
    /// and flows. Nothing is produced if the check fails.
    Matrix(Matrix),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<Outcome> {
        match self {
            Self::Check(command) => command.run(root),
            Self::Matrix(command) => command.run(root),
        }
    }
}

/// How a command that ran to completion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No errors, and no warnings if warnings are denied.
    Clean,
    /// The corpus failed validation.
    Failed,
}

impl Outcome {
    const fn new(failed: bool) -> Self {
        if failed { Self::Failed } else { Self::Clean }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Clean => Self::SUCCESS,
            Outcome::Failed => Self::from(2_u8),
        }
    }
}

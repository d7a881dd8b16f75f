use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use doclint::{Directory, TraceMatrix};
use tracing::instrument;

use super::{Outcome, check::print_table, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check a system's documents, then print or write its traceability matrix")]
pub struct Matrix {
    /// The system to report on (a folder under `20-systems/`)
    #[arg(short, long)]
    system: String,

    /// Write the matrix to `27-traceability/matrix.md` instead of printing it
    #[arg(long)]
    write: bool,
}

impl Matrix {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<Outcome> {
        let directory = Directory::new(root, self.system);
        let config = directory.config();
        let (index, diagnostics) = directory.lint(&config)?;

        print_table(&diagnostics, false);
        if diagnostics.failed(config.deny_warnings) {
            return Ok(Outcome::Failed);
        }

        let matrix = TraceMatrix::build(&index);

        if self.write {
            let path = directory.matrix_path();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, matrix.to_string())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} matrix rows", matrix.rows().len());
            println!("Matrix written to: {}", path.display());
        } else {
            println!("\n{}\n", "--- MATRIX PREVIEW ---".dim());
            print!("{matrix}");
        }

        Ok(Outcome::Clean)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn matrix(root: &std::path::Path) -> Outcome {
        Matrix {
            system: "sgn".to_string(),
            write: true,
        }
        .run(root.to_path_buf())
        .unwrap()
    }

    #[test]
    fn writes_the_matrix_when_clean() {
        let root = tempfile::tempdir().unwrap();
        let screen = root.path().join("20-systems/sgn/21-screens/login/screen.yml");
        fs::create_dir_all(screen.parent().unwrap()).unwrap();
        fs::write(&screen, "id: TELA_LOGIN\n").unwrap();

        assert_eq!(matrix(root.path()), Outcome::Clean);
        let written =
            fs::read_to_string(root.path().join("20-systems/sgn/27-traceability/matrix.md")).unwrap();
        assert!(written.contains("`TELA_LOGIN`"));
    }

    #[test]
    fn nothing_is_written_when_the_check_fails() {
        let root = tempfile::tempdir().unwrap();
        let screen = root.path().join("20-systems/sgn/21-screens/login/screen.yml");
        fs::create_dir_all(screen.parent().unwrap()).unwrap();
        fs::write(&screen, "id: TELA_LOGIN\nrules:\n  - RN-404\n").unwrap();

        assert_eq!(matrix(root.path()), Outcome::Failed);
        assert!(!root.path().join("20-systems/sgn/27-traceability").exists());
    }
}

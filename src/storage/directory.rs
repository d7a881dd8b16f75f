//! A filesystem backed corpus of product documents
//!
//! The [`Directory`] knows the fixed layout of one system under the
//! documents root and loads it into a [`DocumentIndex`]:
//!
//! ```text
//! <root>/20-systems/<system>/
//!     21-screens/<slug>/screen.yml      (+ optional messages.yml)
//!     22-components/*.yml
//!     23-requirements/RF-*.yml
//!     24-rules/RN-*.yml
//!     25-flows/UC-*.yml
//!     27-traceability/matrix.md         (written, never read)
//! ```

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;
use walkdir::WalkDir;

use crate::{
    domain::{Config, Diagnostics, DocumentIndex, Entity, Kind, ValidationSink, Validator},
    storage::yaml::{ParseError, Value, parse_document},
};

const SYSTEMS_DIR: &str = "20-systems";
const SCREENS_DIR: &str = "21-screens";
const COMPONENTS_DIR: &str = "22-components";
const REQUIREMENTS_DIR: &str = "23-requirements";
const RULES_DIR: &str = "24-rules";
const FLOWS_DIR: &str = "25-flows";
const TRACEABILITY_DIR: &str = "27-traceability";

const SCREEN_FILE: &str = "screen.yml";
const MESSAGES_FILE: &str = "messages.yml";
const MATRIX_FILE: &str = "matrix.md";
const CONFIG_FILE: &str = "doclint.toml";

/// Errors that abort loading before any validation happens.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The system directory does not exist.
    #[error("system directory not found: {}", .0.display())]
    SystemNotFound(PathBuf),

    /// A file or directory could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// A document is structurally malformed.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// The document being parsed.
        path: PathBuf,
        /// The underlying error.
        source: ParseError,
    },
}

/// One system's documents under a documents root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// The documents root, holding `20-systems/` and `doclint.toml`.
    root: PathBuf,
    system: String,
}

impl Directory {
    /// Opens the given system under a documents root.
    #[must_use]
    pub const fn new(root: PathBuf, system: String) -> Self {
        Self { root, system }
    }

    /// The documents root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory holding this system's documents.
    #[must_use]
    pub fn system_root(&self) -> PathBuf {
        self.root.join(SYSTEMS_DIR).join(&self.system)
    }

    /// Where the traceability matrix is written.
    #[must_use]
    pub fn matrix_path(&self) -> PathBuf {
        self.system_root().join(TRACEABILITY_DIR).join(MATRIX_FILE)
    }

    /// Loads `doclint.toml` from the documents root, falling back to the
    /// defaults if it is missing or invalid.
    #[must_use]
    pub fn config(&self) -> Config {
        let path = self.root.join(CONFIG_FILE);
        Config::load(&path).unwrap_or_else(|e| {
            tracing::debug!("Failed to load config: {e}");
            Config::default()
        })
    }

    /// Loads every document of the system into an index.
    ///
    /// Kinds are loaded in a fixed order (screens with their messages,
    /// components, requirements, rules, flows) and files within a kind in
    /// file-name order. Documents without an `id`, and repeated ids, are
    /// reported to `sink` and left out of the index.
    ///
    /// # Errors
    ///
    /// Returns an error if the system directory does not exist, if a file
    /// cannot be read, or if a document is malformed. Nothing is returned in
    /// that case, not even a partial index.
    #[instrument(level = "debug", skip(self, config, sink), fields(system = %self.system))]
    pub fn load(
        &self,
        config: &Config,
        sink: &mut impl ValidationSink,
    ) -> Result<DocumentIndex, LoadError> {
        let base = self.system_root();
        if !base.is_dir() {
            return Err(LoadError::SystemNotFound(base));
        }

        let mut loader = Loader {
            index: DocumentIndex::new(),
            folded_fields: config.folded_fields(),
            sink,
        };

        for folder in entries(&base.join(SCREENS_DIR), |path| path.is_dir())? {
            let screen = folder.join(SCREEN_FILE);
            if screen.is_file() {
                loader.load_document(Kind::Screen, &screen)?;
            }
            let messages = folder.join(MESSAGES_FILE);
            if messages.is_file() {
                loader.load_messages(&messages)?;
            }
        }

        for (dir, kind, prefix) in [
            (COMPONENTS_DIR, Kind::Component, ""),
            (REQUIREMENTS_DIR, Kind::Requirement, "RF-"),
            (RULES_DIR, Kind::Rule, "RN-"),
            (FLOWS_DIR, Kind::Flow, "UC-"),
        ] {
            for path in entries(&base.join(dir), |path| is_document(path, prefix))? {
                loader.load_document(kind, &path)?;
            }
        }

        tracing::debug!(entities = loader.index.len(), "loaded system");
        Ok(loader.index)
    }

    /// Loads the system and runs every validation over it.
    ///
    /// # Errors
    ///
    /// See [`Directory::load`].
    pub fn lint(&self, config: &Config) -> Result<(DocumentIndex, Diagnostics), LoadError> {
        let mut diagnostics = Diagnostics::new();
        let index = self.load(config, &mut diagnostics)?;
        Validator::new(&index).run(&mut diagnostics);
        Ok((index, diagnostics))
    }
}

struct Loader<'a, S> {
    index: DocumentIndex,
    folded_fields: &'a [String],
    sink: &'a mut S,
}

impl<S: ValidationSink> Loader<'_, S> {
    fn load_document(&mut self, kind: Kind, path: &Path) -> Result<(), LoadError> {
        tracing::debug!("Loading {kind} from {}", path.display());
        let value = self.read(path)?;
        self.insert(kind, path, value);
        Ok(())
    }

    /// Each item of the top-level `messages` list is a message entity.
    fn load_messages(&mut self, path: &Path) -> Result<(), LoadError> {
        tracing::debug!("Loading messages from {}", path.display());
        let value = self.read(path)?;
        let Some(Value::Sequence(messages)) = value.get("messages") else {
            return Ok(());
        };
        for message in messages {
            self.insert(Kind::Message, path, message.clone());
        }
        Ok(())
    }

    fn insert(&mut self, kind: Kind, path: &Path, value: Value) {
        let Some(entity) = Entity::from_value(kind, path.to_path_buf(), value) else {
            self.sink
                .error(format!("[{kind}] missing id in {}", path.display()));
            return;
        };
        if let Err(duplicate) = self.index.insert(entity) {
            self.sink.error(duplicate.to_string());
        }
    }

    fn read(&self, path: &Path) -> Result<Value, LoadError> {
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_document(&source, self.folded_fields).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The direct children of `dir` accepted by `filter`, sorted by file name.
///
/// A missing directory has no children.
fn entries(dir: &Path, filter: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if filter(entry.path()) => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(LoadError::Io {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e.into(),
            })),
        })
        .collect()
}

/// A visible `*.yml` file whose name starts with `prefix`.
fn is_document(path: &Path, prefix: &str) -> bool {
    let Some(name) = path.file_name().and_then(OsStr::to_str) else {
        return false;
    };
    path.is_file()
        && !name.starts_with('.')
        && name.starts_with(prefix)
        && path.extension() == Some(OsStr::new("yml"))
}

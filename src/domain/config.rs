use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for linting a documentation corpus.
///
/// Read from `doclint.toml` in the documents root. Every setting has a
/// default, so the file is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Top-level keys whose `>` or `|` blocks are recovered as text.
    ///
    /// Other keys written in block style keep the marker as their value.
    folded_fields: Vec<String>,

    /// Whether naming-convention warnings fail the run like errors do.
    pub deny_warnings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            folded_fields: default_folded_fields(),
            deny_warnings: false,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Top-level keys whose block text is recovered.
    #[must_use]
    pub fn folded_fields(&self) -> &[String] {
        &self.folded_fields
    }
}

fn default_folded_fields() -> Vec<String> {
    vec!["purpose".to_string()]
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_folded_fields")]
        folded_fields: Vec<String>,

        #[serde(default)]
        deny_warnings: bool,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                folded_fields,
                deny_warnings,
            } => Self {
                folded_fields,
                deny_warnings,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            folded_fields: config.folded_fields,
            deny_warnings: config.deny_warnings,
        }
    }
}

/// Loading a system's documents from disk.
pub mod directory;
/// Minimal reader for the corpus' YAML subset.
pub mod yaml;

pub use directory::{Directory, LoadError};

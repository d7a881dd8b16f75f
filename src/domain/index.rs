//! In-memory tables of loaded entities, one per kind.
//!
//! The [`DocumentIndex`] knows nothing about the filesystem. It is built
//! once per run and only read afterwards.

use std::{collections::BTreeMap, path::PathBuf};

use thiserror::Error;

use crate::domain::{Entity, Kind};

/// Entities of every kind, keyed by their declared identifier.
///
/// Every key equals the `id` of the entity stored under it.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    screens: BTreeMap<String, Entity>,
    components: BTreeMap<String, Entity>,
    requirements: BTreeMap<String, Entity>,
    rules: BTreeMap<String, Entity>,
    flows: BTreeMap<String, Entity>,
    messages: BTreeMap<String, Entity>,
}

/// An identifier declared twice within one kind.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("[{kind}] duplicate id '{id}' in {} (first declared in {})", .duplicate.display(), .first.display())]
pub struct DuplicateId {
    /// Kind of both entities.
    pub kind: Kind,
    /// The repeated identifier.
    pub id: String,
    /// Where the identifier was first declared.
    pub first: PathBuf,
    /// Where it was declared again.
    pub duplicate: PathBuf,
}

impl DocumentIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for one kind.
    #[must_use]
    pub const fn table(&self, kind: Kind) -> &BTreeMap<String, Entity> {
        match kind {
            Kind::Screen => &self.screens,
            Kind::Component => &self.components,
            Kind::Requirement => &self.requirements,
            Kind::Rule => &self.rules,
            Kind::Flow => &self.flows,
            Kind::Message => &self.messages,
        }
    }

    const fn table_mut(&mut self, kind: Kind) -> &mut BTreeMap<String, Entity> {
        match kind {
            Kind::Screen => &mut self.screens,
            Kind::Component => &mut self.components,
            Kind::Requirement => &mut self.requirements,
            Kind::Rule => &mut self.rules,
            Kind::Flow => &mut self.flows,
            Kind::Message => &mut self.messages,
        }
    }

    /// Adds an entity to the table for its kind.
    ///
    /// # Errors
    ///
    /// Returns an error, and keeps the existing entity, if the identifier is
    /// already taken within that kind.
    pub fn insert(&mut self, entity: Entity) -> Result<(), DuplicateId> {
        let table = self.table_mut(entity.kind());
        if let Some(first) = table.get(entity.id()) {
            return Err(DuplicateId {
                kind: entity.kind(),
                id: entity.id().to_string(),
                first: first.path().to_path_buf(),
                duplicate: entity.path().to_path_buf(),
            });
        }
        table.insert(entity.id().to_string(), entity);
        Ok(())
    }

    /// Looks up an entity by kind and identifier.
    #[must_use]
    pub fn get(&self, kind: Kind, id: &str) -> Option<&Entity> {
        self.table(kind).get(id)
    }

    /// Whether an identifier exists within a kind.
    #[must_use]
    pub fn contains(&self, kind: Kind, id: &str) -> bool {
        self.table(kind).contains_key(id)
    }

    /// Entities of one kind, ordered by identifier.
    pub fn entities(&self, kind: Kind) -> impl Iterator<Item = &Entity> {
        self.table(kind).values()
    }

    /// Total number of entities across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        Kind::ALL.iter().map(|&kind| self.table(kind).len()).sum()
    }

    /// Whether no entity of any kind has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

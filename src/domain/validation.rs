//! Identifier and cross-reference checks over a [`DocumentIndex`].
//!
//! Problems are never returned as `Err`. Each one becomes a single line
//! appended to a [`ValidationSink`], so one pass reports everything it finds.

use std::path::Path;

use serde::Serialize;
use tracing::instrument;

use crate::domain::{
    DocumentIndex, Entity, Kind,
    entity::{Component, Flow, Requirement, Rule, Screen},
};

/// Receives the problems found while loading and validating.
///
/// Append-only for the duration of one run.
pub trait ValidationSink {
    /// Records a problem that fails the run.
    fn error(&mut self, message: String);

    /// Records a problem that does not fail the run.
    fn warning(&mut self, message: String);
}

/// Errors and warnings collected in the order they were found.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Problems that fail the run.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Problems that do not fail the run.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Whether the run failed, optionally treating warnings as failures.
    #[must_use]
    pub fn failed(&self, deny_warnings: bool) -> bool {
        !self.errors.is_empty() || (deny_warnings && !self.warnings.is_empty())
    }

    /// Whether nothing at all was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

impl ValidationSink for Diagnostics {
    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warning(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Warns if `id` does not follow the naming convention for `kind`.
pub fn validate_id(kind: Kind, id: &str, location: &Path, sink: &mut impl ValidationSink) {
    if !kind.matches_id(id) {
        sink.warning(format!(
            "[id] {kind} id '{id}' does not match the naming pattern in {}",
            location.display()
        ));
    }
}

/// Checks declared identifiers and every reference between entities.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    index: &'a DocumentIndex,
}

impl<'a> Validator<'a> {
    /// Creates a validator over a fully loaded index.
    #[must_use]
    pub const fn new(index: &'a DocumentIndex) -> Self {
        Self { index }
    }

    /// Records an error if `id` is not a known entity of `kind`.
    pub fn ensure_ref_exists(
        &self,
        kind: Kind,
        id: &str,
        location: &Path,
        sink: &mut impl ValidationSink,
    ) {
        if !self.index.contains(kind, id) {
            sink.error(format!(
                "[ref] {kind} '{id}' not found, referenced in {}",
                location.display()
            ));
        }
    }

    /// Runs every check over every kind.
    ///
    /// Kinds are visited in a fixed order (screens, components,
    /// requirements, rules, flows, then message identifiers). Problems in one
    /// kind never stop the others from being checked.
    #[instrument(level = "debug", skip_all)]
    pub fn run(&self, sink: &mut impl ValidationSink) {
        for entity in self.index.entities(Kind::Screen) {
            validate_id(Kind::Screen, entity.id(), entity.path(), sink);
            self.check_screen(Screen::new(entity), sink);
        }
        for entity in self.index.entities(Kind::Component) {
            validate_id(Kind::Component, entity.id(), entity.path(), sink);
            self.check_component(entity, sink);
        }
        for entity in self.index.entities(Kind::Requirement) {
            validate_id(Kind::Requirement, entity.id(), entity.path(), sink);
            self.check_requirement(entity, sink);
        }
        for entity in self.index.entities(Kind::Rule) {
            validate_id(Kind::Rule, entity.id(), entity.path(), sink);
            self.check_rule(entity, sink);
        }
        for entity in self.index.entities(Kind::Flow) {
            validate_id(Kind::Flow, entity.id(), entity.path(), sink);
            self.check_flow(entity, sink);
        }
        for entity in self.index.entities(Kind::Message) {
            validate_id(Kind::Message, entity.id(), entity.path(), sink);
        }
        tracing::debug!(entities = self.index.len(), "validation pass complete");
    }

    fn check_all<I>(&self, kind: Kind, ids: I, location: &Path, sink: &mut impl ValidationSink)
    where
        I: IntoIterator<Item = String>,
    {
        for id in ids {
            self.ensure_ref_exists(kind, &id, location, sink);
        }
    }

    /// Checks a reference whose target kind is given by its prefix, among
    /// the `allowed` kinds. Anything else is ignored.
    fn check_prefixed(
        &self,
        id: &str,
        allowed: &[Kind],
        location: &Path,
        sink: &mut impl ValidationSink,
    ) {
        if let Some(kind) = Kind::from_reference(id).filter(|kind| allowed.contains(kind)) {
            self.ensure_ref_exists(kind, id, location, sink);
        }
    }

    fn check_screen(&self, screen: Screen<'_>, sink: &mut impl ValidationSink) {
        let at = screen.entity().path();
        self.check_all(Kind::Component, screen.components(), at, sink);
        self.check_all(Kind::Requirement, screen.requirements(), at, sink);
        self.check_all(Kind::Rule, screen.rules(), at, sink);
        self.check_all(Kind::Flow, screen.flows(), at, sink);
    }

    fn check_component(&self, entity: &Entity, sink: &mut impl ValidationSink) {
        let component = Component::new(entity);
        let at = entity.path();
        self.check_all(Kind::Screen, component.screens(), at, sink);
        for reference in component.validation_refs() {
            self.check_prefixed(&reference, &[Kind::Rule, Kind::Requirement], at, sink);
        }
        for reference in component.behavior_refs() {
            self.check_prefixed(&reference, &[Kind::Flow], at, sink);
        }
    }

    fn check_requirement(&self, entity: &Entity, sink: &mut impl ValidationSink) {
        let requirement = Requirement::new(entity);
        let at = entity.path();
        self.check_all(Kind::Screen, requirement.scope_screen(), at, sink);
        self.check_all(Kind::Component, requirement.scope_component(), at, sink);
        self.check_all(Kind::Message, requirement.shown_messages(), at, sink);
        self.check_all(Kind::Rule, requirement.linked_rules(), at, sink);
        self.check_all(Kind::Flow, requirement.linked_flows(), at, sink);
        self.check_all(Kind::Message, requirement.linked_messages(), at, sink);
    }

    fn check_rule(&self, entity: &Entity, sink: &mut impl ValidationSink) {
        let rule = Rule::new(entity);
        let at = entity.path();
        self.check_all(Kind::Message, rule.message_ref(), at, sink);
        self.check_all(Kind::Screen, rule.applies_to_screens(), at, sink);
        self.check_all(Kind::Component, rule.applies_to_components(), at, sink);
    }

    fn check_flow(&self, entity: &Entity, sink: &mut impl ValidationSink) {
        let flow = Flow::new(entity);
        let at = entity.path();
        self.check_all(Kind::Screen, flow.trigger_screen(), at, sink);
        self.check_all(Kind::Component, flow.trigger_component(), at, sink);
        for reference in flow.step_refs() {
            self.check_prefixed(
                &reference,
                &[Kind::Requirement, Kind::Rule, Kind::Flow, Kind::Message],
                at,
                sink,
            );
        }
    }
}

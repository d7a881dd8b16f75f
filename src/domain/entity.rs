//! Loaded documents and typed views over their fields.
//!
//! An [`Entity`] is an untyped mapping plus its identity. The views
//! ([`Screen`], [`Component`], [`Requirement`], [`Rule`], [`Flow`]) name the
//! fields each kind may carry, so an absent field is an empty list or `None`
//! rather than a failed lookup.

use std::path::{Path, PathBuf};

use non_empty_string::NonEmptyString;

use crate::{
    domain::Kind,
    storage::yaml::{Mapping, Value},
};

/// A document loaded from the corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: Kind,
    id: NonEmptyString,
    path: PathBuf,
    data: Mapping,
}

impl Entity {
    /// Builds an entity from a parsed document.
    ///
    /// Returns `None` if the document has no usable `id`: the field is
    /// absent, blank, not a scalar, or the document is not a mapping.
    #[must_use]
    pub fn from_value(kind: Kind, path: PathBuf, value: Value) -> Option<Self> {
        let Value::Mapping(data) = value else {
            return None;
        };
        let id = data
            .get("id")
            .and_then(Value::to_scalar_string)
            .and_then(|id| NonEmptyString::new(id.trim().to_string()).ok())?;
        Some(Self {
            kind,
            id,
            path,
            data,
        })
    }

    /// The kind of document.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// The declared identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// The file the entity was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All fields of the document.
    #[must_use]
    pub const fn data(&self) -> &Mapping {
        &self.data
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn nested(&self, key: &str, inner: &str) -> Option<&Value> {
        self.field(key).and_then(|v| v.get(inner))
    }
}

/// Non-blank text of a scalar.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::to_scalar_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Items of a sequence of scalar identifiers. Blank and non-scalar items are
/// skipped.
fn ids(value: Option<&Value>) -> Vec<String> {
    items(value).iter().filter_map(|v| text(Some(v))).collect()
}

/// Items of a sequence where each item is either an identifier or a mapping
/// carrying the identifier under `key`.
fn keyed_ids(value: Option<&Value>, key: &str) -> Vec<String> {
    items(value)
        .iter()
        .filter_map(|item| match item {
            Value::Mapping(map) => text(map.get(key)),
            scalar => text(Some(scalar)),
        })
        .collect()
}

fn items(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_sequence).unwrap_or_default()
}

/// Typed view of a screen.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a>(&'a Entity);

impl<'a> Screen<'a> {
    /// Views an entity as a screen.
    #[must_use]
    pub const fn new(entity: &'a Entity) -> Self {
        Self(entity)
    }

    /// The underlying entity.
    #[must_use]
    pub const fn entity(&self) -> &'a Entity {
        self.0
    }

    /// Components listed on the screen, inline or as `{ id: ... }` objects.
    #[must_use]
    pub fn components(&self) -> Vec<String> {
        keyed_ids(self.0.field("components"), "id")
    }

    /// Requirements listed on the screen.
    #[must_use]
    pub fn requirements(&self) -> Vec<String> {
        ids(self.0.field("requirements"))
    }

    /// Rules listed on the screen.
    #[must_use]
    pub fn rules(&self) -> Vec<String> {
        ids(self.0.field("rules"))
    }

    /// Flows listed on the screen.
    #[must_use]
    pub fn flows(&self) -> Vec<String> {
        ids(self.0.field("flows"))
    }

    /// `figma.url`, if present.
    #[must_use]
    pub fn figma_url(&self) -> Option<String> {
        text(self.0.nested("figma", "url"))
    }
}

/// Typed view of a UI component.
#[derive(Debug, Clone, Copy)]
pub struct Component<'a>(&'a Entity);

impl<'a> Component<'a> {
    /// Views an entity as a component.
    #[must_use]
    pub const fn new(entity: &'a Entity) -> Self {
        Self(entity)
    }

    /// Screens the component claims to appear on.
    #[must_use]
    pub fn screens(&self) -> Vec<String> {
        ids(self.0.field("screens"))
    }

    /// `validations[].ref`, or the item itself when it is a bare identifier.
    #[must_use]
    pub fn validation_refs(&self) -> Vec<String> {
        keyed_ids(self.0.field("validations"), "ref")
    }

    /// `behavior_refs[]`.
    #[must_use]
    pub fn behavior_refs(&self) -> Vec<String> {
        ids(self.0.field("behavior_refs"))
    }
}

/// Typed view of a functional requirement.
#[derive(Debug, Clone, Copy)]
pub struct Requirement<'a>(&'a Entity);

impl<'a> Requirement<'a> {
    /// Views an entity as a requirement.
    #[must_use]
    pub const fn new(entity: &'a Entity) -> Self {
        Self(entity)
    }

    /// `scope.screen`.
    #[must_use]
    pub fn scope_screen(&self) -> Option<String> {
        text(self.0.nested("scope", "screen"))
    }

    /// `scope.component`.
    #[must_use]
    pub fn scope_component(&self) -> Option<String> {
        text(self.0.nested("scope", "component"))
    }

    /// Every `show_message` action under `behavior.alternatives[].then[]`.
    #[must_use]
    pub fn shown_messages(&self) -> Vec<String> {
        items(self.0.nested("behavior", "alternatives"))
            .iter()
            .flat_map(|alternative| items(alternative.get("then")))
            .filter_map(|action| text(action.get("show_message")))
            .collect()
    }

    /// `links.rules`.
    #[must_use]
    pub fn linked_rules(&self) -> Vec<String> {
        ids(self.0.nested("links", "rules"))
    }

    /// `links.flows`.
    #[must_use]
    pub fn linked_flows(&self) -> Vec<String> {
        ids(self.0.nested("links", "flows"))
    }

    /// `links.messages`.
    #[must_use]
    pub fn linked_messages(&self) -> Vec<String> {
        ids(self.0.nested("links", "messages"))
    }
}

/// Typed view of a business rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule<'a>(&'a Entity);

impl<'a> Rule<'a> {
    /// Views an entity as a rule.
    #[must_use]
    pub const fn new(entity: &'a Entity) -> Self {
        Self(entity)
    }

    /// `message.ref`.
    #[must_use]
    pub fn message_ref(&self) -> Option<String> {
        text(self.0.nested("message", "ref"))
    }

    /// `applies_to.screens`.
    #[must_use]
    pub fn applies_to_screens(&self) -> Vec<String> {
        ids(self.0.nested("applies_to", "screens"))
    }

    /// `applies_to.components`.
    #[must_use]
    pub fn applies_to_components(&self) -> Vec<String> {
        ids(self.0.nested("applies_to", "components"))
    }
}

/// Typed view of a use-case flow.
#[derive(Debug, Clone, Copy)]
pub struct Flow<'a>(&'a Entity);

impl<'a> Flow<'a> {
    /// Views an entity as a flow.
    #[must_use]
    pub const fn new(entity: &'a Entity) -> Self {
        Self(entity)
    }

    /// `trigger.screen`.
    #[must_use]
    pub fn trigger_screen(&self) -> Option<String> {
        text(self.0.nested("trigger", "screen"))
    }

    /// `trigger.component`.
    #[must_use]
    pub fn trigger_component(&self) -> Option<String> {
        text(self.0.nested("trigger", "component"))
    }

    /// Identifiers listed under `refs` in the steps of `main_flow`, then of
    /// `alternative_flows`.
    ///
    /// Both fields hold a list of steps. A step is a mapping whose `refs`
    /// list is read first, followed by the sub-steps under its [`SUB_STEPS`]
    /// fields in that order. Steps written as plain text carry no
    /// references; any other field of a step is not searched.
    #[must_use]
    pub fn step_refs(&self) -> Vec<String> {
        let mut refs = Vec::new();
        for root in ["main_flow", "alternative_flows"] {
            if let Some(steps) = self.0.field(root) {
                self.walk_steps(root, steps, &mut refs);
            }
        }
        refs
    }

    fn walk_steps(&self, field: &str, steps: &Value, refs: &mut Vec<String>) {
        match steps {
            Value::Sequence(steps) => {
                for step in steps {
                    self.walk_step(step, refs);
                }
            }
            Value::Mapping(_) => self.walk_step(steps, refs),
            other => tracing::debug!(
                path = %self.0.path().display(),
                field,
                "expected a list of steps, found `{other}`"
            ),
        }
    }

    fn walk_step(&self, step: &Value, refs: &mut Vec<String>) {
        let Value::Mapping(fields) = step else {
            return;
        };
        match fields.get("refs") {
            Some(Value::Sequence(list)) => {
                refs.extend(list.iter().filter_map(Value::as_str).map(str::to_string));
            }
            Some(other) => tracing::debug!(
                path = %self.0.path().display(),
                "expected a list of references, found `{other}`"
            ),
            None => {}
        }
        for field in SUB_STEPS {
            if let Some(steps) = fields.get(field) {
                self.walk_steps(field, steps, refs);
            }
        }
    }
}

/// Step fields that hold nested steps.
pub const SUB_STEPS: [&str; 3] = ["steps", "then", "else"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::yaml::parse_document;

    fn entity(kind: Kind, source: &str) -> Entity {
        let value = parse_document(source, &["purpose"]).unwrap();
        Entity::from_value(kind, PathBuf::from("doc.yml"), value).unwrap()
    }

    #[test]
    fn missing_or_blank_id_is_rejected() {
        for source in ["name: X\n", "id: \"  \"\n", "id:\n  nested: true\n", "- id: X\n"] {
            let value = parse_document::<&str>(source, &[]).unwrap();
            assert!(Entity::from_value(Kind::Screen, PathBuf::new(), value).is_none(), "{source}");
        }
    }

    #[test]
    fn id_is_trimmed_and_numbers_are_accepted() {
        let value = parse_document::<&str>("id: 123\n", &[]).unwrap();
        let entity = Entity::from_value(Kind::Rule, PathBuf::new(), value).unwrap();
        assert_eq!(entity.id(), "123");
    }

    #[test]
    fn screen_fields() {
        let screen = entity(
            Kind::Screen,
            "\
id: TELA_LOGIN
figma:
  url: https://figma.com/x
components:
  - id: INP_EMAIL
  - BTN_SUBMIT
  - label: no id here
requirements:
  - RF-001
  - \"\"
",
        );
        let view = Screen::new(&screen);
        assert_eq!(view.components(), ["INP_EMAIL", "BTN_SUBMIT"]);
        assert_eq!(view.requirements(), ["RF-001"]);
        assert!(view.rules().is_empty());
        assert_eq!(view.figma_url().as_deref(), Some("https://figma.com/x"));
    }

    #[test]
    fn component_fields() {
        let component = entity(
            Kind::Component,
            "\
id: BTN_SUBMIT
screens:
  - TELA_LOGIN
validations:
  - ref: RN-001
    when: blur
  - RF-002
behavior_refs:
  - UC-001-login
",
        );
        let view = Component::new(&component);
        assert_eq!(view.screens(), ["TELA_LOGIN"]);
        assert_eq!(view.validation_refs(), ["RN-001", "RF-002"]);
        assert_eq!(view.behavior_refs(), ["UC-001-login"]);
    }

    #[test]
    fn requirement_fields() {
        let requirement = entity(
            Kind::Requirement,
            "\
id: RF-001
scope:
  screen: TELA_LOGIN
behavior:
  alternatives:
    - when: invalid
      then:
        - show_message: MSG-INVALID
        - focus: INP_EMAIL
    - when: locked
      then:
        - show_message: MSG-LOCKED
links:
  rules:
    - RN-001
  messages:
    - MSG-OK
",
        );
        let view = Requirement::new(&requirement);
        assert_eq!(view.scope_screen().as_deref(), Some("TELA_LOGIN"));
        assert_eq!(view.scope_component(), None);
        assert_eq!(view.shown_messages(), ["MSG-INVALID", "MSG-LOCKED"]);
        assert_eq!(view.linked_rules(), ["RN-001"]);
        assert!(view.linked_flows().is_empty());
        assert_eq!(view.linked_messages(), ["MSG-OK"]);
    }

    #[test]
    fn rule_fields() {
        let rule = entity(
            Kind::Rule,
            "\
id: RN-001
message:
  ref: MSG-REQUIRED
applies_to:
  screens:
    - TELA_LOGIN
  components:
    - INP_EMAIL
",
        );
        let view = Rule::new(&rule);
        assert_eq!(view.message_ref().as_deref(), Some("MSG-REQUIRED"));
        assert_eq!(view.applies_to_screens(), ["TELA_LOGIN"]);
        assert_eq!(view.applies_to_components(), ["INP_EMAIL"]);
    }

    #[test]
    fn flow_step_refs_are_found_at_any_depth() {
        let flow = entity(
            Kind::Flow,
            "\
id: UC-001-login
trigger:
  screen: TELA_LOGIN
  component: BTN_SUBMIT
main_flow:
  - step: 1
    refs:
      - RF-001
      - RN-001
  - step: 2
    steps:
      - step: 2.1
        refs:
          - MSG-OK
alternative_flows:
  - id: A1
    refs:
      - UC-002-recover
      - TELA_OTHER
",
        );
        let view = Flow::new(&flow);
        assert_eq!(view.trigger_screen().as_deref(), Some("TELA_LOGIN"));
        assert_eq!(view.trigger_component().as_deref(), Some("BTN_SUBMIT"));
        assert_eq!(
            view.step_refs(),
            ["RF-001", "RN-001", "MSG-OK", "UC-002-recover", "TELA_OTHER"]
        );
    }

    #[test]
    fn flow_walk_follows_only_step_fields() {
        let flow = entity(
            Kind::Flow,
            "\
id: UC-002-recover
main_flow:
  - User opens the form
  - step: 1
    else:
      - refs:
          - RN-002
      - refs:
        - RN-003
    then:
      - refs:
        - RF-002
    notes:
      refs:
        - RF-999
    refs: RF-000
alternative_flows: none
",
        );
        assert_eq!(Flow::new(&flow).step_refs(), ["RF-002", "RN-003"]);
    }
}

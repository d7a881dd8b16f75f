use std::{fmt, sync::LazyLock};

use regex::Regex;

/// A category of document, each with its own identifier namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// A screen (`TELA_*`).
    Screen,
    /// A UI component (`BTN_*`, `INP_*`, ...).
    Component,
    /// A functional requirement (`RF-###`).
    Requirement,
    /// A business rule (`RN-###`).
    Rule,
    /// A use-case flow (`UC-###-*`).
    Flow,
    /// A user-facing message (`MSG-*`).
    Message,
}

static SCREEN_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r"^TELA_[A-Z0-9_]+$"));
static COMPONENT_ID: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(INP|BTN|LBL|SEL|TAB|GRD|CHK|RAD|TXT|LNK|ICO|MOD)_[A-Z0-9_]+$")
});
static REQUIREMENT_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r"^RF-\d{3}$"));
static RULE_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r"^RN-\d{3}$"));
static FLOW_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r"^UC-\d{3}-.+"));
static MESSAGE_ID: LazyLock<Regex> = LazyLock::new(|| pattern(r"^MSG-[A-Z0-9-]+$"));

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("identifier patterns are valid")
}

impl Kind {
    /// The kinds in validation order.
    pub const ALL: [Self; 6] = [
        Self::Screen,
        Self::Component,
        Self::Requirement,
        Self::Rule,
        Self::Flow,
        Self::Message,
    ];

    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Component => "component",
            Self::Requirement => "requirement",
            Self::Rule => "rule",
            Self::Flow => "flow",
            Self::Message => "message",
        }
    }

    /// Whether `id` follows the naming convention for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use doclint::Kind;
    ///
    /// assert!(Kind::Rule.matches_id("RN-001"));
    /// assert!(!Kind::Rule.matches_id("reg-01"));
    /// assert!(Kind::Flow.matches_id("UC-001-login"));
    /// ```
    #[must_use]
    pub fn matches_id(self, id: &str) -> bool {
        let re: &Regex = match self {
            Self::Screen => &*SCREEN_ID,
            Self::Component => &*COMPONENT_ID,
            Self::Requirement => &*REQUIREMENT_ID,
            Self::Rule => &*RULE_ID,
            Self::Flow => &*FLOW_ID,
            Self::Message => &*MESSAGE_ID,
        };
        re.is_match(id)
    }

    /// Infers the target kind of a reference from its prefix.
    ///
    /// Only the dash-prefixed kinds (`RF-`, `RN-`, `UC-`, `MSG-`) can be
    /// inferred; anything else is `None`.
    #[must_use]
    pub fn from_reference(id: &str) -> Option<Self> {
        [
            ("RF-", Self::Requirement),
            ("RN-", Self::Rule),
            ("UC-", Self::Flow),
            ("MSG-", Self::Message),
        ]
        .into_iter()
        .find_map(|(prefix, kind)| id.starts_with(prefix).then_some(kind))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Kind::Screen, "TELA_LOGIN")]
    #[test_case(Kind::Screen, "TELA_2FA_SETUP")]
    #[test_case(Kind::Component, "BTN_SUBMIT")]
    #[test_case(Kind::Component, "MOD_CONFIRM_1")]
    #[test_case(Kind::Requirement, "RF-001")]
    #[test_case(Kind::Rule, "RN-999")]
    #[test_case(Kind::Flow, "UC-001-login")]
    #[test_case(Kind::Message, "MSG-LOGIN-FAILED")]
    fn conforming_ids(kind: Kind, id: &str) {
        assert!(kind.matches_id(id));
    }

    #[test_case(Kind::Screen, "TELA_"; "screen without suffix")]
    #[test_case(Kind::Screen, "tela_login"; "lowercase screen")]
    #[test_case(Kind::Component, "BUT_SUBMIT"; "unknown component prefix")]
    #[test_case(Kind::Component, "BTN_submit"; "lowercase component")]
    #[test_case(Kind::Requirement, "RF-01"; "two digits")]
    #[test_case(Kind::Requirement, "RF-0001"; "four digits")]
    #[test_case(Kind::Rule, "reg-01"; "lowercase rule")]
    #[test_case(Kind::Flow, "UC-001"; "flow without slug")]
    #[test_case(Kind::Flow, "UC-001-"; "flow with empty slug")]
    #[test_case(Kind::Message, "MSG-bad"; "lowercase message")]
    fn nonconforming_ids(kind: Kind, id: &str) {
        assert!(!kind.matches_id(id));
    }

    #[test_case("RF-001", Some(Kind::Requirement))]
    #[test_case("RN-002", Some(Kind::Rule))]
    #[test_case("UC-003-x", Some(Kind::Flow))]
    #[test_case("MSG-OK", Some(Kind::Message))]
    #[test_case("TELA_X", None)]
    #[test_case("rf-001", None)]
    fn reference_prefixes(id: &str, expected: Option<Kind>) {
        assert_eq!(Kind::from_reference(id), expected);
    }
}

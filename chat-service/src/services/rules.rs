//! Pre-model message rules.
//!
//! Rules are evaluated in order and the first match wins. The default set
//! puts creator-claim detection ahead of name declaration, so a message
//! matching both is only ever treated as a creator claim.

use crate::models::SessionProfile;

/// Canned reply to anyone claiming to have built the assistant.
pub const CREATOR_DENIAL: &str =
    "You are not my creator. Leo is my only creator. But I can still help you.";

const CREATOR_PHRASES: [&str; 4] = [
    "i made you",
    "i built you",
    "i created you",
    "my name is leo",
];

const CREATOR_SELF_ID: &str = "i am leo";
const NEGATION: &str = "not";
const NAME_PREFIX: &str = "my name is ";

/// What the rule engine decided about a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Reply with [`CREATOR_DENIAL`]; skip the model.
    CreatorClaim,
    /// The user declared their name; store it and continue to the model.
    NameDeclared(String),
    NoRule,
}

impl RuleOutcome {
    /// Stable label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RuleOutcome::CreatorClaim => "creator_claim",
            RuleOutcome::NameDeclared(_) => "name_declared",
            RuleOutcome::NoRule => "no_rule",
        }
    }
}

/// A message with its lower-cased form computed once for all rules.
pub struct MessageView<'a> {
    pub original: &'a str,
    pub lower: String,
}

impl<'a> MessageView<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lower: original.to_lowercase(),
        }
    }
}

/// A predicate and the outcome it produces when it matches.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub predicate: fn(&SessionProfile, &MessageView<'_>) -> bool,
    pub action: fn(&MessageView<'_>) -> RuleOutcome,
}

impl Rule {
    pub fn creator_claim() -> Self {
        Rule {
            name: "creator_claim",
            predicate: |_, msg| is_creator_claim(&msg.lower),
            action: |_| RuleOutcome::CreatorClaim,
        }
    }

    pub fn name_declaration() -> Self {
        Rule {
            name: "name_declaration",
            predicate: |_, msg| declared_name(msg.original).is_some(),
            action: |msg| match declared_name(msg.original) {
                Some(name) => RuleOutcome::NameDeclared(name.to_string()),
                None => RuleOutcome::NoRule,
            },
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(vec![Rule::creator_claim(), Rule::name_declaration()])
    }
}

impl RuleEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Append a rule with the lowest priority.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Evaluate `message` for `session`. Pure: the caller applies any effect.
    pub fn evaluate(&self, session: &SessionProfile, message: &str) -> RuleOutcome {
        let view = MessageView::new(message);

        self.rules
            .iter()
            .find(|rule| (rule.predicate)(session, &view))
            .map(|rule| {
                tracing::debug!(rule = rule.name, user_id = %session.user_id, "Rule matched");
                (rule.action)(&view)
            })
            .unwrap_or(RuleOutcome::NoRule)
    }
}

fn is_creator_claim(lower: &str) -> bool {
    CREATOR_PHRASES.iter().any(|phrase| lower.contains(phrase))
        || (lower.contains(CREATOR_SELF_ID) && !lower.contains(NEGATION))
}

/// Name following a leading "my name is " (any ASCII case), trimmed.
/// Returns `None` when the prefix is absent. A blank remainder also yields
/// `None`: an empty name is never stored, so the message goes to the model
/// as an ordinary one.
fn declared_name(message: &str) -> Option<&str> {
    let prefix = message.get(..NAME_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(NAME_PREFIX) {
        return None;
    }
    let name = message[NAME_PREFIX.len()..].trim();
    (!name.is_empty()).then_some(name)
}

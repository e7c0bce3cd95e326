//! Rules — conditions bound to events or a scene, with trigger semantics.
//!
//! A rule is *valid* while all its conditions hold. Among valid rules only
//! those at the highest priority are *active*. An active rule with
//! `trigger: false` fires on every pass; a trigger rule fires once per
//! contiguous span of validity and re-arms when it becomes invalid.

mod target;

pub use target::{RuleTarget, SceneRef};

use serde::Deserialize;

use crate::condition::ConditionSpec;
use crate::error::ValidationError;

/// What an active rule should do on this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDecision {
    /// Trigger rule that has not fired during its current validity span.
    Fire,
    /// Non-trigger rule: fires again on every active pass.
    FireAgain,
    /// Trigger rule that already fired during this validity span.
    AlreadyTriggered,
}

impl FireDecision {
    #[must_use]
    pub fn should_execute(self) -> bool {
        !matches!(self, Self::AlreadyTriggered)
    }
}

/// A named binding of conditions to an action target.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    conditions: Vec<ConditionSpec>,
    trigger: bool,
    priority: i64,
    target: RuleTarget,
    validity: bool,
    triggered: bool,
}

impl Rule {
    /// Create a builder for constructing a [`Rule`].
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn conditions(&self) -> &[ConditionSpec] {
        &self.conditions
    }

    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.trigger
    }

    #[must_use]
    pub fn priority(&self) -> i64 {
        self.priority
    }

    #[must_use]
    pub fn target(&self) -> &RuleTarget {
        &self.target
    }

    /// Result of the last validity evaluation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validity
    }

    /// Whether the rule has fired during its current validity span.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Record the outcome of a fresh condition evaluation.
    ///
    /// A trigger rule moving from valid to invalid is re-armed so it can
    /// fire again the next time it becomes valid.
    pub fn update_validity(&mut self, valid: bool) -> bool {
        let was_valid = self.validity;
        self.validity = valid;
        if self.trigger && was_valid && !valid {
            self.triggered = false;
        }
        valid
    }

    /// Decide whether this rule, being active, should run now.
    #[must_use]
    pub fn fire_decision(&self) -> FireDecision {
        match (self.trigger, self.triggered) {
            (false, _) => FireDecision::FireAgain,
            (true, false) => FireDecision::Fire,
            (true, true) => FireDecision::AlreadyTriggered,
        }
    }

    /// Record that firing was attempted.
    pub fn mark_triggered(&mut self) {
        self.triggered = true;
    }
}

/// Step-by-step builder for [`Rule`].
#[derive(Debug, Default)]
pub struct RuleBuilder {
    name: Option<String>,
    conditions: Vec<ConditionSpec>,
    trigger: Option<bool>,
    priority: i64,
    target: Option<RuleTarget>,
}

impl RuleBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: ConditionSpec) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn conditions(mut self, conditions: impl IntoIterator<Item = ConditionSpec>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: bool) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn target(mut self, target: RuleTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Consume the builder, validate, and return a [`Rule`].
    ///
    /// `trigger` defaults to `true`, `priority` to 0.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for a missing or empty name and
    /// [`ValidationError::MissingRuleTarget`] when no target was set.
    pub fn build(self) -> Result<Rule, ValidationError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let target = self.target.ok_or(ValidationError::MissingRuleTarget)?;
        Ok(Rule {
            name,
            conditions: self.conditions,
            trigger: self.trigger.unwrap_or(true),
            priority: self.priority,
            target,
            validity: false,
            triggered: false,
        })
    }
}

/// Raw rule parameters as written in `rules.yml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    #[serde(default)]
    pub conditions: Vec<serde_json::Value>,
    #[serde(default)]
    pub trigger: Option<bool>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default)]
    pub events: Option<Vec<String>>,
    #[serde(default)]
    pub scene: Option<String>,
}

impl RuleDefinition {
    /// Parse every condition entry.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] raised by a malformed condition.
    pub fn parse_conditions(&self) -> Result<Vec<ConditionSpec>, ValidationError> {
        self.conditions.iter().map(ConditionSpec::from_value).collect()
    }
}

//! Rule target — what a rule runs when it fires.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::event::LightEvent;
use crate::scene::Scene;

/// A scene reference as written in the rule. `scene` is `None` when the
/// name did not resolve at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRef {
    pub name: String,
    pub scene: Option<Arc<Scene>>,
}

/// Either an explicit list of events or a scene, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleTarget {
    Events(Vec<Arc<LightEvent>>),
    Scene(SceneRef),
}

impl RuleTarget {
    /// Choose the target from the two optional configuration fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRuleTarget`] when neither is given
    /// and [`ValidationError::ConflictingRuleTarget`] when both are.
    pub fn from_parts(
        events: Option<Vec<Arc<LightEvent>>>,
        scene: Option<SceneRef>,
    ) -> Result<Self, ValidationError> {
        match (events, scene) {
            (Some(events), None) => Ok(Self::Events(events)),
            (None, Some(scene)) => Ok(Self::Scene(scene)),
            (None, None) => Err(ValidationError::MissingRuleTarget),
            (Some(_), Some(_)) => Err(ValidationError::ConflictingRuleTarget),
        }
    }

    /// The events to run, in order. Empty for an unresolved scene.
    #[must_use]
    pub fn resolve(&self) -> Vec<Arc<LightEvent>> {
        match self {
            Self::Events(events) => events.clone(),
            Self::Scene(SceneRef { scene, .. }) => scene
                .as_ref()
                .map(|s| s.sequence.clone())
                .unwrap_or_default(),
        }
    }
}

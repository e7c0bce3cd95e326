//! Scenes — ordered sequences of events fired together.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::event::{EventDefinition, LightEvent};

/// A named, ordered list of events. Order is execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub sequence: Vec<Arc<LightEvent>>,
}

impl Scene {
    /// Build a scene from its inline event definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for an empty name, or the
    /// first error raised by an inline event.
    pub fn from_definitions(
        name: impl Into<String>,
        definitions: Vec<EventDefinition>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let sequence = definitions
            .into_iter()
            .map(|def| def.into_event(None).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, sequence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{LightState, Target};

    fn group_def(group: &str) -> EventDefinition {
        EventDefinition {
            group: Some(group.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn should_keep_inline_events_in_order() {
        let scene =
            Scene::from_definitions("Movie", vec![group_def("Living room"), group_def("Hall")])
                .unwrap();
        let targets: Vec<_> = scene.sequence.iter().map(|e| e.target.clone()).collect();
        assert_eq!(
            targets,
            vec![
                Target::Group("Living room".to_string()),
                Target::Group("Hall".to_string())
            ]
        );
        assert!(scene.sequence.iter().all(|e| e.name.is_none()));
    }

    #[test]
    fn should_default_inline_events_to_on() {
        let scene = Scene::from_definitions("Morning", vec![group_def("Kitchen")]).unwrap();
        assert_eq!(scene.sequence[0].actions, LightState::new().with("on", true));
    }

    #[test]
    fn should_reject_empty_scene_name() {
        let result = Scene::from_definitions("", vec![]);
        assert_eq!(result, Err(ValidationError::EmptyName));
    }

    #[test]
    fn should_reject_scene_with_invalid_inline_event() {
        let result = Scene::from_definitions("Broken", vec![EventDefinition::default()]);
        assert_eq!(result, Err(ValidationError::InvalidEventTarget));
    }
}

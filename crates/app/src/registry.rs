//! Registries — named events and scenes, and rules bound against them.
//!
//! Every builder here is all-or-nothing: one malformed entry fails the whole
//! category, so the engine can keep the previous registry untouched.

use std::collections::HashMap;
use std::sync::Arc;

use hued_domain::condition::ConditionKind;
use hued_domain::error::ValidationError;
use hued_domain::event::{EventDefinition, LightEvent};
use hued_domain::rule::{Rule, RuleDefinition, RuleTarget, SceneRef};
use hued_domain::scene::Scene;

use crate::ports::ConfigKind;
use crate::ports::config_store::Definitions;

/// A configuration entry that could not be turned into a domain object.
#[derive(Debug, thiserror::Error)]
#[error("invalid {kind} entry `{name}`")]
pub struct InvalidEntry {
    pub kind: ConfigKind,
    pub name: String,
    #[source]
    pub source: ValidationError,
}

impl InvalidEntry {
    fn new(kind: ConfigKind, name: &str, source: ValidationError) -> Self {
        Self {
            kind,
            name: name.to_string(),
            source,
        }
    }
}

/// Named, reusable events.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    events: HashMap<String, Arc<LightEvent>>,
}

impl EventRegistry {
    /// Build the registry from `events.yml` entries.
    ///
    /// # Errors
    ///
    /// Returns the first entry that fails validation.
    pub fn build(definitions: Definitions<EventDefinition>) -> Result<Self, InvalidEntry> {
        let mut events = HashMap::with_capacity(definitions.len());
        for (name, definition) in definitions {
            let event = definition
                .into_event(Some(name.clone()))
                .map_err(|err| InvalidEntry::new(ConfigKind::Events, &name, err))?;
            events.insert(name, Arc::new(event));
        }
        Ok(Self { events })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<LightEvent>> {
        self.events.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Named scenes.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    scenes: HashMap<String, Arc<Scene>>,
}

impl SceneRegistry {
    /// Build the registry from `scenes.yml` entries.
    ///
    /// # Errors
    ///
    /// Returns the first scene that fails validation.
    pub fn build(definitions: Definitions<Vec<EventDefinition>>) -> Result<Self, InvalidEntry> {
        let mut scenes = HashMap::with_capacity(definitions.len());
        for (name, sequence) in definitions {
            let scene = Scene::from_definitions(name.clone(), sequence)
                .map_err(|err| InvalidEntry::new(ConfigKind::Scenes, &name, err))?;
            scenes.insert(name, Arc::new(scene));
        }
        Ok(Self { scenes })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Scene>> {
        self.scenes.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Build rules in source order, resolving event and scene names.
///
/// Unknown event names are dropped with a warning. An unknown scene leaves
/// the rule with an unresolved [`SceneRef`], which runs nothing.
///
/// # Errors
///
/// Returns the first rule that fails validation.
pub fn bind_rules(
    definitions: Definitions<RuleDefinition>,
    events: &EventRegistry,
    scenes: &SceneRegistry,
) -> Result<Vec<Rule>, InvalidEntry> {
    definitions
        .into_iter()
        .map(|(name, definition)| {
            bind_rule(&name, definition, events, scenes)
                .map_err(|err| InvalidEntry::new(ConfigKind::Rules, &name, err))
        })
        .collect()
}

fn bind_rule(
    name: &str,
    definition: RuleDefinition,
    events: &EventRegistry,
    scenes: &SceneRegistry,
) -> Result<Rule, ValidationError> {
    let conditions = definition.parse_conditions()?;
    for condition in &conditions {
        if condition.is_unknown() {
            tracing::warn!(
                rule = %name,
                condition = %condition.kind.keyword(),
                "unknown condition, rule can never be valid"
            );
        }
        if let ConditionKind::Weekdays { unrecognised, .. } = &condition.kind
            && !unrecognised.is_empty()
        {
            tracing::warn!(rule = %name, days = ?unrecognised, "unrecognised day names never match");
        }
    }

    let bound_events = definition.events.map(|names| {
        names
            .iter()
            .filter_map(|event_name| {
                let found = events.get(event_name).cloned();
                if found.is_none() {
                    tracing::warn!(rule = %name, event = %event_name, "unknown event, ignoring");
                }
                found
            })
            .collect::<Vec<_>>()
    });

    let scene = definition.scene.map(|scene_name| {
        let scene = scenes.get(&scene_name).cloned();
        if scene.is_none() {
            tracing::warn!(rule = %name, scene = %scene_name, "unknown scene");
        }
        SceneRef {
            name: scene_name,
            scene,
        }
    });

    let mut builder = Rule::builder()
        .name(name)
        .conditions(conditions)
        .priority(definition.priority)
        .target(RuleTarget::from_parts(bound_events, scene)?);
    if let Some(trigger) = definition.trigger {
        builder = builder.trigger(trigger);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hued_domain::light::{LightState, Target};
    use serde_json::json;

    fn group_event(group: &str) -> EventDefinition {
        EventDefinition {
            group: Some(group.to_string()),
            actions: LightState::new().with("bri", 120),
            ..Default::default()
        }
    }

    fn registries() -> (EventRegistry, SceneRegistry) {
        let events = EventRegistry::build(vec![
            ("Evening".to_string(), group_event("Living room")),
            ("Night".to_string(), group_event("Bedroom")),
        ])
        .unwrap();
        let scenes = SceneRegistry::build(vec![(
            "Movie".to_string(),
            vec![group_event("Living room"), group_event("Hall")],
        )])
        .unwrap();
        (events, scenes)
    }

    fn rule_with_events(names: &[&str]) -> RuleDefinition {
        RuleDefinition {
            events: Some(names.iter().map(ToString::to_string).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn should_name_events_after_their_key() {
        let (events, _) = registries();
        let evening = events.get("Evening").unwrap();
        assert_eq!(evening.name.as_deref(), Some("Evening"));
        assert_eq!(evening.target, Target::Group("Living room".to_string()));
        assert_eq!(evening.actions.power(), Some(true));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn should_reject_event_registry_when_any_event_is_invalid() {
        let err = EventRegistry::build(vec![
            ("Good".to_string(), group_event("Hall")),
            ("Broken".to_string(), EventDefinition::default()),
        ])
        .unwrap_err();
        assert_eq!(err.kind, ConfigKind::Events);
        assert_eq!(err.name, "Broken");
        assert_eq!(err.source, ValidationError::InvalidEventTarget);
    }

    #[test]
    fn should_build_scenes_in_order() {
        let (_, scenes) = registries();
        let movie = scenes.get("Movie").unwrap();
        assert_eq!(movie.sequence.len(), 2);
        assert_eq!(movie.sequence[1].target, Target::Group("Hall".to_string()));
    }

    #[test]
    fn should_keep_rules_in_source_order() {
        let (events, scenes) = registries();
        let rules = bind_rules(
            vec![
                ("B".to_string(), rule_with_events(&["Night"])),
                ("A".to_string(), rule_with_events(&["Evening"])),
            ],
            &events,
            &scenes,
        )
        .unwrap();
        let names: Vec<_> = rules.iter().map(Rule::name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn should_drop_unknown_event_names() {
        let (events, scenes) = registries();
        let rules = bind_rules(
            vec![("R".to_string(), rule_with_events(&["Evening", "Missing"]))],
            &events,
            &scenes,
        )
        .unwrap();
        assert_eq!(rules[0].target().resolve().len(), 1);
    }

    #[test]
    fn should_keep_unresolved_scene_reference() {
        let (events, scenes) = registries();
        let definition = RuleDefinition {
            scene: Some("Party".to_string()),
            ..Default::default()
        };
        let rules = bind_rules(vec![("R".to_string(), definition)], &events, &scenes).unwrap();
        match rules[0].target() {
            RuleTarget::Scene(scene_ref) => {
                assert_eq!(scene_ref.name, "Party");
                assert!(scene_ref.scene.is_none());
            }
            RuleTarget::Events(_) => panic!("expected a scene target"),
        }
        assert!(rules[0].target().resolve().is_empty());
    }

    #[test]
    fn should_resolve_scene_reference() {
        let (events, scenes) = registries();
        let definition = RuleDefinition {
            scene: Some("Movie".to_string()),
            ..Default::default()
        };
        let rules = bind_rules(vec![("R".to_string(), definition)], &events, &scenes).unwrap();
        assert_eq!(rules[0].target().resolve().len(), 2);
    }

    #[test]
    fn should_apply_trigger_and_priority_from_definition() {
        let (events, scenes) = registries();
        let definition = RuleDefinition {
            trigger: Some(false),
            priority: 3,
            conditions: vec![json!({"from": "18:00"}), json!({"^found host": "phone.lan"})],
            ..rule_with_events(&["Evening"])
        };
        let rules = bind_rules(vec![("R".to_string(), definition)], &events, &scenes).unwrap();
        let rule = &rules[0];
        assert!(!rule.is_trigger());
        assert_eq!(rule.priority(), 3);
        assert_eq!(rule.conditions().len(), 2);
        assert!(rule.conditions()[1].negated);
        assert!(matches!(rule.conditions()[1].kind, ConditionKind::FoundHost(_)));
    }

    #[test]
    fn should_fail_all_rules_when_one_has_both_targets() {
        let (events, scenes) = registries();
        let conflicting = RuleDefinition {
            scene: Some("Movie".to_string()),
            ..rule_with_events(&["Evening"])
        };
        let err = bind_rules(
            vec![
                ("Fine".to_string(), rule_with_events(&["Evening"])),
                ("Conflicting".to_string(), conflicting),
            ],
            &events,
            &scenes,
        )
        .unwrap_err();
        assert_eq!(err.kind, ConfigKind::Rules);
        assert_eq!(err.name, "Conflicting");
        assert_eq!(err.source, ValidationError::ConflictingRuleTarget);
    }

    #[test]
    fn should_fail_rule_with_malformed_known_condition() {
        let (events, scenes) = registries();
        let definition = RuleDefinition {
            conditions: vec![json!({"from": "late"})],
            ..rule_with_events(&["Evening"])
        };
        let err = bind_rules(vec![("R".to_string(), definition)], &events, &scenes).unwrap_err();
        assert!(matches!(err.source, ValidationError::InvalidTime(_)));
    }

    #[test]
    fn should_load_rule_with_unrecognised_day_names() {
        let (events, scenes) = registries();
        let definition = RuleDefinition {
            conditions: vec![json!({"weekdays": "thurs, mon-fri, sat"})],
            ..rule_with_events(&["Evening"])
        };
        let rules = bind_rules(vec![("Weekend".to_string(), definition)], &events, &scenes).unwrap();
        assert!(matches!(
            &rules[0].conditions()[0].kind,
            ConditionKind::Weekdays { days, unrecognised }
                if days.len() == 1 && unrecognised.len() == 2
        ));
    }
}

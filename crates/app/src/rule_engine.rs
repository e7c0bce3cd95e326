//! Rule engine — owns the registries and runs evaluation passes.
//!
//! A pass re-evaluates every rule, picks the valid rules at the highest
//! priority present (the *active* set) and executes those that need it.
//! Lower-priority rules are suppressed for that pass, not queued.

use std::collections::HashMap;
use std::time::SystemTime;

use hued_domain::error::HuedError;
use hued_domain::light::{Group, Light, LightState, Target};
use hued_domain::rule::{FireDecision, Rule};
use hued_domain::time::{WallClock, local_now};

use crate::condition_evaluator::ConditionEvaluator;
use crate::executor::execute_rule;
use crate::ports::{ConfigKind, ConfigStore, HostProbe, LightingService, SunDataSource};
use crate::registry::{EventRegistry, SceneRegistry, bind_rules};

/// Engine switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Flash every light once when lights are discovered.
    pub blink: bool,
}

/// Names of the rules seen by one pass, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub valid: Vec<String>,
    pub active: Vec<String>,
    pub executed: Vec<String>,
}

/// The rule engine, generic over its four ports.
pub struct RuleEngine<C, L, P, S> {
    store: C,
    lighting: L,
    evaluator: ConditionEvaluator<P, S>,
    options: EngineOptions,
    events: EventRegistry,
    scenes: SceneRegistry,
    rules: Vec<Rule>,
    lights: Vec<Light>,
    groups: Vec<Group>,
    loaded_at: HashMap<ConfigKind, SystemTime>,
    started_at: SystemTime,
}

impl<C, L, P, S> RuleEngine<C, L, P, S>
where
    C: ConfigStore,
    L: LightingService,
    P: HostProbe,
    S: SunDataSource,
{
    pub fn new(store: C, lighting: L, probe: P, sun_source: S, options: EngineOptions) -> Self {
        Self {
            store,
            lighting,
            evaluator: ConditionEvaluator::new(probe, sun_source),
            options,
            events: EventRegistry::default(),
            scenes: SceneRegistry::default(),
            rules: Vec::new(),
            lights: Vec::new(),
            groups: Vec::new(),
            loaded_at: HashMap::new(),
            started_at: SystemTime::now(),
        }
    }

    /// Initial load of events, scenes and rules.
    ///
    /// Broken events or scenes are logged and leave their registry empty.
    ///
    /// # Errors
    ///
    /// Returns [`HuedError::MissingRules`] when the rules source does not
    /// exist and [`HuedError::Config`] when it cannot be parsed.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), HuedError> {
        if let Err(err) = self.load_events().await {
            tracing::error!(error = %err, cause = ?err, "could not load events");
        }
        if let Err(err) = self.load_scenes().await {
            tracing::error!(error = %err, cause = ?err, "could not load scenes");
        }
        self.load_rules().await
    }

    /// Reload every source modified since it was last read.
    ///
    /// A reloaded events or scenes source forces a rules reload so rules
    /// bind against the new registries. Failures keep the previous
    /// registry.
    #[tracing::instrument(skip(self))]
    pub async fn reload(&mut self) {
        let mut reload_rules = false;

        if self.is_modified(ConfigKind::Events).await {
            tracing::info!("events changed, reloading");
            reload_rules = true;
            if let Err(err) = self.load_events().await {
                tracing::error!(error = %err, cause = ?err, "could not reload events");
            }
        }

        if self.is_modified(ConfigKind::Scenes).await {
            tracing::info!("scenes changed, reloading");
            reload_rules = true;
            if let Err(err) = self.load_scenes().await {
                tracing::error!(error = %err, cause = ?err, "could not reload scenes");
            }
        }

        if reload_rules || self.is_modified(ConfigKind::Rules).await {
            tracing::info!("reloading rules");
            if let Err(err) = self.load_rules().await {
                tracing::error!(error = %err, cause = ?err, "could not reload rules");
            }
        }
    }

    /// Run one pass at the current local time.
    pub async fn evaluate_and_execute(&mut self) -> PassReport {
        self.evaluate_and_execute_at(local_now()).await
    }

    /// Run one pass at `now`.
    #[tracing::instrument(skip(self))]
    pub async fn evaluate_and_execute_at(&mut self, now: WallClock) -> PassReport {
        let mut report = PassReport::default();

        for rule in &mut self.rules {
            let valid = self.evaluator.evaluate_all(rule.conditions(), &now).await;
            rule.update_validity(valid);
            tracing::debug!(rule = %rule.name(), valid, "rule evaluated");
            if valid {
                report.valid.push(rule.name().to_string());
            }
        }

        let Some(top) = self
            .rules
            .iter()
            .filter(|rule| rule.is_valid())
            .map(Rule::priority)
            .max()
        else {
            tracing::debug!("no valid rules");
            return report;
        };

        for rule in self
            .rules
            .iter_mut()
            .filter(|rule| rule.is_valid() && rule.priority() == top)
        {
            report.active.push(rule.name().to_string());
            let decision = rule.fire_decision();
            match decision {
                FireDecision::Fire => {
                    tracing::info!(rule = %rule.name(), "rule should be triggered");
                }
                FireDecision::FireAgain => {
                    tracing::info!(rule = %rule.name(), "rule should be triggered (again)");
                }
                FireDecision::AlreadyTriggered => {
                    tracing::debug!(rule = %rule.name(), "already triggered, skipping");
                }
            }
            if decision.should_execute() {
                execute_rule(&self.lighting, rule).await;
                report.executed.push(rule.name().to_string());
            }
        }

        tracing::debug!(
            priority = top,
            "{}, {}, {}",
            pluralize(report.valid.len(), "valid rule"),
            pluralize(report.active.len(), "active rule"),
            pluralize(report.executed.len(), "executed rule"),
        );
        report
    }

    /// Fetch the light and group lists, flashing each light when the
    /// `blink` option is set.
    pub async fn discover_lights(&mut self) {
        self.refresh_lights().await;
        for light in &self.lights {
            tracing::info!(id = %light.id, name = %light.name, reachable = light.reachable, "found light");
        }
        for group in &self.groups {
            tracing::info!(id = %group.id, name = %group.name, lights = group.lights.len(), "found group");
        }

        if self.options.blink {
            for light in &self.lights {
                let target = Target::Light(light.id.clone());
                if let Err(err) = self.lighting.apply(&target, &LightState::blink()).await {
                    tracing::warn!(light = %light.name, error = %err, "could not blink light");
                }
            }
        }
    }

    /// Refresh the light and group lists. A failure empties the list.
    pub async fn refresh_lights(&mut self) {
        self.lights = match self.lighting.lights().await {
            Ok(lights) => lights,
            Err(err) => {
                tracing::warn!(error = %err, "could not list lights");
                Vec::new()
            }
        };
        self.groups = match self.lighting.groups().await {
            Ok(groups) => groups,
            Err(err) => {
                tracing::warn!(error = %err, "could not list groups");
                Vec::new()
            }
        };
        tracing::debug!(
            "{}, {}",
            pluralize(self.lights.len(), "light"),
            pluralize(self.groups.len(), "group")
        );
    }

    /// Log the engine stopping.
    pub fn shutdown(&self) {
        tracing::info!(rules = self.rules.len(), "rule engine shutting down");
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    #[must_use]
    pub fn scenes(&self) -> &SceneRegistry {
        &self.scenes
    }

    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn lighting(&self) -> &L {
        &self.lighting
    }

    #[must_use]
    pub fn evaluator(&self) -> &ConditionEvaluator<P, S> {
        &self.evaluator
    }

    /// Whether `kind` changed since it was last read (or since start-up
    /// if it never was).
    async fn is_modified(&self, kind: ConfigKind) -> bool {
        let Some(modified) = self.store.modified(kind).await else {
            return false;
        };
        let last = self.loaded_at.get(&kind).copied().unwrap_or(self.started_at);
        modified > last
    }

    /// Remember the modification time of `kind`, whatever the load outcome.
    async fn mark_loaded(&mut self, kind: ConfigKind) {
        if let Some(modified) = self.store.modified(kind).await {
            self.loaded_at.insert(kind, modified);
        }
    }

    async fn load_events(&mut self) -> Result<(), HuedError> {
        self.mark_loaded(ConfigKind::Events).await;
        let definitions = self.store.load_events().await?.unwrap_or_default();
        let events = EventRegistry::build(definitions).map_err(|e| HuedError::Config(Box::new(e)))?;
        tracing::info!("loaded {}", pluralize(events.len(), "event"));
        self.events = events;
        Ok(())
    }

    async fn load_scenes(&mut self) -> Result<(), HuedError> {
        self.mark_loaded(ConfigKind::Scenes).await;
        let definitions = self.store.load_scenes().await?.unwrap_or_default();
        let scenes = SceneRegistry::build(definitions).map_err(|e| HuedError::Config(Box::new(e)))?;
        tracing::info!("loaded {}", pluralize(scenes.len(), "scene"));
        self.scenes = scenes;
        Ok(())
    }

    async fn load_rules(&mut self) -> Result<(), HuedError> {
        self.mark_loaded(ConfigKind::Rules).await;
        let definitions = self
            .store
            .load_rules()
            .await?
            .ok_or(HuedError::MissingRules)?;
        let rules = bind_rules(definitions, &self.events, &self.scenes)
            .map_err(|e| HuedError::Config(Box::new(e)))?;
        tracing::info!("loaded {}", pluralize(rules.len(), "rule"));
        self.rules = rules;
        Ok(())
    }
}

/// `1 rule`, `2 rules`, `0 rules`.
fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

//! Rule execution — runs a rule's events against the lighting service.
//!
//! A light that is off rejects parameter changes; the bridge reports this as
//! [`LightingError::DeviceOff`]. Such a failure is retried a bounded number of
//! times, each retry preceded by switching the target off.

use hued_domain::error::LightingError;
use hued_domain::event::LightEvent;
use hued_domain::rule::Rule;

use crate::ports::LightingService;

/// Retries after the first attempt of a single event.
pub const MAX_RETRIES: u32 = 5;

/// How a single event ended.
#[derive(Debug)]
pub enum EventOutcome {
    /// The state was applied after `retries` compensated retries.
    Applied { retries: u32 },
    /// Every retry hit a device that was off.
    Exhausted,
    /// A non-transient failure; not retried.
    Failed(LightingError),
}

impl EventOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Apply one event, retrying [`LightingError::DeviceOff`] up to
/// [`MAX_RETRIES`] times.
pub async fn execute_event<L: LightingService>(lighting: &L, event: &LightEvent) -> EventOutcome {
    let mut retries = 0;
    loop {
        match lighting.apply(&event.target, &event.actions).await {
            Ok(()) => {
                tracing::debug!(event = %event.label(), retries, "event applied");
                return EventOutcome::Applied { retries };
            }
            Err(err) if err.is_transient() => {
                if retries == MAX_RETRIES {
                    tracing::warn!(
                        event = %event.label(),
                        retries,
                        "device still off, giving up on event"
                    );
                    return EventOutcome::Exhausted;
                }
                retries += 1;
                tracing::warn!(
                    event = %event.label(),
                    target = %event.target,
                    attempt = retries,
                    "device is off, powering off target and retrying"
                );
                if let Err(err) = lighting.power_off(&event.target).await {
                    tracing::warn!(target = %event.target, error = %err, "power off failed");
                }
            }
            Err(err) => {
                tracing::error!(event = %event.label(), error = %err, "event failed");
                return EventOutcome::Failed(err);
            }
        }
    }
}

/// Run every event of `rule` in order and mark it triggered.
///
/// The rule is marked triggered before any event runs, whatever the
/// outcome. A failing event never stops the ones after it.
pub async fn execute_rule<L: LightingService>(lighting: &L, rule: &mut Rule) -> Vec<EventOutcome> {
    rule.mark_triggered();

    let events = rule.target().resolve();
    if events.is_empty() {
        tracing::info!(rule = %rule.name(), "no scene or events found, skipping");
        return Vec::new();
    }

    tracing::info!(rule = %rule.name(), events = events.len(), "executing rule");
    let mut outcomes = Vec::with_capacity(events.len());
    for event in &events {
        outcomes.push(execute_event(lighting, event).await);
    }
    let applied = outcomes.iter().filter(|outcome| outcome.is_applied()).count();
    if applied < outcomes.len() {
        tracing::warn!(rule = %rule.name(), applied, events = outcomes.len(), "rule partially applied");
    }
    outcomes
}

//! # hued — home lighting rule daemon
//!
//! Composition root that wires all adapters together and runs the rule
//! engine.
//!
//! ## Responsibilities
//! - Parse configuration (`hued.toml`, env vars)
//! - Install the tracing subscriber
//! - Connect the lighting backend (Hue bridge or virtual lights)
//! - Construct the file store, ping probe and sun data client
//! - Load rules (fatal when missing or malformed), then run a pass every
//!   interval: reload changed files, refresh lights, evaluate and execute
//! - Stop between passes on SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod lighting;

use std::pin::pin;
use std::time::Duration;

use hued_adapter_files::FileConfigStore;
use hued_adapter_net::{PingProbe, SunriseSunsetApi};
use hued_app::ports::{ConfigStore, HostProbe, LightingService, SunDataSource};
use hued_app::rule_engine::{EngineOptions, RuleEngine};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::lighting::Lighting;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();
    tracing::info!(
        config_dir = %config.engine.config_dir.display(),
        interval_secs = config.engine.interval_secs,
        "starting hued"
    );

    let lighting = Lighting::connect(&config).await?;
    let store = FileConfigStore::new(&config.engine.config_dir);
    let probe = PingProbe::new(config.probe.timeout());
    let sun = SunriseSunsetApi::new(config.sun.api_url.as_str(), config.sun.timeout())?;
    let options = EngineOptions {
        blink: config.engine.blink,
    };
    let mut engine = RuleEngine::new(store, lighting, probe, sun, options);

    engine.discover_lights().await;
    if let Err(err) = engine.load().await {
        tracing::error!(error = %err, cause = ?err, "could not load rules, exiting");
        return Err(err.into());
    }

    run(&mut engine, config.engine.interval()).await;
    engine.shutdown();
    Ok(())
}

/// Run a pass every `period` until interrupted. A pass in progress always
/// completes.
async fn run<C, L, P, S>(engine: &mut RuleEngine<C, L, P, S>, period: Duration)
where
    C: ConfigStore,
    L: LightingService,
    P: HostProbe,
    S: SunDataSource,
{
    let mut ticks = tokio::time::interval(period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut interrupt = pin!(tokio::signal::ctrl_c());

    loop {
        tokio::select! {
            _ = ticks.tick() => {}
            _ = &mut interrupt => {
                tracing::info!("interrupt received");
                break;
            }
        }

        engine.reload().await;
        engine.refresh_lights().await;
        let report = engine.evaluate_and_execute().await;
        tracing::debug!(
            valid = ?report.valid,
            active = ?report.active,
            executed = ?report.executed,
            "pass complete"
        );
    }
}

//! End-to-end tests for the hued stack.
//!
//! Each test writes YAML configuration into a temporary directory and runs
//! passes of the real engine over the real file store and virtual lights.
//! Host presence and sun data are faked; passes run at fixed instants.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::time::{Duration, SystemTime};

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use hued_adapter_files::FileConfigStore;
use hued_adapter_virtual::VirtualLights;
use hued_app::ports::{HostProbe, SunDataSource};
use hued_app::rule_engine::{EngineOptions, RuleEngine};
use hued_domain::error::HuedError;
use hued_domain::sun::{Coordinates, SunTimes};
use hued_domain::time::WallClock;
use serde_json::json;
use tempfile::TempDir;

struct Probe(&'static [&'static str]);

impl HostProbe for Probe {
    fn is_reachable(&self, host: &str) -> impl Future<Output = bool> + Send {
        let found = self.0.iter().any(|known| *known == host);
        async move { found }
    }
}

/// Sunrise 06:00, sunset 20:00 UTC, every day.
struct Sun;

impl SunDataSource for Sun {
    fn sun_times(
        &self,
        _coordinates: Coordinates,
        date: NaiveDate,
    ) -> impl Future<Output = Result<SunTimes, HuedError>> + Send {
        let at = |hour| Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).unwrap());
        let times = SunTimes {
            sunrise: at(6),
            sunset: at(20),
        };
        async move { Ok(times) }
    }
}

type Engine = RuleEngine<FileConfigStore, VirtualLights, Probe, Sun>;

const EVENTS: &str = "
Evening:
  group: Living room
  actions: { bri: 180, ct: 400 }
Hall on:
  light: Hall
";

const SCENES: &str = "
Movie:
  - { group: Living room, actions: { bri: 40 } }
  - { light: Hall, actions: { on: false } }
";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

/// Push a file's modification time into the future so a reload sees it.
fn touch(dir: &Path, name: &str) {
    fs::File::options()
        .write(true)
        .open(dir.join(name))
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(120))
        .unwrap();
}

fn engine(dir: &TempDir, hosts: &'static [&'static str]) -> Engine {
    RuleEngine::new(
        FileConfigStore::new(dir.path()),
        VirtualLights::default(),
        Probe(hosts),
        Sun,
        EngineOptions::default(),
    )
}

fn at(hour: u32, minute: u32) -> WallClock {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 4, hour, minute, 0)
        .unwrap()
}

fn is_on(engine: &Engine, light: &str) -> bool {
    engine.lighting().light(light).unwrap().status().on
}

#[tokio::test]
async fn should_fail_to_start_without_rules() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "events.yml", EVENTS);

    let err = engine(&dir, &[]).load().await.unwrap_err();
    assert!(matches!(err, HuedError::MissingRules));
}

#[tokio::test]
async fn should_fail_to_start_with_malformed_rules() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "rules.yml", "Broken:\n  events: [Evening]\n  scene: Movie\n");

    let err = engine(&dir, &[]).load().await.unwrap_err();
    assert!(matches!(err, HuedError::Config(_)));
}

#[tokio::test]
async fn should_run_only_the_highest_priority_rule() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "events.yml", EVENTS);
    write(dir.path(), "scenes.yml", SCENES);
    write(
        dir.path(),
        "rules.yml",
        "
A:
  priority: 1
  trigger: true
  conditions: []
  events: [Hall on]
B:
  priority: 2
  trigger: false
  conditions: []
  scene: Movie
",
    );
    let mut engine = engine(&dir, &[]);
    engine.load().await.unwrap();

    for minute in 0..3 {
        let report = engine.evaluate_and_execute_at(at(12, minute)).await;
        assert_eq!(report.active, vec!["B"]);
        assert_eq!(report.executed, vec!["B"]);
    }
    assert!(is_on(&engine, "Desk lamp"));
    assert!(!is_on(&engine, "Hall"));
    assert_eq!(
        engine
            .lighting()
            .light("TV backlight")
            .unwrap()
            .status()
            .parameters
            .get("bri"),
        Some(&json!(40))
    );
}

#[tokio::test]
async fn should_follow_conditions_through_the_day() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "events.yml", EVENTS);
    write(
        dir.path(),
        "rules.yml",
        r#"
Welcome home:
  conditions:
    - from: "6 pm"
    - weekdays: mon, tue, wed, thu, fri
    - found host: phone.lan
    - dark_at: [52.09, 5.12]
  events: [Evening]
"#,
    );
    let mut engine = engine(&dir, &["phone.lan"]);
    engine.load().await.unwrap();

    let afternoon = engine.evaluate_and_execute_at(at(17, 0)).await;
    assert!(afternoon.valid.is_empty());

    // 19:55 is inside the twilight buffer before sunset.
    let dusk = engine.evaluate_and_execute_at(at(19, 55)).await;
    assert_eq!(dusk.executed, vec!["Welcome home"]);
    assert!(is_on(&engine, "Desk lamp"));

    let later = engine.evaluate_and_execute_at(at(21, 0)).await;
    assert_eq!(later.active, vec!["Welcome home"]);
    assert!(later.executed.is_empty());
}

#[tokio::test]
async fn should_skip_event_that_keeps_failing_and_run_the_next() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "events.yml",
        "
Dim while off:
  light: Hall
  actions: { on: false, bri: 10 }
Desk on:
  light: Desk lamp
",
    );
    write(
        dir.path(),
        "rules.yml",
        "Always:\n  trigger: false\n  events: [Dim while off, Desk on]\n",
    );
    let mut engine = engine(&dir, &[]);
    engine.load().await.unwrap();

    let report = engine.evaluate_and_execute_at(at(12, 0)).await;
    assert_eq!(report.executed, vec!["Always"]);
    assert!(!is_on(&engine, "Hall"));
    assert!(is_on(&engine, "Desk lamp"));
}

#[tokio::test]
async fn should_rebind_rules_when_events_file_changes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "events.yml", "Evening:\n  light: Hall\n");
    write(
        dir.path(),
        "rules.yml",
        "Always:\n  trigger: false\n  events: [Evening]\n",
    );
    let mut engine = engine(&dir, &[]);
    engine.load().await.unwrap();

    engine.evaluate_and_execute_at(at(12, 0)).await;
    assert!(is_on(&engine, "Hall"));
    assert!(!is_on(&engine, "Desk lamp"));

    write(dir.path(), "events.yml", "Evening:\n  light: Desk lamp\n");
    touch(dir.path(), "events.yml");
    engine.reload().await;

    engine.evaluate_and_execute_at(at(12, 1)).await;
    assert!(is_on(&engine, "Desk lamp"));
}

#[tokio::test]
async fn should_keep_running_rules_when_reload_is_malformed() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "events.yml", EVENTS);
    write(
        dir.path(),
        "rules.yml",
        "Always:\n  trigger: false\n  events: [Hall on]\n",
    );
    let mut engine = engine(&dir, &[]);
    engine.load().await.unwrap();

    write(dir.path(), "rules.yml", "Always: [not, a, rule\n");
    touch(dir.path(), "rules.yml");
    engine.reload().await;

    let report = engine.evaluate_and_execute_at(at(12, 0)).await;
    assert_eq!(report.executed, vec!["Always"]);
    assert!(is_on(&engine, "Hall"));
}

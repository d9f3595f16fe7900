use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use sharehub_core::{Assignee, Digest, Habit, Hub, Priority, Registrations, RenderOptions, Task};
use sharehub_core::habit::Frequency;
use sharehub_notify::{
    DeliveryError, HubStore, JsonFileStore, PipelineError, PushTransport, RegistrationStore,
    build_digest, run_weekly,
};

/// Records every send and fails tokens listed in `failures`.
#[derive(Default)]
struct RecordingTransport {
    failures: HashMap<String, DeliveryError>,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    fn failing(mut self, token: &str, err: DeliveryError) -> Self {
        self.failures.insert(token.to_string(), err);
        self
    }

    fn attempts(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn send(&self, token: &str, digest: &Digest) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), digest.title.clone()));
        match self.failures.get(token) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// File store whose registration removals always fail.
struct ReadOnlyRegistrations(JsonFileStore);

impl HubStore for ReadOnlyRegistrations {
    fn load_hub(&self) -> anyhow::Result<Option<Hub>> {
        self.0.load_hub()
    }

    fn save_hub(&self, hub: &Hub) -> anyhow::Result<()> {
        self.0.save_hub(hub)
    }
}

impl RegistrationStore for ReadOnlyRegistrations {
    fn load_registrations(&self) -> anyhow::Result<Registrations> {
        self.0.load_registrations()
    }

    fn register(&self, recipient: &str, token: &str) -> anyhow::Result<()> {
        self.0.register(recipient, token)
    }

    fn remove_registration(&self, _recipient: &str) -> anyhow::Result<bool> {
        Err(anyhow!("registrations.json is read-only"))
    }
}

fn today() -> NaiveDate {
    // Friday
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn seeded_store() -> (tempfile::TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());

    let mut hub = Hub::default();
    hub.tasks.push(
        Task::new("t1", "Buy milk")
            .with_priority(Priority::High)
            .with_due("2026-10-14")
            .assigned(Assignee::Person("Mike".into())),
    );
    let mut run = Habit::new("h1", "Run", Frequency::Daily);
    run.emoji = Some("🏃".into());
    for day in ["2026-10-12", "2026-10-14", "2026-10-15"] {
        run.log.insert(day.into(), true.into());
    }
    hub.habits.push(run);
    store.save_hub(&hub).unwrap();

    (dir, store)
}

#[test]
fn preview_without_hub_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let err = build_digest(&store, today(), &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, PipelineError::NotFound));
}

#[test]
fn preview_renders_snapshot() {
    let (_dir, store) = seeded_store();
    let digest = build_digest(&store, today(), &RenderOptions::default()).unwrap();
    assert_eq!(digest.title, "📋 1 tasks, 0 lists this week");
    assert!(digest.body.contains("🔴 Buy milk (Oct 14) [Mike]"));
    assert!(digest.body.contains("🔴 🏃 Run — 3/7 (43%)"));
}

#[tokio::test]
async fn delivers_to_every_registration() {
    let (_dir, store) = seeded_store();
    store.register("adam", "tok-adam").unwrap();
    store.register("mike", "tok-mike").unwrap();

    let transport = RecordingTransport::default();
    let report = run_weekly(&store, &transport, today(), &RenderOptions::default())
        .await
        .unwrap();

    assert_eq!((report.tally.sent, report.tally.failed), (2, 0));
    let tokens: Vec<_> = transport.attempts().into_iter().map(|(t, _)| t).collect();
    assert_eq!(tokens, ["tok-adam", "tok-mike"]);
}

#[tokio::test]
async fn invalid_token_is_pruned_and_counted() {
    let (_dir, store) = seeded_store();
    store.register("adam", "tok-adam").unwrap();
    store.register("mike", "tok-dead").unwrap();

    let transport = RecordingTransport::default()
        .failing("tok-dead", DeliveryError::InvalidToken("UNREGISTERED".into()));
    let report = run_weekly(&store, &transport, today(), &RenderOptions::default())
        .await
        .unwrap();

    assert_eq!(report.tally.sent, 1);
    assert_eq!(report.tally.failed, 1);
    assert_eq!(report.tally.pruned, 1);

    let regs = store.load_registrations().unwrap();
    assert!(!regs.contains("mike"));
    assert!(regs.contains("adam"));
}

#[tokio::test]
async fn transient_failure_keeps_registration_and_continues() {
    let (_dir, store) = seeded_store();
    store.register("adam", "tok-adam").unwrap();
    store.register("mike", "tok-mike").unwrap();

    let transport = RecordingTransport::default()
        .failing("tok-adam", DeliveryError::Transport("HTTP 503".into()));
    let report = run_weekly(&store, &transport, today(), &RenderOptions::default())
        .await
        .unwrap();

    assert_eq!((report.tally.sent, report.tally.failed, report.tally.pruned), (1, 1, 0));
    assert_eq!(transport.attempts().len(), 2);
    assert_eq!(store.load_registrations().unwrap().len(), 2);
}

#[tokio::test]
async fn failed_removal_does_not_change_the_tally() {
    let (_dir, store) = seeded_store();
    store.register("adam", "tok-dead").unwrap();
    store.register("mike", "tok-mike").unwrap();
    store.register("zoe", "tok-zoe").unwrap();
    let store = ReadOnlyRegistrations(store);

    let transport = RecordingTransport::default()
        .failing("tok-dead", DeliveryError::InvalidToken("UNREGISTERED".into()));
    let report = run_weekly(&store, &transport, today(), &RenderOptions::default())
        .await
        .unwrap();

    assert_eq!((report.tally.sent, report.tally.failed, report.tally.pruned), (2, 1, 0));
    let tokens: Vec<_> = transport.attempts().into_iter().map(|(t, _)| t).collect();
    assert_eq!(tokens, ["tok-dead", "tok-mike", "tok-zoe"]);
    assert!(store.load_registrations().unwrap().contains("adam"));
}

#[test]
fn unreadable_records_do_not_block_the_preview() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    let json = r#"{
        "tasks": [
            {"id": 1760400000000, "title": "Call vet", "priority": "high", "dueDate": {"seconds": 1760400000}},
            {"id": "t2", "title": "Buy milk", "priority": "high", "dueDate": "2026-10-14"},
            42
        ],
        "habits": [{"id": "h1", "name": "Run", "log": {"2026-10-13": null, "2026-10-14": true}}]
    }"#;
    std::fs::write(store.hub_path(), json).unwrap();

    let digest = build_digest(&store, today(), &RenderOptions::default()).unwrap();
    assert_eq!(digest.title, "📋 1 tasks, 0 lists this week");
    assert!(digest.body.contains("🔴 Buy milk (Oct 14)"));
    assert!(!digest.body.contains("Call vet"));
    assert!(digest.body.contains("Run — 1/7 (14%)"));
}

#[tokio::test]
async fn no_registrations_is_a_quiet_no_op() {
    let (_dir, store) = seeded_store();
    let transport = RecordingTransport::default();
    let report = run_weekly(&store, &transport, today(), &RenderOptions::default())
        .await
        .unwrap();
    assert_eq!((report.tally.sent, report.tally.failed), (0, 0));
    assert!(transport.attempts().is_empty());
}

#[tokio::test]
async fn missing_hub_attempts_no_delivery() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.register("mike", "tok-mike").unwrap();

    let transport = RecordingTransport::default();
    let err = run_weekly(&store, &transport, today(), &RenderOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound));
    assert!(transport.attempts().is_empty());
}

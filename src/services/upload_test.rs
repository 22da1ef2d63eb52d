use super::*;
use crate::config::Timing;
use crate::random::ScriptedRandom;
use std::time::Duration;
use tokio::time::timeout;

/// Every draw is 0.9: size "5.5MB", upload +27/tick, analysis +22.5/tick,
/// issue count 7.
fn scripted_simulator(config: SimulatorConfig) -> UploadSimulator {
    UploadSimulator::with_random(config, Arc::new(ScriptedRandom::new(vec![0.9])))
}

async fn next_event(sub: &mut Subscription) -> RecordEvent {
    timeout(Duration::from_secs(60), sub.events.recv())
        .await
        .expect("event receive timed out")
        .expect("event channel closed")
}

/// Collect events until `identifier` is observed Completed.
async fn events_until_completed(sub: &mut Subscription, identifier: &str) -> Vec<RecordEvent> {
    let mut seen = Vec::new();
    loop {
        let event = next_event(sub).await;
        let done = matches!(
            &event,
            RecordEvent::Changed { record } if record.identifier == identifier && record.phase == Phase::Completed
        );
        seen.push(event);
        if done {
            return seen;
        }
    }
}

fn changed_records<'a>(events: &'a [RecordEvent], identifier: &str) -> Vec<&'a UploadRecord> {
    events
        .iter()
        .filter_map(|event| match event {
            RecordEvent::Changed { record } if record.identifier == identifier => Some(record),
            _ => None,
        })
        .collect()
}

// =============================================================================
// submit
// =============================================================================

#[tokio::test(start_paused = true)]
async fn submit_registers_uploading_record_and_notifies() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let mut sub = sim.subscribe().await;

    let record = sim.submit("Login.fig").await.unwrap();
    assert_eq!(record.phase, Phase::Uploading);
    assert!(record.progress.abs() < f64::EPSILON);
    assert_eq!(record.size_label, "5.5MB");
    assert_eq!(record.issue_count, None);

    let first = next_event(&mut sub).await;
    assert_eq!(first, RecordEvent::Changed { record: record.clone() });
    assert_eq!(sim.get(record.id).await, Some(record));
}

#[tokio::test]
async fn submit_rejects_empty_identifier() {
    let sim = scripted_simulator(SimulatorConfig::default());
    assert_eq!(sim.submit("").await, Err(UploadError::EmptyIdentifier));
    assert_eq!(sim.submit("   ").await, Err(UploadError::EmptyIdentifier));
    assert!(sim.list().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn submit_trims_identifier() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let record = sim.submit("  Home.fig \n").await.unwrap();
    assert_eq!(record.identifier, "Home.fig");
}

#[tokio::test(start_paused = true)]
async fn duplicate_identifiers_are_independent_by_default() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let a = sim.submit("Login.fig").await.unwrap();
    let b = sim.submit("Login.fig").await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.identifier, b.identifier);
    assert!(b.seq > a.seq);

    let listed: Vec<Uuid> = sim.list().await.iter().map(|r| r.id).collect();
    assert_eq!(listed, vec![a.id, b.id]);
}

#[tokio::test(start_paused = true)]
async fn suffix_policy_disambiguates_duplicates() {
    let config = SimulatorConfig { duplicate_policy: DuplicatePolicy::Suffix, ..SimulatorConfig::default() };
    let sim = scripted_simulator(config);

    let first = sim.submit("Login.fig").await.unwrap();
    let second = sim.submit("Login.fig").await.unwrap();
    let third = sim.submit("Login.fig").await.unwrap();
    let bare = sim.submit("README").await.unwrap();
    let bare_dup = sim.submit("README").await.unwrap();

    assert_eq!(first.identifier, "Login.fig");
    assert_eq!(second.identifier, "Login (1).fig");
    assert_eq!(third.identifier, "Login (2).fig");
    assert_eq!(bare.identifier, "README");
    assert_eq!(bare_dup.identifier, "README (1)");
}

// =============================================================================
// progression
// =============================================================================

#[tokio::test(start_paused = true)]
async fn scripted_draws_produce_exact_transition_points() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let mut sub = sim.subscribe().await;
    let started = tokio::time::Instant::now();

    sim.submit("Login.fig").await.unwrap();
    let events = events_until_completed(&mut sub, "Login.fig").await;
    let elapsed = started.elapsed();

    let observed: Vec<(Phase, f64)> = changed_records(&events, "Login.fig")
        .iter()
        .map(|r| (r.phase, r.progress))
        .collect();
    let expected = vec![
        (Phase::Uploading, 0.0),
        (Phase::Uploading, 27.0),
        (Phase::Uploading, 54.0),
        (Phase::Uploading, 81.0),
        (Phase::Uploading, 100.0),
        (Phase::Analyzing, 0.0),
        (Phase::Analyzing, 22.5),
        (Phase::Analyzing, 45.0),
        (Phase::Analyzing, 67.5),
        (Phase::Analyzing, 90.0),
        (Phase::Analyzing, 100.0),
        (Phase::Completed, 100.0),
    ];
    assert_eq!(observed.len(), expected.len(), "observed {observed:?}");
    for ((phase, progress), (want_phase, want_progress)) in observed.iter().zip(&expected) {
        assert_eq!(phase, want_phase);
        assert!((progress - want_progress).abs() < 1e-9, "progress {progress} != {want_progress}");
    }

    let last = changed_records(&events, "Login.fig").pop().unwrap().clone();
    assert_eq!(last.issue_count, Some(7));

    // 4 upload ticks of 200ms, 500ms hand-off, 5 analysis ticks of 300ms.
    assert!(elapsed >= Duration::from_millis(2800), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2900), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn progression_invariants_hold_with_thread_random() {
    let sim = UploadSimulator::new(SimulatorConfig::default());
    let mut sub = sim.subscribe().await;

    sim.submit("Login.fig").await.unwrap();
    let events = events_until_completed(&mut sub, "Login.fig").await;
    let records = changed_records(&events, "Login.fig");

    let first = records.first().unwrap();
    assert_eq!(first.phase, Phase::Uploading);
    assert!(first.progress.abs() < f64::EPSILON);

    let mut phases_seen = vec![first.phase];
    for pair in records.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if prev.phase == next.phase {
            assert!(next.progress >= prev.progress, "progress went backward: {prev:?} -> {next:?}");
        } else {
            assert!(prev.phase.can_transition_to(next.phase), "illegal step {} -> {}", prev.phase, next.phase);
            assert!((prev.progress - 100.0).abs() < f64::EPSILON, "left {} at {}", prev.phase, prev.progress);
            phases_seen.push(next.phase);
        }
        if next.phase != Phase::Completed {
            assert_eq!(next.issue_count, None);
        }
    }
    assert_eq!(phases_seen, vec![Phase::Uploading, Phase::Analyzing, Phase::Completed]);

    let last = records.last().unwrap();
    assert!((last.progress - 100.0).abs() < f64::EPSILON);
    let issues = last.issue_count.unwrap();
    assert!(issues < 8);

    // Completed records never change again.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(sub.events.try_recv().is_err());
    assert_eq!(sim.get(last.id).await.unwrap().issue_count, Some(issues));
}

// =============================================================================
// remove
// =============================================================================

#[tokio::test(start_paused = true)]
async fn removing_unknown_identifier_is_noop() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let mut sub = sim.subscribe().await;

    assert_eq!(sim.remove("ghost.fig").await, 0);
    assert_eq!(sim.remove_record(Uuid::new_v4()).await, None);
    assert!(sub.events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn remove_mid_analysis_leaves_other_record_running() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let mut sub = sim.subscribe().await;

    let a = sim.submit("A.fig").await.unwrap();
    let b = sim.submit("B.fig").await.unwrap();

    // Wait until A is analyzing.
    loop {
        if let RecordEvent::Changed { record } = next_event(&mut sub).await {
            if record.id == a.id && record.phase == Phase::Analyzing {
                break;
            }
        }
    }

    assert_eq!(sim.remove("A.fig").await, 1);
    assert_eq!(sim.get(a.id).await, None);

    // B's hand-off event may already be queued ahead of A's removal.
    let after = events_until_completed(&mut sub, "B.fig").await;
    let a_events: Vec<&RecordEvent> = after.iter().filter(|event| event.record_id() == a.id).collect();
    assert_eq!(
        a_events,
        vec![&RecordEvent::Removed { id: a.id, identifier: "A.fig".into() }],
        "events for removed record leaked: {after:?}"
    );

    let b_final = sim.get(b.id).await.unwrap();
    assert_eq!(b_final.phase, Phase::Completed);
    assert_eq!(b_final.issue_count, Some(7));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(sub.events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn remove_deletes_all_records_with_matching_name() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let mut sub = sim.subscribe().await;

    let first = sim.submit("Login.fig").await.unwrap();
    let second = sim.submit("Login.fig").await.unwrap();
    let other = sim.submit("Home.fig").await.unwrap();
    for _ in 0..3 {
        next_event(&mut sub).await;
    }

    assert_eq!(sim.remove(" Login.fig ").await, 2);

    // Removal events arrive in submission order.
    assert_eq!(next_event(&mut sub).await.record_id(), first.id);
    assert_eq!(next_event(&mut sub).await.record_id(), second.id);

    let remaining: Vec<Uuid> = sim.list().await.iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![other.id]);
}

#[tokio::test(start_paused = true)]
async fn remove_record_by_id_stops_driver() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let record = sim.submit("Login.fig").await.unwrap();

    let removed = sim.remove_record(record.id).await.unwrap();
    assert_eq!(removed.id, record.id);

    let mut sub = sim.subscribe().await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(sub.events.try_recv().is_err());
    assert!(sim.list().await.is_empty());
}

// =============================================================================
// observers
// =============================================================================

#[tokio::test(start_paused = true)]
async fn closed_observers_are_pruned() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let sub = sim.subscribe().await;
    drop(sub);

    sim.submit("Login.fig").await.unwrap();
    assert!(sim.inner.read().await.subscribers.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unsubscribe_stops_delivery() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let mut sub = sim.subscribe().await;
    sim.unsubscribe(sub.id).await;

    sim.submit("Login.fig").await.unwrap();
    assert!(sub.events.recv().await.is_none(), "sender should be dropped on unsubscribe");
}

#[tokio::test(start_paused = true)]
async fn full_observer_queue_prunes_subscriber_without_blocking() {
    let config = SimulatorConfig { event_queue_capacity: 1, ..SimulatorConfig::default() };
    let sim = scripted_simulator(config);
    let mut sub = sim.subscribe().await;
    let mut healthy = sim.subscribe().await;

    let a = sim.submit("A.fig").await.unwrap();
    assert_eq!(next_event(&mut healthy).await.record_id(), a.id);
    let b = sim.submit("B.fig").await.unwrap();

    // The lagging observer keeps what was queued, then its stream ends.
    assert_eq!(next_event(&mut sub).await.record_id(), a.id);
    assert!(sub.events.recv().await.is_none(), "full observer should be dropped");

    let subscribers = sim.inner.read().await.subscribers.len();
    assert_eq!(subscribers, 1);
    assert_eq!(next_event(&mut healthy).await.record_id(), b.id);
    assert_eq!(sim.list().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn lagging_observer_never_misses_a_terminal_event_silently() {
    let config = SimulatorConfig { event_queue_capacity: 2, ..SimulatorConfig::default() };
    let sim = scripted_simulator(config);
    let mut sub = sim.subscribe().await;

    let a = sim.submit("A.fig").await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(sim.get(a.id).await.map(|r| r.phase), Some(Phase::Completed));

    let mut seen = Vec::new();
    while let Some(event) = sub.events.recv().await {
        seen.push(event);
    }
    assert_eq!(seen.len(), 2);
    assert!(sim.inner.read().await.subscribers.is_empty());

    // A fresh subscription resyncs from the current state.
    let (_, snapshot) = sim.subscribe_with_snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].phase, Phase::Completed);
}

#[tokio::test(start_paused = true)]
async fn stats_count_phases_and_issues() {
    let config = SimulatorConfig {
        timing: Timing {
            upload_tick: Duration::from_millis(10),
            analysis_tick: Duration::from_millis(10),
            analysis_handoff: Duration::ZERO,
        },
        ..SimulatorConfig::default()
    };
    let sim = scripted_simulator(config);
    let mut sub = sim.subscribe().await;

    sim.submit("A.fig").await.unwrap();
    events_until_completed(&mut sub, "A.fig").await;
    sim.submit("B.fig").await.unwrap();

    let stats = sim.stats().await;
    assert_eq!(stats, UploadStats { total: 2, active: 1, completed: 1, failed: 0, issues_found: 7 });
}

#[tokio::test(start_paused = true)]
async fn snapshot_subscription_sees_only_newer_events() {
    let sim = scripted_simulator(SimulatorConfig::default());
    let a = sim.submit("A.fig").await.unwrap();
    tokio::time::sleep(Duration::from_millis(450)).await;

    let (mut sub, snapshot) = sim.subscribe_with_snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert!((snapshot[0].progress - 54.0).abs() < 1e-9);

    let next = next_event(&mut sub).await;
    let RecordEvent::Changed { record } = next else {
        panic!("expected a change event, got {next:?}");
    };
    assert_eq!(record.id, a.id);
    assert!((record.progress - 81.0).abs() < 1e-9);
}

//! Contract Test: Batch Failure Behavior
//!
//! Constraints verified:
//! - A listing failure is fatal: nothing is evaluated
//! - One failed state update aborts the remainder of the batch
//!
//! If this test fails, the batch is silently skipping or continuing past
//! directory errors.

mod common;

use common::*;
use domval_core::engine::EngineEvent;

#[tokio::test]
async fn listing_failure_evaluates_nothing() {
    let directory = MockDirectory::failing_listing();
    let resolver = MockResolver::returning(EXPECTED_TARGET);
    let (engine, _events) = engine(&directory, &resolver);

    let result = engine.run(false).await;

    assert!(result.is_err(), "A failed listing must fail the batch");
    assert_eq!(directory.list_call_count(), 1);
    assert_eq!(resolver.resolve_call_count(), 0);
    assert_eq!(directory.set_call_count(), 0);
}

#[tokio::test]
async fn failed_update_aborts_remaining_domains() {
    let directory = MockDirectory::with_records(vec![
        pending_domain("a.example.com", 86_400),
        pending_domain("b.example.com", 86_400),
        pending_domain("c.example.com", 86_400),
    ]);
    directory.fail_update_for("b.example.com");

    let resolver = MockResolver::returning(EXPECTED_TARGET);
    let (engine, mut events) = engine(&directory, &resolver);

    let result = engine.run(false).await;

    assert!(result.is_err(), "A failed update must fail the batch");

    // a updated, b attempted and failed, c never reached.
    assert_eq!(directory.set_call_count(), 2);
    assert_eq!(resolver.resolve_call_count(), 2);
    let attempted: Vec<String> = directory
        .set_calls()
        .into_iter()
        .map(|(_, domain, _)| domain)
        .collect();
    assert_eq!(
        attempted,
        vec!["a.example.com".to_string(), "b.example.com".to_string()]
    );

    // The failure is surfaced on the event channel too.
    drop(engine);
    let mut saw_failure = false;
    while let Some(event) = events.recv().await {
        if let EngineEvent::UpdateFailed { domain_name, .. } = event {
            assert_eq!(domain_name, "b.example.com");
            saw_failure = true;
        }
    }
    assert!(saw_failure, "Expected an UpdateFailed event");
}

//! Contract Test: Expired Records
//!
//! Constraints verified:
//! - A record past its deadline is invalidated without any DNS lookup
//! - A record that is already INVALID triggers no directory write
//!
//! If this test fails, expired domains are hitting the resolver.

mod common;

use common::*;
use domval_core::traits::ValidationState;

#[tokio::test]
async fn expired_domain_is_invalidated_without_lookup() {
    let directory = MockDirectory::with_records(vec![pending_domain("stale.example.com", -3600)]);
    let resolver = MockResolver::returning(EXPECTED_TARGET);
    let (engine, _events) = engine(&directory, &resolver);

    let summary = engine.run(false).await.expect("batch succeeds");

    assert_eq!(
        resolver.resolve_call_count(),
        0,
        "Expired domains must not be resolved"
    );
    assert_eq!(summary.evaluated, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(
        directory.set_calls(),
        vec![(
            "org-stale.example.com".to_string(),
            "stale.example.com".to_string(),
            ValidationState::Invalid,
        )]
    );
    assert_eq!(
        directory.state_of("stale.example.com"),
        Some(ValidationState::Invalid)
    );
}

#[tokio::test]
async fn already_invalid_expired_domain_triggers_no_update() {
    let directory = MockDirectory::with_records(vec![domain_with_state(
        "stale.example.com",
        ValidationState::Invalid,
        -3600,
    )]);
    let resolver = MockResolver::returning(EXPECTED_TARGET);
    let (engine, _events) = engine(&directory, &resolver);

    let summary = engine.run(false).await.expect("batch succeeds");

    assert_eq!(resolver.resolve_call_count(), 0);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(
        directory.set_call_count(),
        0,
        "An unchanged state must not be written back"
    );
}

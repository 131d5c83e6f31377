//! Test doubles and common utilities for engine contract tests
//!
//! These doubles count their calls so tests can verify what the engine
//! did (and, just as importantly, did not) ask its collaborators to do.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use domval_core::config::EngineConfig;
use domval_core::engine::EngineEvent;
use domval_core::error::Result;
use domval_core::traits::{DomainDirectory, DomainRecord, NameResolver, ValidationState};
use domval_core::ValidationEngine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Expected CNAME target used by the record helpers below
pub const EXPECTED_TARGET: &str = "target.example.net";

/// Scripted answer a [`MockResolver`] returns for every lookup
#[derive(Clone)]
pub enum MockAnswer {
    /// Successful lookup with one answer
    Value(String),
    /// Successful lookup with no answer
    Empty,
    /// Failed lookup (NXDOMAIN, network error)
    Fail,
}

/// A scripted NameResolver that counts lookups
#[derive(Clone)]
pub struct MockResolver {
    answer: MockAnswer,
    resolve_call_count: Arc<AtomicUsize>,
}

impl MockResolver {
    /// Resolver that always answers with `value`
    pub fn returning(value: &str) -> Self {
        Self {
            answer: MockAnswer::Value(value.to_string()),
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolver whose lookups succeed with no answer
    pub fn empty() -> Self {
        Self {
            answer: MockAnswer::Empty,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolver whose lookups always fail
    pub fn failing() -> Self {
        Self {
            answer: MockAnswer::Fail,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve_cname() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameResolver for MockResolver {
    async fn resolve_cname(&self, _name: &str) -> Result<Option<String>> {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            MockAnswer::Value(value) => Ok(Some(value.clone())),
            MockAnswer::Empty => Ok(None),
            MockAnswer::Fail => Err(domval_core::Error::resolver("no such record")),
        }
    }
}

/// A mock DomainDirectory that applies updates to its own records and
/// counts calls
#[derive(Clone)]
pub struct MockDirectory {
    records: Arc<Mutex<Vec<DomainRecord>>>,
    fail_listing: bool,
    fail_update_for: Arc<Mutex<Option<String>>>,
    list_call_count: Arc<AtomicUsize>,
    set_call_count: Arc<AtomicUsize>,
    set_calls: Arc<Mutex<Vec<(String, String, ValidationState)>>>,
}

impl MockDirectory {
    /// Directory serving the given records
    pub fn with_records(records: Vec<DomainRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fail_listing: false,
            fail_update_for: Arc::new(Mutex::new(None)),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            set_call_count: Arc::new(AtomicUsize::new(0)),
            set_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Directory whose listing always fails
    pub fn failing_listing() -> Self {
        Self {
            fail_listing: true,
            ..Self::with_records(Vec::new())
        }
    }

    /// Make updates fail for one domain name
    pub fn fail_update_for(&self, domain_name: &str) {
        *self.fail_update_for.lock().unwrap() = Some(domain_name.to_string());
    }

    /// Get the number of times set_validation_state() was called
    pub fn set_call_count(&self) -> usize {
        self.set_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times list_pending_validation() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the recorded (organisation_id, domain_name, state) update calls
    pub fn set_calls(&self) -> Vec<(String, String, ValidationState)> {
        self.set_calls.lock().unwrap().clone()
    }

    /// Get the current state of one record
    pub fn state_of(&self, domain_name: &str) -> Option<ValidationState> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.domain_name == domain_name)
            .map(|r| r.validation_state)
    }
}

#[async_trait]
impl DomainDirectory for MockDirectory {
    async fn list_pending_validation(&self) -> Result<Vec<DomainRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(domval_core::Error::directory("listing unavailable"));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn set_validation_state(
        &self,
        organisation_id: &str,
        domain_name: &str,
        state: ValidationState,
    ) -> Result<()> {
        self.set_call_count.fetch_add(1, Ordering::SeqCst);
        self.set_calls.lock().unwrap().push((
            organisation_id.to_string(),
            domain_name.to_string(),
            state,
        ));

        if self.fail_update_for.lock().unwrap().as_deref() == Some(domain_name) {
            return Err(domval_core::Error::directory("update rejected"));
        }

        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.domain_name == domain_name) {
            record.validation_state = state;
        }
        Ok(())
    }
}

/// Build a record in the given state expiring `expires_in_secs` from now
/// (negative values produce an already-expired record)
pub fn domain_with_state(
    name: &str,
    state: ValidationState,
    expires_in_secs: i64,
) -> DomainRecord {
    DomainRecord {
        organisation_id: format!("org-{name}"),
        domain_name: name.to_string(),
        validation_record_name: format!("_validate.{name}"),
        validation_record_value: EXPECTED_TARGET.to_string(),
        validation_state: state,
        validation_expiration_date: Utc::now() + Duration::seconds(expires_in_secs),
    }
}

/// Build a pending record expiring `expires_in_secs` from now
pub fn pending_domain(name: &str, expires_in_secs: i64) -> DomainRecord {
    domain_with_state(name, ValidationState::Pending, expires_in_secs)
}

/// Build an engine over clones of the given doubles
pub fn engine(
    directory: &MockDirectory,
    resolver: &MockResolver,
) -> (ValidationEngine, mpsc::Receiver<EngineEvent>) {
    ValidationEngine::new(
        Box::new(directory.clone()),
        Box::new(resolver.clone()),
        EngineConfig::default(),
    )
    .expect("engine construction succeeds")
}

//! Core validation engine
//!
//! The ValidationEngine is responsible for:
//! - Listing domains pending validation via DomainDirectory
//! - Checking each domain's validation CNAME via NameResolver
//! - Deciding the next validation state per domain
//! - Persisting state changes via DomainDirectory (unless previewing)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ DomainDirectory │─── pending records ───┐
//! └─────────────────┘                       │
//!                                           ▼
//!                                 ┌──────────────────┐
//!                                 │ ValidationEngine │
//!                                 └──────────────────┘
//!                                           │
//!         ┌─────────────────────────────────┼─────────────────────────────┐
//!         │                                 │                             │
//!         ▼                                 ▼                             ▼
//! ┌──────────────┐               ┌─────────────────┐             ┌─────────────┐
//! │ NameResolver │               │ DomainDirectory │             │   Events    │
//! │ (lookup)     │               │ (update)        │             │  (notify)   │
//! └──────────────┘               └─────────────────┘             └─────────────┘
//! ```
//!
//! ## Batch Flow
//!
//! 1. Directory lists the pending domains (failure here aborts the batch)
//! 2. For each domain, in order: expiry check, CNAME lookup, decision
//! 3. If the decided state differs from the current one, update the directory
//! 4. Emit an event for monitoring/logging
//!
//! Evaluation is strictly sequential: a domain's network round trip
//! completes before the next domain starts. Nothing learned during a batch
//! outlives it.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::traits::{DomainDirectory, DomainRecord, NameResolver, ValidationState};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Outcome of a CNAME lookup for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CnameLookup {
    /// The lookup succeeded with at least one answer
    Resolved(String),

    /// The lookup succeeded but returned no answer
    Empty,

    /// The lookup failed (no such record, network error)
    ///
    /// Distinct from [`CnameLookup::Empty`]: a failed lookup never
    /// satisfies the match condition, but both fall through to the same
    /// expiry/pending fallback.
    Unavailable,
}

impl CnameLookup {
    /// The resolved target, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            CnameLookup::Resolved(value) => Some(value),
            CnameLookup::Empty | CnameLookup::Unavailable => None,
        }
    }
}

/// Result of evaluating one domain, without any directory write
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The decided validation state
    pub next_state: ValidationState,

    /// The CNAME lookup outcome; `None` when the lookup was skipped because
    /// the record had already expired
    pub lookup: Option<CnameLookup>,

    /// Whether the resolved value matched the expected target
    pub matched: bool,

    /// Whether the record was past its expiration deadline
    pub expired: bool,
}

/// Counts for one completed batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Domains evaluated
    pub evaluated: usize,

    /// Domains whose decided state differed from their current one
    /// (written back unless previewing)
    pub updated: usize,

    /// Domains whose state was already correct
    pub unchanged: usize,
}

/// Events emitted by the ValidationEngine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A batch run started
    BatchStarted {
        /// Number of domains the directory reported as pending
        pending: usize,
    },

    /// One domain was evaluated
    Evaluated {
        domain_name: String,
        initial_state: ValidationState,
        next_state: ValidationState,
    },

    /// A state change was written to the directory
    UpdateApplied {
        domain_name: String,
        state: ValidationState,
    },

    /// A state change failed to persist; the batch stops here
    UpdateFailed {
        domain_name: String,
        error: String,
    },

    /// A batch run completed
    BatchCompleted { summary: BatchSummary },
}

/// True once the current time has reached the record's expiration deadline.
///
/// Called twice per evaluation with a fresh timestamp each time; the two
/// calls may disagree if time crosses the deadline between them. That is
/// accepted behavior, not a race to fix.
pub fn has_expired(domain: &DomainRecord, now: DateTime<Utc>) -> bool {
    now >= domain.validation_expiration_date
}

/// Decide the next validation state from a completed lookup.
///
/// An exact string match on the resolved target wins outright; otherwise
/// an expired record is invalid and anything else stays pending. `Empty`
/// and `Unavailable` both take the fallback path.
pub fn decide(expected: &str, lookup: &CnameLookup, expired: bool) -> ValidationState {
    match lookup.value() {
        Some(value) if value == expected => ValidationState::Valid,
        _ if expired => ValidationState::Invalid,
        _ => ValidationState::Pending,
    }
}

/// Core validation engine
///
/// Orchestrates one batch run over the domains the directory reports as
/// pending. The engine holds no state between runs: records are owned by
/// the directory, and DNS answers are never cached.
///
/// ## Lifecycle
///
/// 1. Create with [`ValidationEngine::new()`]
/// 2. Run a batch with [`ValidationEngine::run()`]
/// 3. Drop to close the event channel
///
/// ## Threading
///
/// The engine runs all evaluations sequentially on the calling task. The
/// only suspension points are the resolver lookup and the directory calls.
pub struct ValidationEngine {
    /// Directory owning the domain records
    directory: Box<dyn DomainDirectory>,

    /// Resolver for validation CNAME lookups
    resolver: Box<dyn NameResolver>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl ValidationEngine {
    /// Create a new validation engine
    ///
    /// # Parameters
    ///
    /// - `directory`: Domain Directory implementation
    /// - `resolver`: Name Resolver implementation
    /// - `config`: engine configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// engine events
    pub fn new(
        directory: Box<dyn DomainDirectory>,
        resolver: Box<dyn NameResolver>,
        config: EngineConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            directory,
            resolver,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Run one validation batch
    ///
    /// Lists every domain pending validation and evaluates them one at a
    /// time. In preview mode every decision is computed and reported but
    /// nothing is ever written back, whether or not the state changed.
    ///
    /// # Errors
    ///
    /// - the directory listing fails: no domains are evaluated
    /// - a state update fails: the error propagates immediately and
    ///   domains later in the sequence are not evaluated
    pub async fn run(&self, preview: bool) -> Result<BatchSummary> {
        let domains = self.directory.list_pending_validation().await?;
        info!("Evaluating {} domain(s) pending validation", domains.len());
        self.emit_event(EngineEvent::BatchStarted {
            pending: domains.len(),
        });

        let mut summary = BatchSummary::default();
        for domain in &domains {
            let initial_state = domain.validation_state;
            let evaluation = self.evaluate(domain).await;
            summary.evaluated += 1;

            self.emit_event(EngineEvent::Evaluated {
                domain_name: domain.domain_name.clone(),
                initial_state,
                next_state: evaluation.next_state,
            });

            if evaluation.next_state == initial_state {
                summary.unchanged += 1;
            } else {
                summary.updated += 1;
            }

            if preview {
                info!(
                    "Preview: org={} domain={} cname={:?} matched={} expired={} state={}",
                    domain.organisation_id,
                    domain.domain_name,
                    evaluation.lookup.as_ref().and_then(CnameLookup::value),
                    evaluation.matched,
                    evaluation.expired,
                    evaluation.next_state,
                );
                continue;
            }

            if evaluation.next_state == initial_state {
                debug!(
                    "Domain {} already {}, no update needed",
                    domain.domain_name, initial_state
                );
                continue;
            }

            match self
                .directory
                .set_validation_state(
                    &domain.organisation_id,
                    &domain.domain_name,
                    evaluation.next_state,
                )
                .await
            {
                Ok(()) => {
                    info!(
                        "Domain {}: {} -> {}",
                        domain.domain_name, initial_state, evaluation.next_state
                    );
                    self.emit_event(EngineEvent::UpdateApplied {
                        domain_name: domain.domain_name.clone(),
                        state: evaluation.next_state,
                    });
                }
                Err(e) => {
                    self.emit_event(EngineEvent::UpdateFailed {
                        domain_name: domain.domain_name.clone(),
                        error: e.to_string(),
                    });
                    // One failed update aborts the remainder of the batch.
                    return Err(e);
                }
            }
        }

        self.emit_event(EngineEvent::BatchCompleted { summary });
        Ok(summary)
    }

    /// Evaluate one domain without touching the directory
    ///
    /// Performs the expiry check, the CNAME lookup (skipped entirely for
    /// records already past their deadline) and the state decision.
    /// Resolution failures are recovered here and recorded as
    /// [`CnameLookup::Unavailable`]; they never propagate.
    pub async fn evaluate(&self, domain: &DomainRecord) -> Evaluation {
        if has_expired(domain, Utc::now()) {
            debug!(
                "Domain {} past its validation deadline, skipping lookup",
                domain.domain_name
            );
            return Evaluation {
                next_state: ValidationState::Invalid,
                lookup: None,
                matched: false,
                expired: true,
            };
        }

        let lookup = match self
            .resolver
            .resolve_cname(&domain.validation_record_name)
            .await
        {
            Ok(Some(value)) => CnameLookup::Resolved(value),
            Ok(None) => CnameLookup::Empty,
            Err(e) => {
                debug!(
                    "CNAME lookup for {} failed: {}",
                    domain.validation_record_name, e
                );
                CnameLookup::Unavailable
            }
        };

        // Re-check expiry with a fresh timestamp; time may have advanced
        // during the lookup.
        let expired = has_expired(domain, Utc::now());
        let next_state = decide(&domain.validation_record_value, &lookup, expired);

        Evaluation {
            next_state,
            matched: lookup.value() == Some(domain.validation_record_value.as_str()),
            lookup: Some(lookup),
            expired,
        }
    }

    /// Emit an engine event
    ///
    /// # Parameters
    ///
    /// - `event`: The event to emit
    fn emit_event(&self, event: EngineEvent) {
        // Send event, logging a warning if the channel is full (backpressure)
        if self.event_tx.try_send(event).is_err() {
            warn!(
                "Event channel full, dropping event. Consider increasing event_channel_capacity."
            );
        }
    }
}

// # Domain Directory Trait
//
// Defines the interface to the directory service that owns the domain
// records.
//
// ## Implementations
//
// - HTTP/JSON: `domval-directory-http` crate
// - Future: gRPC, direct database access, etc.
//
// ## Usage
//
// ```rust,ignore
// use domval_core::DomainDirectory;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let directory = /* DomainDirectory implementation */;
//
//     for domain in directory.list_pending_validation().await? {
//         println!("{} is {}", domain.domain_name, domain.validation_state);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation state of a domain-ownership record
///
/// Serializes to exactly the three uppercase literals the directory
/// service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationState {
    /// Ownership not yet proven; the domain stays in the re-check rotation
    Pending,
    /// The validation CNAME matched the expected target
    Valid,
    /// The validation window closed without a successful match
    Invalid,
}

impl std::fmt::Display for ValidationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ValidationState::Pending => "PENDING",
            ValidationState::Valid => "VALID",
            ValidationState::Invalid => "INVALID",
        };
        f.write_str(s)
    }
}

/// One organization-owned domain pending (or previously subject to)
/// validation
///
/// The directory service serializes records with PascalCase field names;
/// the serde attribute keeps the wire format intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainRecord {
    /// Opaque identifier of the owning organization
    pub organisation_id: String,

    /// The domain name being validated
    pub domain_name: String,

    /// The DNS name the resolver must query (a CNAME label)
    pub validation_record_name: String,

    /// The expected CNAME target
    pub validation_record_value: String,

    /// Current validation state
    pub validation_state: ValidationState,

    /// Deadline after which validation must be considered failed if it has
    /// not already succeeded. Set externally, never mutated here.
    pub validation_expiration_date: DateTime<Utc>,
}

/// Trait for Domain Directory implementations
///
/// The directory owns the domain records: the validation engine only reads
/// them and requests state updates. It keeps no copy across batch runs.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Allowed Capabilities
/// - ✅ Perform request/response calls to the directory service
/// - ✅ Parse service-specific responses
/// - ✅ Return success or failure per call
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff (a failed call is surfaced to the
///   batch runner as-is)
/// - ❌ Decide whether a state change is needed (owned by the engine)
/// - ❌ Cache records between calls (the service is the source of truth)
#[async_trait]
pub trait DomainDirectory: Send + Sync {
    /// List all domains currently needing a validation re-check
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DomainRecord>)`: every record pending validation
    /// - `Err(Error)`: the listing failed; there is no partial list, so the
    ///   whole batch is abandoned
    async fn list_pending_validation(&self) -> Result<Vec<DomainRecord>, crate::Error>;

    /// Set the validation state of one record
    ///
    /// # Idempotency
    ///
    /// This method must be idempotent: setting a record to the state it
    /// already has is safe and results in no additional changes.
    ///
    /// # Parameters
    ///
    /// - `organisation_id`: identifier of the owning organization
    /// - `domain_name`: the domain whose record is updated
    /// - `state`: the new validation state
    async fn set_validation_state(
        &self,
        organisation_id: &str,
        domain_name: &str,
        state: ValidationState,
    ) -> Result<(), crate::Error>;
}

/// Helper trait for constructing directory clients from configuration
pub trait DomainDirectoryFactory: Send + Sync {
    /// Create a DomainDirectory instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this directory client
    ///
    /// # Returns
    ///
    /// A boxed DomainDirectory trait object
    fn create(
        &self,
        config: &crate::config::DirectoryConfig,
    ) -> Result<Box<dyn DomainDirectory>, crate::Error>;
}

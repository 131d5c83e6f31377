// # Name Resolver Trait
//
// Defines the interface for CNAME lookups against live DNS.
//
// ## Implementations
//
// - Hickory (system configuration or explicit nameserver):
//   `domval-resolver-hickory` crate
//
// ## Usage
//
// ```rust,ignore
// use domval_core::NameResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* NameResolver implementation */;
//
//     match resolver.resolve_cname("_validate.example.com").await {
//         Ok(Some(target)) => println!("points at {target}"),
//         Ok(None) => println!("no answer"),
//         Err(e) => println!("lookup failed: {e}"),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for Name Resolver implementations
///
/// Resolvers are observers, not decision-makers: they answer a single
/// lookup and know nothing about validation state.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// ## Allowed Capabilities
/// - ✅ Perform DNS queries for the requested name
/// - ✅ Normalize answers (e.g. trim the trailing root dot)
///
/// ## Forbidden Capabilities
/// - ❌ Cache answers across lookups (each evaluation queries live DNS)
/// - ❌ Implement retry logic (a failed lookup is a meaningful outcome the
///   engine converts to a non-matching sentinel)
/// - ❌ Compare answers against expected values (owned by the engine)
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Resolve the CNAME record at `name`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(target))`: the first CNAME target for the name
    /// - `Ok(None)`: the lookup succeeded but returned no usable answer
    /// - `Err(Error)`: resolution failed (no such record, network error)
    async fn resolve_cname(&self, name: &str) -> Result<Option<String>, crate::Error>;
}

/// Helper trait for constructing resolvers from configuration
pub trait NameResolverFactory: Send + Sync {
    /// Create a NameResolver instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this resolver type
    ///
    /// # Returns
    ///
    /// A boxed NameResolver trait object
    fn create(
        &self,
        config: &crate::config::ResolverConfig,
    ) -> Result<Box<dyn NameResolver>, crate::Error>;
}

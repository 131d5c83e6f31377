// # Hickory Name Resolver
//
// CNAME lookups for the domain validation system, backed by
// hickory-resolver.
//
// ## Behavior
//
// - Uses the host system DNS configuration (e.g. `/etc/resolv.conf`) by
//   default, falling back to the library's default upstream set when the
//   system configuration cannot be loaded
// - Can target an explicit nameserver instead
// - Returns the first CNAME answer with the trailing root dot trimmed
// - Lookup failures (no such record, timeouts, network errors) surface as
//   errors; the engine decides what they mean for validation state
//
// No caching across lookups and no retry: each call is one live query.

use async_trait::async_trait;
use domval_core::config::ResolverConfig;
use domval_core::traits::{NameResolver, NameResolverFactory};
use domval_core::{ComponentRegistry, Error, Result};
use hickory_resolver::{
    TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig as HickoryConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::rr::RecordType,
};
use std::net::IpAddr;

/// Name Resolver backed by a hickory [`TokioResolver`]
pub struct HickoryNameResolver {
    resolver: TokioResolver,
}

impl HickoryNameResolver {
    /// Create a resolver using the host system DNS configuration
    pub fn from_system_conf() -> Self {
        Self {
            resolver: build_system_resolver(),
        }
    }

    /// Create a resolver targeting a specific nameserver IP
    pub fn with_nameserver(ns_ip: IpAddr) -> Self {
        let config = HickoryConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[ns_ip], 53, true),
        );
        let provider = TokioConnectionProvider::default();
        let resolver = TokioResolver::builder_with_config(config, provider)
            .with_options(ResolverOpts::default())
            .build();

        Self { resolver }
    }
}

/// Build a resolver using the host system DNS configuration (with fallback).
fn build_system_resolver() -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(builder) => return builder.build(),
            Err(e) => {
                tracing::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    let provider = TokioConnectionProvider::default();
    TokioResolver::builder_with_config(HickoryConfig::default(), provider)
        .with_options(ResolverOpts::default())
        .build()
}

/// Strip the trailing root dot from a DNS name
fn normalize_target(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

#[async_trait]
impl NameResolver for HickoryNameResolver {
    async fn resolve_cname(&self, name: &str) -> Result<Option<String>> {
        let response = self
            .resolver
            .lookup(name, RecordType::CNAME)
            .await
            .map_err(|e| Error::resolver(format!("CNAME lookup for {} failed: {}", name, e)))?;

        let target = response
            .record_iter()
            .find_map(|record| record.data().as_cname())
            .map(|cname| normalize_target(&cname.0.to_string()));

        Ok(target)
    }
}

/// Factory for registry-based construction of [`HickoryNameResolver`]
pub struct HickoryResolverFactory;

impl NameResolverFactory for HickoryResolverFactory {
    fn create(&self, config: &ResolverConfig) -> Result<Box<dyn NameResolver>> {
        match config {
            ResolverConfig::System => Ok(Box::new(HickoryNameResolver::from_system_conf())),
            ResolverConfig::Nameserver { address } => {
                let ns_ip: IpAddr = address.parse().map_err(|_| {
                    Error::config(format!("Invalid nameserver address: {}", address))
                })?;
                Ok(Box::new(HickoryNameResolver::with_nameserver(ns_ip)))
            }
            other => Err(Error::config(format!(
                "Hickory resolver factory cannot build '{}' config",
                other.type_name()
            ))),
        }
    }
}

/// Register this crate's factory with a registry
///
/// Handles both the `system` and `nameserver` configuration types.
pub fn register(registry: &ComponentRegistry) {
    registry.register_resolver("system", Box::new(HickoryResolverFactory));
    registry.register_resolver("nameserver", Box::new(HickoryResolverFactory));
}

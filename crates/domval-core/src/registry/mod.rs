//! Plugin-based component registry
//!
//! The registry allows Domain Directory clients and Name Resolvers to be
//! registered dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use domval_core::registry::ComponentRegistry;
//! use domval_core::config::DirectoryConfig;
//!
//! // Create a registry
//! let registry = ComponentRegistry::new();
//!
//! // Register directory clients
//! registry.register_directory("http", Box::new(http_factory));
//!
//! // Create a client from config
//! let config = DirectoryConfig::Http { /* ... */ };
//! let directory = registry.create_directory(&config)?;
//! ```
//!
//! ## Registration
//!
//! Implementations should register themselves during initialization:
//!
//! ```rust,ignore
//! // In domval-directory-http crate
//! pub fn register(registry: &ComponentRegistry) {
//!     registry.register_directory("http", Box::new(HttpDirectoryFactory));
//! }
//! ```

use crate::config::{DirectoryConfig, ResolverConfig};
use crate::error::{Error, Result};
use crate::traits::{DomainDirectory, DomainDirectoryFactory, NameResolver, NameResolverFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry for plugin-based construction of directories and resolvers
///
/// The registry maintains maps of component type names to factory objects,
/// allowing dynamic instantiation based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Registered Domain Directory factories
    directories: RwLock<HashMap<String, Box<dyn DomainDirectoryFactory>>>,

    /// Registered Name Resolver factories
    resolvers: RwLock<HashMap<String, Box<dyn NameResolverFactory>>>,
}

impl ComponentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Domain Directory factory
    ///
    /// # Parameters
    ///
    /// - `name`: Directory type name (e.g., "http")
    /// - `factory`: Factory object for creating directory instances
    pub fn register_directory(
        &self,
        name: impl Into<String>,
        factory: Box<dyn DomainDirectoryFactory>,
    ) {
        let name = name.into();
        let mut directories = self.directories.write().unwrap();
        directories.insert(name, factory);
    }

    /// Register a Name Resolver factory
    ///
    /// # Parameters
    ///
    /// - `name`: Resolver type name (e.g., "system", "nameserver")
    /// - `factory`: Factory object for creating resolver instances
    pub fn register_resolver(&self, name: impl Into<String>, factory: Box<dyn NameResolverFactory>) {
        let name = name.into();
        let mut resolvers = self.resolvers.write().unwrap();
        resolvers.insert(name, factory);
    }

    /// Create a Domain Directory from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no factory is registered for the
    /// config's type name, or whatever error the factory itself raises.
    pub fn create_directory(&self, config: &DirectoryConfig) -> Result<Box<dyn DomainDirectory>> {
        let directories = self.directories.read().unwrap();
        let factory = directories.get(config.type_name()).ok_or_else(|| {
            Error::config(format!(
                "No directory factory registered for type '{}'",
                config.type_name()
            ))
        })?;
        factory.create(config)
    }

    /// Create a Name Resolver from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no factory is registered for the
    /// config's type name, or whatever error the factory itself raises.
    pub fn create_resolver(&self, config: &ResolverConfig) -> Result<Box<dyn NameResolver>> {
        let resolvers = self.resolvers.read().unwrap();
        let factory = resolvers.get(config.type_name()).ok_or_else(|| {
            Error::config(format!(
                "No resolver factory registered for type '{}'",
                config.type_name()
            ))
        })?;
        factory.create(config)
    }
}

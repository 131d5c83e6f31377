//! Core traits for the domain validation system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`DomainDirectory`]: list records pending validation, persist state updates
//! - [`NameResolver`]: CNAME lookups against live DNS

pub mod domain_directory;
pub mod name_resolver;

pub use domain_directory::{
    DomainDirectory, DomainDirectoryFactory, DomainRecord, ValidationState,
};
pub use name_resolver::{NameResolver, NameResolverFactory};

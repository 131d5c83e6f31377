// # domval-core
//
// Core library for the domain-ownership validation system.
//
// ## Architecture Overview
//
// This library provides the core functionality for re-validating pending
// domain-ownership records against live DNS:
// - **DomainDirectory**: Trait for listing records pending validation and
//   persisting state updates
// - **NameResolver**: Trait for CNAME lookups
// - **ValidationEngine**: Core engine that runs one sequential batch of
//   evaluations and decides each record's next state
// - **ComponentRegistry**: Plugin-based registry for directory clients and
//   resolvers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: decision logic is pure and separate from I/O
// 2. **Library-First**: all core functionality can be used as a library
// 3. **Stateless**: nothing learned during a batch outlives it; the records
//    are owned by the Domain Directory
// 4. **Plugin-Based**: directory clients and resolvers are registered
//    dynamically, no hard-coded if-else

pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{DirectoryConfig, EngineConfig, ResolverConfig, ValidatorConfig};
pub use engine::{BatchSummary, CnameLookup, EngineEvent, Evaluation, ValidationEngine};
pub use error::{Error, Result};
pub use registry::ComponentRegistry;
pub use traits::{DomainDirectory, DomainRecord, NameResolver, ValidationState};

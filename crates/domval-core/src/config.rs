//! Configuration types for the domain validation system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main validator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Domain Directory configuration
    pub directory: DirectoryConfig,

    /// Name Resolver configuration
    pub resolver: ResolverConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ValidatorConfig {
    /// Create a new configuration with default engine settings
    pub fn new(directory: DirectoryConfig, resolver: ResolverConfig) -> Self {
        Self {
            directory,
            resolver,
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.directory.validate()?;
        self.resolver.validate()?;
        self.engine.validate()?;

        Ok(())
    }
}

/// Domain Directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectoryConfig {
    /// HTTP/JSON directory service
    Http {
        /// Base URL of the directory API
        base_url: String,
        /// Bearer token for the directory API
        api_token: String,
        /// Caller name reported to the service (optional)
        caller_name: Option<String>,
    },

    /// Custom directory client
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl DirectoryConfig {
    /// Validate the directory configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            DirectoryConfig::Http {
                base_url,
                api_token,
                ..
            } => {
                if base_url.is_empty() {
                    return Err(crate::Error::config("Directory base URL cannot be empty"));
                }
                if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
                    return Err(crate::Error::config(
                        "Directory base URL must use HTTP or HTTPS scheme",
                    ));
                }
                if api_token.is_empty() {
                    return Err(crate::Error::config("Directory API token cannot be empty"));
                }
                Ok(())
            }
            DirectoryConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom directory factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom directory config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the directory type name
    pub fn type_name(&self) -> &str {
        match self {
            DirectoryConfig::Http { .. } => "http",
            DirectoryConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Name Resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// Host system DNS configuration (e.g. /etc/resolv.conf)
    #[default]
    System,

    /// Explicit nameserver
    Nameserver {
        /// IP address of the nameserver to query
        address: String,
    },

    /// Custom resolver
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ResolverConfig::System => Ok(()),
            ResolverConfig::Nameserver { address } => {
                if address.parse::<std::net::IpAddr>().is_err() {
                    return Err(crate::Error::config(format!(
                        "Nameserver address is not a valid IP: {}",
                        address
                    )));
                }
                Ok(())
            }
            ResolverConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom resolver factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom resolver config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the resolver type name
    pub fn type_name(&self) -> &str {
        match self {
            ResolverConfig::System => "system",
            ResolverConfig::Nameserver { .. } => "nameserver",
            ResolverConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the internal event channel
    ///
    /// When full, new engine events are dropped (with a warning log).
    /// This prevents unbounded memory growth for callers that do not
    /// drain the receiver.
    ///
    /// Default: 1000 events
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config(
                "Event channel capacity must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    1000
}

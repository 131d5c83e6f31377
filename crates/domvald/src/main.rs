// # domvald - Domain Validation Batch Runner
//
// The domvald binary is a THIN integration layer only:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering directory clients and resolvers
// 4. Running one validation batch
//
// All validation logic lives in domval-core. Do not add decision logic,
// DNS logic, or retry logic here.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Domain Directory
// - `DOMVAL_DIRECTORY_URL`: Base URL of the directory API
// - `DOMVAL_DIRECTORY_API_TOKEN`: Bearer token for the directory API
// - `DOMVAL_DIRECTORY_CALLER_NAME`: Caller name reported to the service (optional)
//
// ### Name Resolver
// - `DOMVAL_RESOLVER_NAMESERVER`: Explicit nameserver IP (optional; the
//   host system configuration is used otherwise)
//
// ### Batch
// - `DOMVAL_MODE`: `validate` (default) or `preview` — preview computes and
//   logs every decision but writes nothing back
// - `DOMVAL_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export DOMVAL_DIRECTORY_URL=https://domains-api.internal.example.com
// export DOMVAL_DIRECTORY_API_TOKEN=your_token
// export DOMVAL_MODE=preview
//
// domvald
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean run
/// - 1: Configuration or startup error
/// - 2: Runtime error (a batch that failed)
#[derive(Debug, Clone, Copy)]
enum ValidatorExitCode {
    /// Batch ran to completion
    CleanRun = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (listing or update failure)
    RuntimeError = 2,
}

impl From<ValidatorExitCode> for ExitCode {
    fn from(code: ValidatorExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    directory_url: String,
    directory_api_token: String,
    directory_caller_name: Option<String>,
    resolver_nameserver: Option<String>,
    mode: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            directory_url: env::var("DOMVAL_DIRECTORY_URL").unwrap_or_default(),
            directory_api_token: env::var("DOMVAL_DIRECTORY_API_TOKEN").unwrap_or_default(),
            directory_caller_name: env::var("DOMVAL_DIRECTORY_CALLER_NAME").ok(),
            resolver_nameserver: env::var("DOMVAL_RESOLVER_NAMESERVER").ok(),
            mode: env::var("DOMVAL_MODE").unwrap_or_else(|_| "validate".to_string()),
            log_level: env::var("DOMVAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// This performs comprehensive validation including:
    /// - Required field presence
    /// - URL scheme validation
    /// - Security checks (placeholder tokens)
    /// - Mode and log level enumeration
    fn validate(&self) -> Result<()> {
        if self.directory_url.is_empty() {
            anyhow::bail!(
                "DOMVAL_DIRECTORY_URL is required. \
                Set it via: export DOMVAL_DIRECTORY_URL=https://domains-api.internal.example.com"
            );
        }

        if !self.directory_url.starts_with("https://") && !self.directory_url.starts_with("http://")
        {
            anyhow::bail!(
                "DOMVAL_DIRECTORY_URL must use HTTP or HTTPS scheme. Got: {}",
                self.directory_url
            );
        }

        // Warn if using HTTP (not HTTPS)
        if self.directory_url.starts_with("http://") {
            eprintln!(
                "WARNING: DOMVAL_DIRECTORY_URL uses HTTP (not HTTPS). \
                      This is less secure. Consider using HTTPS."
            );
        }

        if self.directory_api_token.is_empty() {
            anyhow::bail!(
                "DOMVAL_DIRECTORY_API_TOKEN is required. \
                Set it via: export DOMVAL_DIRECTORY_API_TOKEN=your_token"
            );
        }

        if self.directory_api_token.len() < 20 {
            anyhow::bail!(
                "DOMVAL_DIRECTORY_API_TOKEN appears too short ({} chars). \
                Verify your token is correct.",
                self.directory_api_token.len()
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.directory_api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
            || token_lower == "token"
        {
            anyhow::bail!(
                "DOMVAL_DIRECTORY_API_TOKEN appears to be a placeholder. \
                Use an actual token for the directory API."
            );
        }

        if let Some(ref nameserver) = self.resolver_nameserver
            && nameserver.parse::<std::net::IpAddr>().is_err()
        {
            anyhow::bail!(
                "DOMVAL_RESOLVER_NAMESERVER is not a valid IP address. Got: {}",
                nameserver
            );
        }

        match self.mode.as_str() {
            "validate" | "preview" => {}
            _ => anyhow::bail!(
                "DOMVAL_MODE '{}' is not valid. Valid modes: validate, preview",
                self.mode
            ),
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DOMVAL_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Whether the batch runs in preview mode
    fn is_preview(&self) -> bool {
        self.mode == "preview"
    }

    /// Build the core configuration from the environment values
    fn validator_config(&self) -> domval_core::ValidatorConfig {
        let directory = domval_core::DirectoryConfig::Http {
            base_url: self.directory_url.clone(),
            api_token: self.directory_api_token.clone(),
            caller_name: self.directory_caller_name.clone(),
        };

        let resolver = match &self.resolver_nameserver {
            Some(address) => domval_core::ResolverConfig::Nameserver {
                address: address.clone(),
            },
            None => domval_core::ResolverConfig::System,
        };

        domval_core::ValidatorConfig::new(directory, resolver)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ValidatorExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ValidatorExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ValidatorExitCode::ConfigError.into();
    }

    info!("Starting domvald batch runner");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ValidatorExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_batch(config).await {
            error!("Batch error: {}", e);
            ValidatorExitCode::RuntimeError
        } else {
            ValidatorExitCode::CleanRun
        }
    });

    result.into()
}

/// Run one validation batch
async fn run_batch(config: Config) -> Result<()> {
    // Create component registry
    let registry = domval_core::ComponentRegistry::new();

    // Register built-in implementations
    #[cfg(feature = "http-directory")]
    {
        info!("Registering HTTP directory client");
        domval_directory_http::register(&registry);
    }

    #[cfg(feature = "hickory")]
    {
        info!("Registering Hickory resolver");
        domval_resolver_hickory::register(&registry);
    }

    let validator_config = config.validator_config();
    validator_config.validate()?;

    info!("Directory type: {}", validator_config.directory.type_name());
    info!("Resolver type: {}", validator_config.resolver.type_name());

    // Create components from config
    let directory = registry.create_directory(&validator_config.directory)?;
    let resolver = registry.create_resolver(&validator_config.resolver)?;

    let (engine, mut events) =
        domval_core::ValidationEngine::new(directory, resolver, validator_config.engine)?;

    // Surface engine events as log lines while the batch runs
    let event_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!("Engine event: {:?}", event);
        }
    });

    let preview = config.is_preview();
    info!("Is in preview mode: {}", preview);

    let summary = engine.run(preview).await?;
    info!(
        "Batch complete: {} evaluated, {} changed, {} unchanged",
        summary.evaluated, summary.updated, summary.unchanged
    );

    // Closing the engine ends the event stream
    drop(engine);
    let _ = event_task.await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            directory_url: "https://domains-api.internal.example.com".to_string(),
            directory_api_token: "0123456789abcdef0123456789abcdef".to_string(),
            directory_caller_name: None,
            resolver_nameserver: None,
            mode: "validate".to_string(),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn placeholder_token_is_rejected() {
        let mut cfg = config();
        cfg.directory_api_token = "your_token_goes_here_please".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut cfg = config();
        cfg.mode = "dry-run".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bad_nameserver_is_rejected() {
        let mut cfg = config();
        cfg.resolver_nameserver = Some("nameserver.example.com".to_string());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn preview_mode_is_detected() {
        let mut cfg = config();
        assert!(!cfg.is_preview());
        cfg.mode = "preview".to_string();
        assert!(cfg.is_preview());
    }
}

// # acmedns-hook - ACME DNS-01 exec hook
//
// This binary is a THIN integration layer:
// - DO NOT add DNS, locking or reconciliation logic here
// - All challenge logic lives in acmedns-core
//
// It is responsible for:
// 1. Reading the positional hook arguments
// 2. Reading configuration from environment variables
// 3. Initializing logging and the runtime
// 4. Running the challenge solver and mapping the outcome to an exit code
//
// ## Invocation
//
// ACME clients with an exec provider (lego, Traefik) call:
//
// ```bash
// acmedns-hook present _acme-challenge.sub.example.com. <token> 120
// acmedns-hook cleanup _acme-challenge.sub.example.com. <token> 120
// ```
//
// ## Configuration
//
// - `TRANSIP_USERNAME`: Account login (required)
// - `TRANSIP_PRIVATE_KEY_PATH`: Path to the API private key (required)
// - `TRANSIP_API_URL`: API base URL (default: https://api.transip.nl/v6)
// - `OVERRIDE_DNS_TTL`: TTL to publish with instead of the requested one
// - `ACMEDNS_LOCK_PATH`: Lock file (default: <temp dir>/transip.lock)
// - `ACMEDNS_DRY_RUN`: `true` or `1` to skip the final write
// - `ACMEDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)

use acmedns_core::config::DEFAULT_TRANSIP_API_URL;
use acmedns_core::{
    ChallengeAction, ChallengeConfig, ChallengeRequest, ChallengeSolver, DnsProviderFactory,
    ProviderConfig,
};
use acmedns_provider_transip::TransipProviderFactory;
use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Challenge handled
/// - 1: Configuration error (nothing was locked or touched)
/// - 2: Runtime error (lock, provider, or input failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HookExitCode {
    /// Challenge handled
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<HookExitCode> for ExitCode {
    fn from(code: HookExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Positional hook arguments
#[derive(Debug, Parser)]
#[command(name = "acmedns-hook", version, about = "Publish ACME DNS-01 challenges through TransIP")]
struct Args {
    /// `present` to publish the token, `cleanup` to remove it
    action: String,

    /// Challenge FQDN, with trailing dot (e.g. `_acme-challenge.sub.example.com.`)
    #[arg(allow_hyphen_values = true)]
    fqdn: String,

    /// Challenge token, published as TXT content (base64url, may start with `-`)
    #[arg(allow_hyphen_values = true)]
    token: String,

    /// TTL in seconds
    #[arg(allow_hyphen_values = true)]
    ttl: String,
}

/// Application configuration
#[derive(Debug)]
struct Config {
    username: String,
    private_key_path: PathBuf,
    api_url: String,
    ttl_override: Option<String>,
    lock_path: Option<PathBuf>,
    dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset
    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            username: var("TRANSIP_USERNAME").context("TRANSIP_USERNAME is required")?,
            private_key_path: var("TRANSIP_PRIVATE_KEY_PATH")
                .context("TRANSIP_PRIVATE_KEY_PATH is required")?
                .into(),
            api_url: var("TRANSIP_API_URL").unwrap_or_else(|| DEFAULT_TRANSIP_API_URL.to_string()),
            ttl_override: var("OVERRIDE_DNS_TTL"),
            lock_path: var("ACMEDNS_LOCK_PATH").map(PathBuf::from),
            dry_run: var("ACMEDNS_DRY_RUN")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }

    /// Validated provider and solver configuration
    ///
    /// Any failure here is a configuration error: nothing has been locked yet.
    fn prepare(&self) -> std::result::Result<(ProviderConfig, ChallengeConfig), HookExitCode> {
        self.provider_config()
            .and_then(|p| Ok((p, self.challenge_config()?)))
            .map_err(|e| {
                error!(operation = "configuration", "Configuration validation error: {:#}", e);
                HookExitCode::ConfigError
            })
    }

    /// Provider configuration, validated
    fn provider_config(&self) -> Result<ProviderConfig> {
        let config = ProviderConfig::Transip {
            username: self.username.clone(),
            private_key_path: self.private_key_path.clone(),
            api_url: self.api_url.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Solver configuration, validated
    fn challenge_config(&self) -> Result<ChallengeConfig> {
        let mut config = ChallengeConfig::new().with_dry_run(self.dry_run);
        if let Some(ref lock_path) = self.lock_path {
            config = config.with_lock_path(lock_path);
        }
        config.validate()?;
        Ok(config)
    }
}

fn log_level_from_env() -> String {
    env::var("ACMEDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logging goes to stderr; stdout belongs to the ACME client
    let requested_level = log_level_from_env();
    let log_level = parse_level(&requested_level);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level.unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HookExitCode::ConfigError.into();
    }

    if log_level.is_none() {
        warn!(
            "ACMEDNS_LOG_LEVEL '{}' is not valid, using info. \
            Valid levels: trace, debug, info, warn, error",
            requested_level
        );
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(operation = "configuration", "Configuration error: {:#}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    let (provider_config, challenge_config) = match config.prepare() {
        Ok(configs) => configs,
        Err(code) => return code.into(),
    };

    let solver = match TransipProviderFactory
        .create(&provider_config)
        .and_then(|provider| ChallengeSolver::new(provider, challenge_config))
    {
        Ok(solver) => solver,
        Err(e) => {
            error!(operation = e.operation(), "Error: {}", e);
            return HookExitCode::ConfigError.into();
        }
    };

    let action = ChallengeAction::parse(&args.action);
    let request = ChallengeRequest::new(args.fqdn, args.token, args.ttl)
        .with_ttl_override(config.ttl_override);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HookExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match solver.run(action, &request).await {
            Ok(()) => {
                info!("Challenge {:?} completed", action);
                HookExitCode::Success
            }
            Err(e) => {
                error!(operation = e.operation(), "Challenge failed: {}", e);
                HookExitCode::RuntimeError
            }
        }
    });

    code.into()
}

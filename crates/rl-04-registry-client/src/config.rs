//! # Registry Client Configuration
//!
//! Endpoint, timing, polling policy and protocol constants of the client.

use rl_01_batch_records::ProductRegistration;
use rl_02_transforms::TransformStep;
use rl_03_envelope::{ApplicationInfo, ProtocolProfile};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::domain::{ClientError, PollPolicy};

/// Service endpoint of the test environment.
pub const TEST_ENDPOINT: &str = "https://itsg.eservicet-drv.de/dsvv/rest";
/// Service endpoint of the production environment.
pub const PRODUCTION_ENDPOINT: &str = "https://itsg.eservice-drv.de/dsvv/rest";
/// Organization id of the registry service.
pub const RECEIVER_ID: &str = "66667777";

/// Target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test service; files are named `TDSV…`.
    #[default]
    Test,
    /// Production service; files are named `EDSV…`.
    Production,
}

impl Environment {
    /// Parse `test` / `production` (also `prod`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "test" => Some(Environment::Test),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Default endpoint of this environment.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Environment::Test => TEST_ENDPOINT,
            Environment::Production => PRODUCTION_ENDPOINT,
        }
    }
}

/// Logging settings for [`crate::telemetry::init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Result polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between queries.
    pub interval_secs: u64,
    /// Give up when this much time has passed since the first query.
    pub timeout_secs: u64,
    /// Flag codes driving the poll loop.
    pub policy: PollPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            timeout_secs: 180,
            policy: PollPolicy::default(),
        }
    }
}

/// Registry client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Target environment.
    pub environment: Environment,
    /// Endpoint override; the environment's endpoint if unset.
    pub endpoint: Option<String>,
    /// Receiving organization.
    pub receiver_id: String,
    /// Timeout of a single HTTP round trip.
    pub request_timeout_secs: u64,
    /// `User-Agent` header.
    pub user_agent: String,
    /// Result polling.
    pub poll: PollConfig,
    /// Protocol constants.
    pub profile: ProtocolProfile,
    /// Product registration written into the extended header.
    pub registration: ProductRegistration,
    /// Application announced in envelope headers.
    pub application: ApplicationInfo,
    /// Steps applied to every delivered batch file.
    pub transforms: Vec<TransformStep>,
    /// Logging.
    pub log: LogConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Test,
            endpoint: None,
            receiver_id: RECEIVER_ID.to_string(),
            request_timeout_secs: 100,
            user_agent: format!("registry-link/{}", env!("CARGO_PKG_VERSION")),
            poll: PollConfig::default(),
            profile: ProtocolProfile::deuev(),
            registration: ProductRegistration {
                product_id: String::new(),
                module_id: String::new(),
            },
            application: ApplicationInfo {
                manufacturer: String::new(),
                product: "registry-link".to_string(),
            },
            transforms: vec![
                TransformStep::new(shared_crypto::GZIP_ID),
                TransformStep::new(shared_crypto::Cipher::XChaCha20Poly1305.id()),
            ],
            log: LogConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a config for testing (short timings, compression only).
    pub fn for_testing() -> Self {
        Self {
            endpoint: Some("http://127.0.0.1:8080/dsvv/rest".to_string()),
            request_timeout_secs: 5,
            poll: PollConfig {
                interval_secs: 1,
                timeout_secs: 10,
                policy: PollPolicy::default(),
            },
            registration: ProductRegistration {
                product_id: "1234567".to_string(),
                module_id: "7654321".to_string(),
            },
            application: ApplicationInfo {
                manufacturer: "Registry-Link".to_string(),
                product: "registry-link-tests".to_string(),
            },
            transforms: vec![TransformStep::new(shared_crypto::GZIP_ID)],
            ..Self::default()
        }
    }

    /// Defaults overridden by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RL_ENVIRONMENT`: `test` or `production` (default: test)
    /// - `RL_ENDPOINT`: Endpoint override
    /// - `RL_POLL_INTERVAL_SECS`: Delay between queries (default: 10)
    /// - `RL_POLL_TIMEOUT_SECS`: Poll bound (default: 180)
    /// - `RL_REQUEST_TIMEOUT_SECS`: HTTP timeout (default: 100)
    /// - `RL_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secs = |name: &str, default: u64| {
            env::var(name)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            environment: env::var("RL_ENVIRONMENT")
                .ok()
                .and_then(|v| Environment::parse(&v))
                .unwrap_or(defaults.environment),
            endpoint: env::var("RL_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),
            request_timeout_secs: secs("RL_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            poll: PollConfig {
                interval_secs: secs("RL_POLL_INTERVAL_SECS", defaults.poll.interval_secs),
                timeout_secs: secs("RL_POLL_TIMEOUT_SECS", defaults.poll.timeout_secs),
                policy: defaults.poll.policy.clone(),
            },
            log: LogConfig {
                level: env::var("RL_LOG_LEVEL")
                    .or_else(|_| env::var("RUST_LOG"))
                    .unwrap_or_else(|_| defaults.log.level.clone()),
                json: defaults.log.json,
            },
            ..defaults
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ClientError> {
        let invalid = |reason: &str| Err(ClientError::Config(reason.to_string()));

        let endpoint = self.endpoint();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return invalid("endpoint must be an http(s) URL");
        }
        if self.receiver_id.trim().is_empty() {
            return invalid("receiver_id cannot be empty");
        }
        if self.request_timeout_secs == 0 {
            return invalid("request timeout cannot be 0");
        }
        if self.poll.interval_secs == 0 {
            return invalid("poll interval cannot be 0");
        }
        if self.poll.timeout_secs < self.poll.interval_secs {
            return invalid("poll timeout must not be shorter than the poll interval");
        }
        if self.poll.policy.pending_code == self.poll.policy.success_code {
            return invalid("pending and success codes must differ");
        }
        if self.registration.product_id.trim().is_empty() || self.registration.module_id.trim().is_empty() {
            return invalid("product registration is incomplete");
        }
        Ok(())
    }

    /// Effective endpoint.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.environment.endpoint())
    }

    /// True for the test environment.
    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }

    /// HTTP round-trip timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Delay between queries.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    /// Poll bound.
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll.timeout_secs)
    }
}

//! Configuration management for the Songclip client.
//!
//! Supports configuration via CLI arguments, environment variables,
//! and JSON configuration files with sensible defaults.

use crate::error::{Result, SongclipError};
use crate::request::{AssetType, Paging};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

/// Base URL of the production API.
pub const PRODUCTION_URL: &str = "https://api.songclip.com";

/// Base URL of the sandbox API.
pub const SANDBOX_URL: &str = "https://sandbox-api.songclip.com";

/// Page size used when neither the caller nor the environment sets one.
pub const DEFAULT_LIMIT: u32 = 20;

/// First page index.
pub const DEFAULT_PAGE: u32 = 1;

/// Deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The live API.
    Production,
    /// The partner sandbox.
    #[default]
    Sandbox,
}

impl Mode {
    /// Base URL for this deployment.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_URL,
            Self::Sandbox => SANDBOX_URL,
        }
    }
}

/// Process-level settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Selected deployment (`SNGCLP_MODE`).
    pub mode: Mode,
    /// Default page size (`SNGCLP_DEFAULT_LIMIT`).
    pub default_limit: u32,
}

static ENVIRONMENT: LazyLock<Environment> = LazyLock::new(Environment::from_env);

impl Environment {
    /// Settings captured from the process environment on first use.
    pub fn global() -> &'static Environment {
        &ENVIRONMENT
    }

    /// Read `SNGCLP_MODE` and `SNGCLP_DEFAULT_LIMIT`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("SNGCLP_MODE").ok().as_deref(),
            std::env::var("SNGCLP_DEFAULT_LIMIT").ok().as_deref(),
        )
    }

    /// Build settings from raw variable values.
    ///
    /// Only the exact value `production` selects the production API.
    /// A missing, unparsable or zero limit falls back to [`DEFAULT_LIMIT`].
    pub fn from_vars(mode: Option<&str>, default_limit: Option<&str>) -> Self {
        let mode = match mode {
            Some("production") => Mode::Production,
            _ => Mode::Sandbox,
        };
        let default_limit = default_limit
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_LIMIT);

        Self {
            mode,
            default_limit,
        }
    }
}

/// Credentials for an authenticating proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyAuth {
    /// Proxy user name.
    pub username: String,
    /// Proxy password.
    pub password: String,
}

/// Outbound HTTP proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy host name or address.
    pub host: String,
    /// Proxy port.
    pub port: u16,
    /// Optional basic-auth credentials.
    #[serde(default)]
    pub auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    /// Proxy URL as understood by the HTTP client.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Client configuration. Immutable once handed to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Partner API key, sent as the `apikey` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Authorization string, e.g. `Bearer abc...`.
    #[serde(default)]
    pub authorization: Option<String>,

    /// Request timeout. Zero disables the timeout.
    #[serde(with = "humantime_serde", default)]
    pub timeout: Duration,

    /// Outbound proxy.
    #[serde(default)]
    pub proxy: Option<ProxyConfig>,

    /// Deployment; falls back to `SNGCLP_MODE`.
    #[serde(default)]
    pub mode: Option<Mode>,

    /// Explicit base URL, overriding `mode`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Default page size, overriding `SNGCLP_DEFAULT_LIMIT`.
    #[serde(default)]
    pub default_limit: Option<u32>,
}

impl ClientConfig {
    /// Configuration with credentials only.
    pub fn new(api_key: impl Into<String>, authorization: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            authorization: Some(authorization.into()),
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SongclipError::ConfigFileRead {
                path: path.to_path_buf(),
                source: e,
            })?;

        serde_json::from_str(&content).map_err(|e| SongclipError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Create configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        // CLI flags win over the file
        if args.api_key.is_some() {
            config.api_key.clone_from(&args.api_key);
        }
        if args.authorization.is_some() {
            config.authorization.clone_from(&args.authorization);
        }
        if args.timeout > 0 {
            config.timeout = Duration::from_secs(args.timeout);
        }
        if args.mode.is_some() {
            config.mode = args.mode;
        }
        if args.base_url.is_some() {
            config.base_url.clone_from(&args.base_url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.base_url {
            if url.trim().is_empty() {
                return Err(SongclipError::InvalidConfig(
                    "base URL cannot be empty".to_string(),
                ));
            }
        }

        if self.default_limit == Some(0) {
            return Err(SongclipError::InvalidConfig(
                "default limit must be greater than 0".to_string(),
            ));
        }

        if let Some(proxy) = &self.proxy {
            if proxy.host.is_empty() {
                return Err(SongclipError::InvalidConfig(
                    "proxy host cannot be empty".to_string(),
                ));
            }
            if proxy.port == 0 {
                return Err(SongclipError::InvalidConfig(
                    "proxy port must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => self
                .mode
                .unwrap_or(Environment::global().mode)
                .base_url()
                .to_string(),
        }
    }

    /// Page size used when a call does not set `limit`.
    pub fn resolved_default_limit(&self) -> u32 {
        self.default_limit
            .unwrap_or(Environment::global().default_limit)
    }
}

/// CLI arguments for the `songclip` tool.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "songclip",
    author = "Yiğit Konur <yigit@wope.com>",
    version,
    about = "Query the Songclip API and report usage events",
    after_help = "EXAMPLES:\n    \
        songclip search hey --limit 10\n    \
        songclip collection hip-hop --limit 5 --shuffle\n    \
        songclip related 1234 --asset-type gifnote\n    \
        songclip --session-id abc play 1234"
)]
pub struct Args {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Partner API key
    #[arg(long, env = "SNGCLP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Authorization header value, e.g. "bearer <token>"
    #[arg(long, env = "SNGCLP_AUTHORIZATION", hide_env_values = true)]
    pub authorization: Option<String>,

    /// Request timeout in seconds (0 disables the timeout)
    #[arg(short, long, default_value = "0", env = "SNGCLP_TIMEOUT")]
    pub timeout: u64,

    /// API deployment
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Override the API base URL
    #[arg(long, env = "SNGCLP_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to a client configuration file (JSON)
    #[arg(short, long, env = "SNGCLP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Anonymous user id to send instead of a generated one
    #[arg(long)]
    pub unique_id: Option<String>,

    /// Session id to send with the call
    #[arg(long)]
    pub session_id: Option<String>,

    /// Source platform reported in the context
    #[arg(long)]
    pub platform: Option<String>,

    /// Context tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, env = "SNGCLP_VERBOSE")]
    pub verbose: bool,

    /// Output logs as JSON
    #[arg(long, env = "SNGCLP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Args {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// CLI subcommands, one per API operation.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search clips by query string and/or tags
    Search {
        /// Query string
        query: Option<String>,
        #[command(flatten)]
        paging: PagingArgs,
        /// Drop clips sharing artist and title
        #[arg(long)]
        no_duplicates: bool,
    },
    /// List curated collections
    Collections,
    /// List clips of a collection
    Collection {
        /// Collection term (default: trending)
        term: Option<String>,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// List assets related to a clip
    Related {
        /// Clip id
        id: String,
        /// Kind of related assets to return
        #[arg(long, value_enum, default_value = "songclip")]
        asset_type: AssetType,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Report an app open event
    Open,
    /// Report a play event
    Play(EventArgs),
    /// Report a share event
    Share(EventArgs),
    /// Report an add event
    Add(EventArgs),
}

/// Target of an event subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct EventArgs {
    /// Clip or gifnote id
    pub id: String,
    /// Asset family of the id
    #[arg(long, value_enum, default_value = "songclip")]
    pub asset_type: AssetType,
}

/// Paging flags shared by list subcommands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PagingArgs {
    /// Page number
    #[arg(long)]
    pub page: Option<u32>,
    /// Page size
    #[arg(short, long)]
    pub limit: Option<u32>,
    /// Shuffle the page
    #[arg(long)]
    pub shuffle: bool,
    /// Minimum clip length in seconds
    #[arg(long)]
    pub min_length: Option<u32>,
    /// Maximum clip length in seconds
    #[arg(long)]
    pub max_length: Option<u32>,
}

impl From<PagingArgs> for Paging {
    fn from(args: PagingArgs) -> Self {
        Self {
            page: args.page,
            limit: args.limit,
            shuffle: args.shuffle.then_some(true),
            min_length: args.min_length,
            max_length: args.max_length,
        }
    }
}

/// Serde helper for human-readable durations.
///
/// Accepts `"30s"`, `"250ms"`, or a bare number of milliseconds.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(u64),
        Text(String),
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}ms", duration.as_millis()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => return Ok(Duration::from_millis(ms)),
            Raw::Text(s) => s,
        };
        let s = s.trim();
        // "ms" must be checked before "s"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(serde::de::Error::custom)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(serde::de::Error::custom)
        } else {
            s.parse::<u64>()
                .map(Duration::from_millis)
                .map_err(serde::de::Error::custom)
        }
    }
}

//! [`Config`]-related definitions.

use std::{num::NonZeroU64, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::Debug;
use secrecy::SecretString;
use serde::Deserialize;
use service::{domain::role, infra, task::sweep};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: Discord,

    /// Directory configuration.
    pub directory: Directory,

    /// Roles configuration.
    pub roles: Roles,

    /// Synchronization sweep configuration.
    pub sync: Sweep,

    /// Count refresh configuration.
    pub count: Count,

    /// Duration after which the application shuts down by itself.
    ///
    /// Zero disables the bound.
    #[default(time::Duration::from_secs(5 * 60))]
    #[serde(with = "humantime_serde")]
    pub lifetime: time::Duration,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Builds the [`service::Config`] out of this [`Config`].
    #[must_use]
    pub fn service(&self) -> service::Config {
        service::Config {
            integration: self.discord.integration.as_str().into(),
            roles: self.roles.mapping(),
            fetch_details: self.sync.fetch_details,
            sweep: sweep::Config {
                interval: self.sync.interval,
                reconcile: true,
            },
            count_refresh: self.count.interval.map(|interval| sweep::Config {
                interval,
                reconcile: false,
            }),
        }
    }
}

/// Discord configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Discord {
    /// Bot token to authenticate with.
    #[debug(skip)]
    pub token: String,

    /// ID of the guild to synchronize.
    pub guild_id: Option<NonZeroU64>,

    /// ID of the channel to publish notifications to.
    pub notify_channel_id: Option<NonZeroU64>,

    /// Integration tag the directory marks Discord accounts with.
    #[default(service::domain::integration::Kind::DISCORD.to_owned())]
    pub integration: String,
}

impl Discord {
    /// Returns the [`infra::chat::discord::Config`], if both the guild and
    /// the notification channel are configured.
    #[must_use]
    pub fn gateway(&self) -> Option<infra::chat::discord::Config> {
        Some(infra::chat::discord::Config {
            guild_id: self.guild_id?,
            notify_channel_id: self.notify_channel_id?,
        })
    }
}

/// Directory configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Directory {
    /// URL of the users endpoint.
    pub url: String,

    /// API key to authenticate with.
    #[debug(skip)]
    pub key: String,

    /// Number of users to request per page.
    #[default(100)]
    pub page_limit: u16,
}

impl From<Directory> for infra::directory::http::Config {
    fn from(value: Directory) -> Self {
        let Directory {
            url,
            key,
            page_limit,
        } = value;
        Self {
            url,
            key: SecretString::from(key),
            page_limit,
        }
    }
}

/// Roles configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Roles {
    /// Comma-separated `group=role` pairs mapping directory groups to Discord
    /// role IDs.
    pub map: String,
}

impl Roles {
    /// Parses the configured [`role::Mapping`].
    #[must_use]
    pub fn mapping(&self) -> role::Mapping {
        role::Mapping::parse(&self.map)
    }
}

/// Synchronization sweep configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Sweep {
    /// Interval between synchronization sweeps.
    #[default(time::Duration::from_secs(60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Whether user details should be fetched before reconciling roles.
    #[default(true)]
    pub fetch_details: bool,
}

/// Count refresh configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Count {
    /// Interval between count-only sweeps, if any.
    #[serde(with = "humantime_serde")]
    pub interval: Option<time::Duration>,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

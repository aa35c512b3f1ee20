use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::{ExposeSecret, Secret};

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

/// Which overlay file is layered on top of `base.yaml`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    /// Read `APP_ENV`, falling back to `Dev` when unset
    pub fn from_env() -> anyhow::Result<Self> {
        match env::var("APP_ENV") {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::Dev),
        }
    }

    fn overlay(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

impl FromStr for Runtime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub database: DatabaseSettings,
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load settings from `./settings` for the runtime named by `APP_ENV`
    pub fn load() -> anyhow::Result<Self> {
        let dir = env::current_dir()?.join("settings");

        Self::load_from(Runtime::from_env()?, &dir)
    }

    /// `base.yaml`, then the runtime overlay, then `APP_<SECTION>__<KEY>` variables
    pub fn load_from(runtime: Runtime, dir: &Path) -> anyhow::Result<Self> {
        let env_overrides = Environment::with_prefix("app")
            .prefix_separator("_")
            .separator("__");

        Config::builder()
            .add_source(File::from(dir.join("base")))
            .add_source(File::from(dir.join(runtime.overlay())))
            .add_source(env_overrides)
            .build()?
            .try_deserialize()
            .with_context(|| format!("Failed to load {:?} settings from {:?}", runtime, dir))
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
}

impl ApplicationSettings {
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    port: u16,
    name: String,
    username: String,
    password: Secret<String>,
    require_ssl: bool,
    #[serde(
        default = "default_max_connections",
        deserialize_with = "deserialize_number_from_string"
    )]
    max_connections: u32,
    #[serde(
        default = "default_acquire_timeout_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = match self.require_ssl {
            true => PgSslMode::Require,
            false => PgSslMode::Prefer,
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(self.password.expose_secret())
            .database(&self.name)
            .ssl_mode(ssl_mode)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Open the connection pool
    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
            .connect_with(self.connect_options())
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to database {} at {}:{}",
                    self.name, self.host, self.port
                )
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct TelemetrySettings {
    level: String,
    #[serde(default)]
    json: bool,
}

impl TelemetrySettings {
    /// Tracing filter directive, `RUST_LOG` takes precedence when set
    pub fn env_filter(&self) -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| self.level.clone())
    }

    /// Whether log lines are written as JSON objects
    pub fn json(&self) -> bool {
        self.json
    }
}

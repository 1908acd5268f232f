//! Runtime server configuration.
//!
//! Layered lowest to highest: an optional TOML file, `APEXHASH_*` environment
//! variables, then the deployment variables `DATABASE_URL`, `DATABASE_NAME`
//! and `PORT`.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// Document store connection string.
  pub database_url:        Option<String>,
  /// Logical database the collections live in.
  pub database_name:       Option<String>,
  /// Answer failed creations with 400/503/500 by cause instead of a flat 500.
  #[serde(default)]
  pub strict_error_status: bool,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 8000 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                default_host(),
      port:                default_port(),
      database_url:        None,
      database_name:       None,
      strict_error_status: false,
    }
  }
}

impl ServerConfig {
  /// Load from `path` (if it exists) and the process environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::load_with(path, |key| std::env::var(key).ok())
  }

  /// Like [`ServerConfig::load`], with deployment variables read via `env`.
  pub fn load_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(Environment::with_prefix("APEXHASH").try_parsing(true))
      .set_override_option("database_url", env("DATABASE_URL"))?
      .set_override_option("database_name", env("DATABASE_NAME"))?
      .set_override_option("port", env("PORT"))?
      .build()?
      .try_deserialize()
  }

  /// The store is only opened when both connection settings are present.
  pub fn store_settings(&self) -> Option<(&str, &str)> {
    match (&self.database_url, &self.database_name) {
      (Some(url), Some(name)) if !url.is_empty() && !name.is_empty() => {
        Some((url.as_str(), name.as_str()))
      }
      _ => None,
    }
  }
}

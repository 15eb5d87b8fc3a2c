//! Configuration loading.
//!
//! Settings come from an optional TOML file (`chronicle.toml` by default,
//! overridable via `CHRONICLE_CONFIG_PATH`) layered under environment
//! variables. `CHRONICLE_DATABASE_URL` is honored directly as the common
//! single-variable override.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("CHRONICLE_CONFIG_PATH")
            .unwrap_or_else(|_| "chronicle".to_string());

        config::Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("CHRONICLE").separator("__"))
            .set_override_option("database.url", std::env::var("CHRONICLE_DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }
}

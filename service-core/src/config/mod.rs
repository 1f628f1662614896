use crate::error::AppError;
use config::{Config as Cfg, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// Environment variable that selects the listening port, overriding any other source.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8005
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// `host:port` string suitable for binding a listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Layered configuration sources shared by every service.
///
/// Sources, lowest precedence first:
/// 1. optional `configuration.{toml,yaml,json}` in the working directory
/// 2. `APP_*` environment variables, `__` separating nested keys
///    (`APP_MODEL__BASE_URL` sets `model.base_url`)
/// 3. `PORT`, which always wins for the listening port
///
/// `list_keys` names the keys whose environment value is a comma separated list.
pub fn builder(list_keys: &[&str]) -> Result<ConfigBuilder<DefaultState>, AppError> {
    dotenvy::dotenv().ok();

    let port = match std::env::var(PORT_ENV) {
        Ok(raw) => Some(parse_port(&raw)?),
        Err(_) => None,
    };

    let mut environment = Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true);
    if !list_keys.is_empty() {
        environment = environment.list_separator(",");
        for key in list_keys {
            environment = environment.with_list_parse_key(key);
        }
    }

    let builder = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(environment)
        .set_override_option("port", port.map(i64::from))?;

    Ok(builder)
}

fn parse_port(raw: &str) -> Result<u16, AppError> {
    raw.trim().parse::<u16>().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "{} must be a valid port number, got '{}': {}",
            PORT_ENV,
            raw,
            e
        ))
    })
}

//! Configuration management for infrastructure services
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults for the detected environment
//! 2. `config/default.toml` (optional)
//! 3. `config/{environment}.toml` (optional)
//! 4. Flat `OTP_*` variables, e.g. `OTP_MAX_ATTEMPTS=5`
//! 5. `APP__*` environment variables, e.g. `APP__OTP__MAX_ATTEMPTS=5`

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File, FileFormat};

use otp_shared::config::{AppConfig, Environment};

use crate::InfrastructureError;

/// Prefix for environment variable overrides
const ENV_PREFIX: &str = "APP";

/// Separator between nested keys in environment variable overrides
const ENV_SEPARATOR: &str = "__";

/// Flat OTP variables and the config keys they set
const OTP_ENV_VARS: [(&str, &str); 5] = [
    ("OTP_EXPIRY_SECONDS", "otp.expiry_seconds"),
    ("OTP_RESEND_DELAY_SECONDS", "otp.resend_delay_seconds"),
    ("OTP_MAX_ATTEMPTS", "otp.max_attempts"),
    ("OTP_CODE_LENGTH", "otp.code_length"),
    ("OTP_PURGE_INTERVAL_SECONDS", "otp.purge_interval_seconds"),
];

/// Load configuration from `.env`, TOML files and environment variables
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present

    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();

    let config = builder(environment)?
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&environment.config_file()).required(false))
        .add_source(otp_env_source(|name| std::env::var(name).ok())?)
        .add_source(env_source())
        .build()?
        .try_deserialize::<AppConfig>()?;

    finish(config)
}

/// Load configuration from an inline TOML document layered over the defaults
pub fn load_config_from_str(
    environment: Environment,
    toml: &str,
) -> Result<AppConfig, InfrastructureError> {
    let config = builder(environment)?
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize::<AppConfig>()?;

    finish(config)
}

fn builder(environment: Environment) -> Result<ConfigBuilder<DefaultState>, InfrastructureError> {
    let defaults = Config::try_from(&AppConfig::for_environment(environment))?;
    Ok(Config::builder().add_source(defaults))
}

/// Layer built from the flat `OTP_*` variables present in `lookup`
///
/// Values are parsed when the layered config is deserialized, so a malformed
/// number fails loading instead of silently keeping the default.
fn otp_env_source<F>(lookup: F) -> Result<Config, InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut layer = Config::builder();
    for (name, key) in OTP_ENV_VARS {
        if let Some(value) = lookup(name) {
            layer = layer.set_override(key, value)?;
        }
    }
    Ok(layer.build()?)
}

fn env_source() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn finish(config: AppConfig) -> Result<AppConfig, InfrastructureError> {
    config.validate()?;
    Ok(config)
}

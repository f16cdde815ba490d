//! Deployment environment and logging settings

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Variables consulted, in order, to detect the deployment environment
const ENVIRONMENT_VARS: [&str; 3] = ["ENVIRONMENT", "ENV", "RUST_ENV"];

/// Deployment environment the OTP service runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Detect the environment from the process environment
    ///
    /// Unset or unrecognised values fall back to `Development`.
    pub fn from_env() -> Self {
        Self::detect(|name| env::var(name).ok())
    }

    /// Detect the environment from an arbitrary variable lookup
    pub fn detect<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        ENVIRONMENT_VARS
            .iter()
            .find_map(|name| lookup(name))
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Lowercase name used in file names and logs
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Stem of the TOML file layered over `config/default` (extension resolved by the loader)
    pub fn config_file(&self) -> String {
        format!("config/{}", self.name())
    }

    /// Environment-specific dotenv file
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.name())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment `{}`", other)),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `otp_core=debug,info`
    pub level: String,

    pub format: LogFormat,

    /// ANSI colors (terminal output only)
    pub colored: bool,

    /// Attach file and line to every event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            colored: true,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Logging defaults for a deployment environment
    ///
    /// Development gets verbose, colored, human-readable output; deployed
    /// environments emit plain JSON.
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                level: "debug".to_string(),
                source_location: true,
                ..Self::default()
            },
            Environment::Staging | Environment::Production => Self {
                level: match environment {
                    Environment::Production => "warn".to_string(),
                    _ => "info".to_string(),
                },
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            },
        }
    }
}

use std::{env, path::Path, time::Duration};

use crate::errors::ConfigError;

pub const API_KEY_VAR: &str = "EIA_API_KEY";
pub const MONGO_CONNECTION_STRING_VAR: &str = "MONGO_CONNECTION_STRING";
pub const TIMEOUT_VAR: &str = "EIA_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Secrets and knobs read from the environment once at startup, then passed
/// explicitly to whoever needs them.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub mongo_connection_string: String,
    /// Deadline for the whole EIA request.
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"***")
            .field("mongo_connection_string", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.  Empty values count
    /// as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| match lookup(name) {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnv(name)),
        };
        let api_key = required(API_KEY_VAR)?;
        let mongo_connection_string = required(MONGO_CONNECTION_STRING_VAR)?;

        let timeout = match lookup(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: TIMEOUT_VAR,
                        value: v,
                    })
                }
            },
        };

        Ok(Config {
            api_key,
            mongo_connection_string,
            timeout,
        })
    }
}

/// Load `.env/{name}.env` if a name is given, otherwise a `.env` file in the
/// current directory if there is one.
pub fn load_env_file(name: Option<&str>) -> Result<(), ConfigError> {
    match name {
        Some(name) => {
            dotenvy::from_path(Path::new(format!(".env/{}.env", name).as_str()))?;
            Ok(())
        }
        None => load_optional_env_file(Path::new(".env")),
    }
}

/// Like [dotenvy::from_path] but a missing file is fine.  A file that exists
/// and can't be parsed is still an error.
pub fn load_optional_env_file(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Err(e) if e.not_found() => Ok(()),
        res => Ok(res?),
    }
}

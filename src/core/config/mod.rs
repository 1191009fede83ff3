use std::{fmt, time::Duration};

mod loader;
mod paths;

use crate::core::env::EnvError;
use crate::flags::Flags;
use loader::ConfigLoader;
use paths::ConfigPaths;

pub const DEFAULT_PROMPT: &str = "Shell> ";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_ARGS: usize = 10;

/// Runtime settings of the shell.
///
/// Built from the defaults, then the rc file, then command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    /// `None` disables the foreground timeout.
    pub timeout: Option<Duration>,
    /// Maximum number of tokens kept per line, `0` for no limit.
    pub max_args: usize,
    pub expand_vars: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            max_args: DEFAULT_MAX_ARGS,
            expand_vars: true,
            color: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(flags: &Flags) -> Result<Self, ConfigError> {
        let mut config = Config::new();

        match ConfigPaths::new(flags.get_value("config").map(String::as_str)) {
            Ok(paths) => ConfigLoader::new(&paths).load_configs(&mut config)?,
            Err(ConfigError::HomeDirNotFound) => {
                log::debug!("no home directory, skipping rc file");
            }
            Err(e) => return Err(e),
        }

        config.apply_flags(flags)?;
        log::debug!("effective config: {:?}", config);
        Ok(config)
    }

    pub fn apply_flags(&mut self, flags: &Flags) -> Result<(), ConfigError> {
        if let Some(value) = flags.get_value("timeout") {
            self.timeout = parse_timeout(value)?;
        }
        if flags.is_set("no-expand") {
            self.expand_vars = false;
        }
        Ok(())
    }

    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "prompt" => self.prompt = value.to_string(),
            "timeout" => self.timeout = parse_timeout(value)?,
            "max_args" => self.max_args = value.parse().map_err(|_| invalid())?,
            "expand_vars" => self.expand_vars = parse_switch(value).ok_or_else(invalid)?,
            "color" => self.color = parse_switch(value).ok_or_else(invalid)?,
            _ => return Err(ConfigError::UnknownSetting(key.to_string())),
        }
        Ok(())
    }
}

/// Seconds, fractional allowed. `0` turns the timeout off.
pub fn parse_timeout(value: &str) -> Result<Option<Duration>, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "timeout".to_string(),
        value: value.to_string(),
    };

    let secs: f64 = value.trim().parse().map_err(|_| invalid())?;
    let timeout = Duration::try_from_secs_f64(secs).map_err(|_| invalid())?;
    // Must fit the seconds field of the interval timer.
    libc::time_t::try_from(timeout.as_secs()).map_err(|_| invalid())?;
    Ok((!timeout.is_zero()).then_some(timeout))
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    HomeDirNotFound,
    ConfigFileNotFound(String),
    IoError(std::io::Error),
    InvalidValue { key: String, value: String },
    UnknownSetting(String),
    EnvError(EnvError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<EnvError> for ConfigError {
    fn from(e: EnvError) -> Self {
        ConfigError::EnvError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::HomeDirNotFound => write!(f, "Home directory not found"),
            ConfigError::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
            ConfigError::UnknownSetting(key) => write!(f, "Unknown setting: {}", key),
            ConfigError::EnvError(e) => write!(f, "Environment error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

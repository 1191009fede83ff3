use std::{fs, path::Path};

use super::{Config, ConfigError, ConfigPaths};
use crate::core::env::EnvVarManager;

pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
    env_vars: EnvVarManager,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self {
            paths,
            env_vars: EnvVarManager::new(),
        }
    }

    pub fn load_configs(&self, config: &mut Config) -> Result<(), ConfigError> {
        let path = &self.paths.rc_path;
        if self.paths.explicit && !path.exists() {
            return Err(ConfigError::ConfigFileNotFound(path.display().to_string()));
        }
        self.source_if_exists(path, config)
    }

    fn source_if_exists(&self, path: &Path, config: &mut Config) -> Result<(), ConfigError> {
        if !path.exists() {
            log::debug!("no rc file at {}", path.display());
            return Ok(());
        }

        log::debug!("loading rc file {}", path.display());
        let content = fs::read_to_string(path)?;
        for (number, line) in content.lines().enumerate() {
            // A bad line never stops the shell from starting.
            if let Err(e) = self.process_line(line, config) {
                log::warn!("{}:{}: {}", path.display(), number + 1, e);
            }
        }
        Ok(())
    }

    fn process_line(&self, line: &str, config: &mut Config) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (directive, rest) = split_word(line);
        match directive {
            "set" => {
                let (key, value) = split_word(rest);
                config.apply_setting(key, unquote(value))
            }
            "setenv" => {
                let (name, value) = split_word(rest);
                self.env_vars.set(name, unquote(value))?;
                Ok(())
            }
            other => Err(ConfigError::UnknownSetting(other.to_string())),
        }
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find([' ', '\t']) {
        Some(pos) => (&s[..pos], s[pos..].trim()),
        None => (s, ""),
    }
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

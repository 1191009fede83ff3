use super::EnvError;
use std::env;

/// Thin, validating view over the process environment.
///
/// The environment itself is the single source of truth so that children
/// forked by the launcher inherit every change made through `setenv`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvVarManager;

impl EnvVarManager {
    pub fn new() -> Self {
        Self
    }

    /// Sets or overwrites `name`. Rejects names and values that the OS
    /// cannot represent instead of letting `env::set_var` panic.
    pub fn set(&self, name: &str, value: &str) -> Result<(), EnvError> {
        if name.is_empty() || name.contains('=') || name.contains('\0') {
            return Err(EnvError::InvalidName(name.to_string()));
        }
        if value.contains('\0') {
            return Err(EnvError::InvalidValue("embedded NUL byte"));
        }

        log::debug!("setenv {}={}", name, value);
        env::set_var(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<String> {
        if name.is_empty() || name.contains('=') || name.contains('\0') {
            return None;
        }
        env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }

    /// Every entry in the order the OS reports them.
    pub fn entries(&self) -> Vec<(String, String)> {
        env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    /// Resolves a `$NAME` token. `None` means the token is not a reference;
    /// `Some(None)` means it is one but the variable is unset.
    pub fn expand_token(&self, token: &str) -> Option<Option<String>> {
        token.strip_prefix('$').map(|name| self.get(name))
    }
}

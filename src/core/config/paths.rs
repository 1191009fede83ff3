use super::ConfigError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub rc_path: PathBuf,
    /// Set when the path came from `--config`; a missing file is then an error.
    pub explicit: bool,
}

impl ConfigPaths {
    pub fn new(custom: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = custom {
            return Ok(ConfigPaths {
                rc_path: PathBuf::from(path),
                explicit: true,
            });
        }

        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        Ok(ConfigPaths {
            rc_path: home.join(".minishrc"),
            explicit: false,
        })
    }
}

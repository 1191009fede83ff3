use crate::error::ShellError;
use std::path::PathBuf;

/// Expands a leading `~` or `~/` to the home directory. `~user` forms are
/// passed through untouched.
#[derive(Clone, Default)]
pub struct PathExpander;

impl PathExpander {
    pub fn new() -> Self {
        Self
    }

    pub fn expand(&self, path: &str) -> Result<PathBuf, ShellError> {
        match path.strip_prefix('~') {
            Some("") => self.home_dir(),
            Some(rest) if rest.starts_with('/') => {
                let mut home = self.home_dir()?;
                home.extend(rest.split('/').filter(|part| !part.is_empty()));
                Ok(home)
            }
            _ => Ok(PathBuf::from(path)),
        }
    }

    fn home_dir(&self) -> Result<PathBuf, ShellError> {
        dirs::home_dir().ok_or(ShellError::HomeDirNotFound)
    }
}

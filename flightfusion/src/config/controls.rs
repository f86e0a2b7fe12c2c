//! Provider switches backed by the `[controls]` section of config.ini.
//!
//! The file is re-read on every load, so editing it takes effect once the
//! controls cache expires. Reads go through `tokio::fs`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use ini::Ini;

use super::parser::parse_ini;
use crate::controls::{ApiControls, ControlsError, ControlsSource};

/// Reads [`ApiControls`] from a config file.
#[derive(Debug, Clone)]
pub struct FileControls {
    path: PathBuf,
}

impl FileControls {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ControlsSource for FileControls {
    async fn load(&self) -> Result<ApiControls, ControlsError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    ControlsError::Unavailable(format!("{} not found", self.path.display()))
                }
                _ => ControlsError::Unavailable(format!("{}: {}", self.path.display(), e)),
            })?;

        let ini = Ini::load_from_str(&content)
            .map_err(|e| ControlsError::Invalid(format!("{}: {}", self.path.display(), e)))?;

        parse_ini(&ini)
            .map(|config| config.api_controls())
            .map_err(|e| ControlsError::Invalid(e.to_string()))
    }
}

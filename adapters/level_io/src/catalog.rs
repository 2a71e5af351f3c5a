//! Directory-backed list of playable levels.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::LevelError;

/// File extension of map files.
pub const LEVEL_EXTENSION: &str = "map";

/// Map files found directly inside a directory, sorted by name, plus the
/// level currently selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCatalog {
    directory: PathBuf,
    names: Vec<String>,
    current: Option<String>,
}

impl LevelCatalog {
    /// Catalog of `directory` that lists no levels yet.
    #[must_use]
    pub fn empty(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            names: Vec::new(),
            current: None,
        }
    }

    /// Lists the map files in `directory`.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self, LevelError> {
        let mut catalog = Self::empty(directory);
        catalog.refresh()?;
        Ok(catalog)
    }

    /// Rescans the directory. The selection is kept only if it still exists.
    pub fn refresh(&mut self) -> Result<(), LevelError> {
        let io_error = |source| LevelError::Io {
            path: self.directory.clone(),
            source,
        };
        let entries = fs::read_dir(&self.directory).map_err(io_error)?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(target: "pipes::levels", %error, "levels.entry_unreadable");
                    continue;
                }
            };
            let path = entry.path();
            let is_level = path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(LEVEL_EXTENSION);
            if !is_level {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_owned());
            }
        }
        names.sort();

        debug!(
            target: "pipes::levels",
            directory = %self.directory.display(),
            count = names.len(),
            "levels.listed"
        );
        self.names = names;
        if let Some(current) = &self.current {
            if !self.names.contains(current) {
                self.current = None;
            }
        }
        Ok(())
    }

    /// Directory the catalog lists.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Level file names in sorted order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name of the selected level.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Path of the selected level.
    #[must_use]
    pub fn current_path(&self) -> Option<PathBuf> {
        self.current.as_ref().map(|name| self.directory.join(name))
    }

    /// Selects a level by name, or clears the selection with `None`.
    pub fn set_level(&mut self, name: Option<&str>) -> Result<(), LevelError> {
        let Some(name) = name else {
            self.current = None;
            return Ok(());
        };
        if name.trim().is_empty() {
            return Err(LevelError::BlankLevelName);
        }
        if !self.names.iter().any(|listed| listed == name) {
            return Err(LevelError::UnknownLevel(name.to_owned()));
        }
        self.current = Some(name.to_owned());
        Ok(())
    }

    /// Selects the level after the current one and returns its name.
    ///
    /// With nothing selected the first level is chosen. After the last level
    /// `None` is returned and the selection is left as it was.
    pub fn advance(&mut self) -> Option<&str> {
        let next = match &self.current {
            Some(current) => {
                let position = self.names.iter().position(|name| name == current)?;
                self.names.get(position + 1)?
            }
            None => self.names.first()?,
        };
        self.current = Some(next.clone());
        self.current.as_deref()
    }
}

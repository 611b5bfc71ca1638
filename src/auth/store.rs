//
//  wwt-api-client
//  auth/store.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Persisted Authentication State
//!
//! Login state lives in small files inside a per-user state directory. This
//! module provides the file operations the authenticated clients need.
//!
//! ## State Directory Location
//!
//! - **Linux**: `~/.local/state/wwt_api_client/`
//! - **macOS**: `~/Library/Application Support/org.AAS_WWT.wwt_api_client/`
//! - **Windows**: `C:\Users\<User>\AppData\Local\AAS_WWT\wwt_api_client\data\`
//!
//! ## Permissions
//!
//! Files are written owner-only (`0600` on Unix), including files that
//! already existed with looser permissions. Reading a file that is group- or
//! world-accessible logs a warning.
//!
//! ## Notes
//!
//! - A missing file reads as `None`, never as an error
//! - Writes truncate and overwrite; there is no locking, so concurrent
//!   writers against one directory must be avoided by the caller

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::common::{DecodeError, Error, Result};

/// A directory of owner-only state files.
///
/// # Example
///
/// ```rust,no_run
/// use wwt_api_client::auth::StateStore;
///
/// let store = StateStore::new("/tmp/wwt-state");
/// store.write_line("communities-client-secret.txt", "secret")?;
/// assert_eq!(
///     store.read_first_line("communities-client-secret.txt")?.as_deref(),
///     Some("secret")
/// );
/// # Ok::<(), wwt_api_client::api::common::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the platform's per-user state directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no home directory can be found.
    pub fn open_default() -> Result<Self> {
        Self::default_dir().map(Self::new)
    }

    /// Returns the platform's per-user state directory for this library.
    ///
    /// Falls back to the local data directory on platforms without a
    /// dedicated state directory.
    pub fn default_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "AAS_WWT", "wwt_api_client").ok_or_else(|| {
            Error::Configuration("could not determine the user state directory".to_string())
        })?;

        Ok(dirs
            .state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .to_path_buf())
    }

    /// Returns the directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of a file in the store.
    pub fn path(&self, basename: &str) -> PathBuf {
        self.dir.join(basename)
    }

    /// Returns `true` if the file exists.
    pub fn exists(&self, basename: &str) -> bool {
        self.path(basename).exists()
    }

    /// Reads a file, returning `None` if it does not exist.
    pub fn read(&self, basename: &str) -> Result<Option<String>> {
        let path = self.path(basename);

        match fs::read_to_string(&path) {
            Ok(content) => {
                check_permissions(&path);
                Ok(Some(content))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the first line of a file, trimmed.
    pub fn read_first_line(&self, basename: &str) -> Result<Option<String>> {
        Ok(self
            .read(basename)?
            .map(|content| content.lines().next().unwrap_or("").trim().to_string()))
    }

    /// Reads and decodes a JSON file.
    pub fn read_json<T: DeserializeOwned>(&self, basename: &str) -> Result<Option<T>> {
        match self.read(basename)? {
            Some(content) => {
                let value = serde_json::from_str(&content).map_err(DecodeError::from)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Writes a file with owner-only permissions, replacing any previous
    /// contents.
    pub fn write(&self, basename: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(basename);

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&path)?;

        // `mode` only applies to newly created files
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content.as_bytes())?;
        debug!(path = %path.display(), "wrote state file");
        Ok(())
    }

    /// Writes a single line of text.
    pub fn write_line(&self, basename: &str, line: &str) -> Result<()> {
        self.write(basename, &format!("{line}\n"))
    }

    /// Serializes `value` as JSON and writes it.
    pub fn write_json<T: Serialize>(&self, basename: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string(value).map_err(DecodeError::from)?;
        self.write(basename, &content)
    }

    /// Deletes a file; a missing file is not an error.
    pub fn remove(&self, basename: &str) -> Result<()> {
        match fs::remove_file(self.path(basename)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn check_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(meta) = fs::metadata(path) {
        let mode = meta.permissions().mode();
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode & 0o777),
                "state file is accessible by other users"
            );
        }
    }
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) {}

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::FileMapError;
use crate::models::FileMap;

/// Loads and saves the file map of a project
///
/// Single writer: callers must not run two generation or fix tasks against
/// the same file map at the same time. No locking is performed.
pub struct FileMapStore {
    /// Path to the file map
    path: PathBuf,
}

impl FileMapStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file map
    ///
    /// A missing, empty or malformed file yields an empty map. Only a file
    /// that exists but cannot be read is an error.
    pub fn load(&self) -> Result<FileMap, FileMapError> {
        if !self.path.exists() {
            debug!("File map does not exist, starting fresh");
            return Ok(FileMap::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| FileMapError::ReadError(self.path.clone(), e))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(FileMap::new());
        }

        match serde_json::from_slice::<FileMap>(&bytes) {
            Ok(map) => {
                info!("Loaded {} file map entries", map.len());
                Ok(map)
            }
            Err(e) => {
                warn!(
                    "Ignoring malformed file map {}: {}",
                    self.path.display(),
                    e
                );
                Ok(FileMap::new())
            }
        }
    }

    /// Save the full map atomically (write to temp, then rename)
    pub fn save(&self, map: &FileMap) -> Result<(), FileMapError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| FileMapError::WriteError(parent.to_path_buf(), e))?;
            }
        }

        let json = serde_json::to_string_pretty(map)
            .map_err(|e| FileMapError::SerializeError(self.path.clone(), e.to_string()))?;

        let temp_file = self.path.with_extension("json.tmp");
        fs::write(&temp_file, &json).map_err(|e| FileMapError::WriteError(temp_file.clone(), e))?;

        fs::rename(&temp_file, &self.path)
            .map_err(|e| FileMapError::WriteError(self.path.clone(), e))?;

        debug!("Saved {} file map entries", map.len());
        Ok(())
    }
}

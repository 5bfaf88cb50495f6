use crate::domain::{AuthchainCache, CacheError};
use crate::ports::CacheStore;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// JSON file cache store.
///
/// Saves go to a sibling temp file that is fsynced and then renamed over the
/// target, so readers only ever see a complete document.
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling temp file: the target name with `.tmp` appended.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self) -> AuthchainCache {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "[ac-03] No cache file, starting cold");
                return AuthchainCache::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "[ac-03] Cache file unreadable, starting cold");
                return AuthchainCache::new();
            }
        };

        let cache = AuthchainCache::from_json_lenient(&text);
        info!(
            path = %self.path.display(),
            entries = cache.len(),
            active = cache.active_count(),
            "[ac-03] Loaded authchain cache"
        );
        cache
    }

    fn save(&self, cache: &AuthchainCache) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(cache)?;

        let temp_path = self.temp_path();
        let written = write_synced(&temp_path, &bytes)
            .and_then(|()| std::fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(self.io_error(e));
        }

        info!(
            path = %self.path.display(),
            entries = cache.len(),
            "[ac-03] Saved authchain cache"
        );
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

// Hot reloading of descriptor files during development

use super::AssetError;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Tracks file modification times so edited descriptors can be reloaded
pub struct HotReloadWatcher {
    /// Map of watched paths to their last seen modification time
    file_times: HashMap<PathBuf, SystemTime>,

    /// Whether hot reloading is enabled
    enabled: bool,
}

impl HotReloadWatcher {
    /// Create a new hot reload watcher
    pub fn new(enabled: bool) -> Self {
        Self {
            file_times: HashMap::new(),
            enabled,
        }
    }

    /// Register a file for watching
    pub fn watch_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), AssetError> {
        if !self.enabled {
            return Ok(());
        }

        let path = path.as_ref().to_path_buf();
        let mtime = Self::modification_time(&path)?;
        debug!("Watching {}", path.display());
        self.file_times.insert(path, mtime);

        Ok(())
    }

    /// Check if a watched file has been modified since the last check.
    ///
    /// Unwatched or unreadable files never report a change.
    pub fn has_changed<P: AsRef<Path>>(&mut self, path: P) -> bool {
        if !self.enabled {
            return false;
        }

        let path = path.as_ref();
        let Ok(current_time) = Self::modification_time(path) else {
            return false;
        };

        match self.file_times.get_mut(path) {
            Some(last_time) if current_time > *last_time => {
                *last_time = current_time;
                true
            }
            _ => false,
        }
    }

    /// Check all watched files for changes
    pub fn check_all(&mut self) -> Vec<PathBuf> {
        if !self.enabled {
            return Vec::new();
        }

        let paths: Vec<PathBuf> = self.file_times.keys().cloned().collect();
        paths
            .into_iter()
            .filter(|path| self.has_changed(path))
            .collect()
    }

    /// Enable or disable hot reloading
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if hot reloading is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of watched files
    pub fn watched_count(&self) -> usize {
        self.file_times.len()
    }

    /// Clear all watched files
    pub fn clear(&mut self) {
        self.file_times.clear();
    }

    fn modification_time(path: &Path) -> Result<SystemTime, AssetError> {
        Ok(std::fs::metadata(path)?.modified()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_watcher_disabled() {
        let mut watcher = HotReloadWatcher::new(false);
        assert!(!watcher.is_enabled());

        // Disabled watchers accept registrations without tracking them
        assert!(watcher.watch_file("/nonexistent/file.animation").is_ok());
        assert_eq!(watcher.watched_count(), 0);
        assert!(watcher.check_all().is_empty());
    }

    #[test]
    fn test_watcher_toggle() {
        let mut watcher = HotReloadWatcher::new(false);
        watcher.set_enabled(true);
        assert!(watcher.is_enabled());

        watcher.set_enabled(false);
        assert!(!watcher.is_enabled());
    }

    #[test]
    fn test_watch_nonexistent_file() {
        let mut watcher = HotReloadWatcher::new(true);
        let result = watcher.watch_file("/nonexistent/file.animation");
        assert!(matches!(result, Err(AssetError::Io(_))));
        assert!(!watcher.has_changed("/nonexistent/file.animation"));
    }

    #[test]
    fn test_detects_modification() {
        let path = std::env::temp_dir().join("netbattle_watch_test.animation");
        std::fs::write(&path, "animation state=\"A\"\n").unwrap();

        let mut watcher = HotReloadWatcher::new(true);
        watcher.watch_file(&path).unwrap();
        assert_eq!(watcher.watched_count(), 1);
        assert!(!watcher.has_changed(&path));

        // Push the mtime forward instead of sleeping
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(5))
            .unwrap();
        drop(file);

        assert_eq!(watcher.check_all(), vec![path.clone()]);
        assert!(!watcher.has_changed(&path));

        watcher.clear();
        assert_eq!(watcher.watched_count(), 0);
        let _ = std::fs::remove_file(path);
    }
}

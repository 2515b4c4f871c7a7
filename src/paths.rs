//! Platform Path Table
//!
//! A pure configuration structure mapping platform → named path strings,
//! so a caller can register the per-OS spellings of the same logical
//! native artifact (`foo.dll`, `libfoo.so`, `libfoo.dylib`, …) and fetch
//! the right one for the running platform just before loading it.

use std::collections::HashMap;

use crate::error::LoaderError;
use crate::platform::Platform;

/// Named path strings for a single platform.
///
/// Keys are caller-defined and unique within the set; re-adding a key
/// overwrites the previous value (last write wins, never an error).
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    platform: Platform,
    paths: HashMap<String, String>,
}

impl PlatformPaths {
    /// Create an empty path set for one platform.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            paths: HashMap::new(),
        }
    }

    /// Builder-style [`add_path`](Self::add_path).
    pub fn with_path(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_path(key, value);
        self
    }

    /// Register a path under a key, replacing any previous value.
    pub fn add_path(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.paths.insert(key.into(), value.into());
    }

    /// The platform this set is scoped to.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether a key is present. Never fails.
    pub fn has(&self, key: &str) -> bool {
        self.paths.contains_key(key)
    }

    /// The path registered under `key`.
    pub fn get(&self, key: &str) -> Result<&str, LoaderError> {
        self.paths
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LoaderError::MissingPathEntry(key.to_string()))
    }
}

/// Platform-keyed table of path sets.
///
/// Built once from a fixed list of sets; immutable afterwards.
#[derive(Debug, Clone)]
pub struct PathTable {
    entries: HashMap<Platform, PlatformPaths>,
}

impl PathTable {
    /// Build a table from per-platform sets.
    ///
    /// If two sets name the same platform, the later one wins.
    pub fn build(sets: impl IntoIterator<Item = PlatformPaths>) -> Self {
        let mut entries = HashMap::new();
        for set in sets {
            entries.insert(set.platform, set);
        }
        Self { entries }
    }

    /// The path set registered for a platform.
    pub fn for_platform(&self, platform: Platform) -> Result<&PlatformPaths, LoaderError> {
        self.entries
            .get(&platform)
            .ok_or(LoaderError::UnsupportedPlatformEntry(platform))
    }

    /// The path set for the detected host platform.
    pub fn for_current(&self) -> Result<&PlatformPaths, LoaderError> {
        self.for_platform(Platform::current())
    }
}

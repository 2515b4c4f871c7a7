//! Library Naming & Search Conventions
//!
//! Helpers for turning a bare library name into the platform's conventional
//! filename and for locating it on disk. Pure lookup convenience: the
//! registry never requires it, callers run it before
//! [`load_or_reuse`](crate::registry::LibraryRegistry::load_or_reuse).

use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Apply the platform's shared-library naming convention to a bare name.
///
/// Names that already carry the convention are returned unchanged; for
/// `Platform::Other` there is no convention and the name passes through.
pub fn library_filename(platform: Platform, name: &str) -> String {
    match platform {
        Platform::Windows => {
            if name.ends_with(".dll") {
                name.to_string()
            } else {
                format!("{}.dll", name)
            }
        }
        Platform::Linux => {
            if name.starts_with("lib") && name.ends_with(".so") {
                name.to_string()
            } else {
                format!("lib{}.so", name)
            }
        }
        Platform::MacOS => {
            if name.starts_with("lib") && name.ends_with(".dylib") {
                name.to_string()
            } else {
                format!("lib{}.dylib", name)
            }
        }
        Platform::Other => name.to_string(),
    }
}

/// Ordered list of directories to look for libraries in.
pub struct SearchPaths {
    platform: Platform,
    paths: Vec<PathBuf>,
}

impl SearchPaths {
    /// An empty search list for a platform.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            paths: Vec::new(),
        }
    }

    /// A search list seeded with the platform's conventional locations:
    /// the current directory, the system library directories, and any
    /// directories named by the platform's loader environment variable.
    pub fn with_defaults(platform: Platform) -> Self {
        let mut search = Self::new(platform);

        if let Ok(cwd) = std::env::current_dir() {
            search.paths.push(cwd);
        }
        search.paths.extend(system_dirs(platform));

        if let Some(var) = loader_env_var(platform) {
            if let Ok(value) = std::env::var(var) {
                let separator = if platform == Platform::Windows { ';' } else { ':' };
                search
                    .paths
                    .extend(value.split(separator).filter(|p| !p.is_empty()).map(PathBuf::from));
            }
        }

        search
    }

    /// Append a directory to the search list.
    pub fn add(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// The directories searched, in order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Find a library by name.
    ///
    /// A name that is already an existing path wins outright; otherwise the
    /// platform's conventional filename is probed in each directory in
    /// order.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.exists() {
            return Some(direct.to_path_buf());
        }

        let filename = library_filename(self.platform, name);
        self.paths
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| candidate.exists())
    }
}

/// Conventional system library directories per platform.
fn system_dirs(platform: Platform) -> Vec<PathBuf> {
    match platform {
        Platform::Linux => ["/usr/lib", "/usr/local/lib", "/lib", "/lib64", "/usr/lib64"]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        Platform::MacOS => ["/usr/lib", "/usr/local/lib", "/opt/homebrew/lib"]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        Platform::Windows => vec![PathBuf::from("C:\\Windows\\System32")],
        Platform::Other => Vec::new(),
    }
}

/// The environment variable the platform's loader consults for extra paths.
fn loader_env_var(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::Linux => Some("LD_LIBRARY_PATH"),
        Platform::MacOS => Some("DYLD_LIBRARY_PATH"),
        Platform::Windows => Some("PATH"),
        Platform::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_library_filename_conventions() {
        assert_eq!(library_filename(Platform::Linux, "foo"), "libfoo.so");
        assert_eq!(library_filename(Platform::Linux, "libfoo.so"), "libfoo.so");
        assert_eq!(library_filename(Platform::MacOS, "foo"), "libfoo.dylib");
        assert_eq!(
            library_filename(Platform::MacOS, "libfoo.dylib"),
            "libfoo.dylib"
        );
        assert_eq!(library_filename(Platform::Windows, "foo"), "foo.dll");
        assert_eq!(library_filename(Platform::Windows, "foo.dll"), "foo.dll");
        assert_eq!(library_filename(Platform::Other, "foo"), "foo");
    }

    #[test]
    fn test_locate_in_added_directory() {
        let dir = std::env::temp_dir().join(format!("nativebind-search-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let lib_path = dir.join("libprobe.so");
        fs::write(&lib_path, b"not a real library").unwrap();

        let mut search = SearchPaths::new(Platform::Linux);
        search.add(&dir);
        assert_eq!(search.locate("probe"), Some(lib_path.clone()));
        assert_eq!(search.locate("libprobe.so"), Some(lib_path.clone()));

        fs::remove_file(&lib_path).unwrap();
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_locate_existing_path_wins() {
        let dir = std::env::temp_dir().join(format!("nativebind-direct-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let lib_path = dir.join("oddly-named.bin");
        fs::write(&lib_path, b"payload").unwrap();

        let search = SearchPaths::new(Platform::Linux);
        let found = search.locate(lib_path.to_str().unwrap());
        assert_eq!(found, Some(lib_path.clone()));

        fs::remove_file(&lib_path).unwrap();
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_locate_miss_returns_none() {
        let search = SearchPaths::new(Platform::Linux);
        assert_eq!(search.locate("no-library-with-this-name"), None);
    }

    #[test]
    fn test_defaults_include_system_dirs() {
        let search = SearchPaths::with_defaults(Platform::Linux);
        assert!(search
            .paths()
            .iter()
            .any(|p| p == Path::new("/usr/lib")));
    }
}

//! Library Registry & Symbol Binder
//!
//! The loading engine. A [`LibraryRegistry`] owns the set of libraries
//! opened so far, keyed by the exact string they were opened with, and
//! turns resolved symbol addresses into caller-typed callables.
//!
//! The registry is an explicitly constructed context object rather than an
//! ambient singleton: the embedding application creates one (normally one
//! per process, kept for the process lifetime) and tests create as many
//! independent ones as they like. Entries are append-only; no unload
//! operation exists and OS handles are never closed.

use std::collections::HashMap;
use std::ffi::c_void;
use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{self, LoaderBackend, NativeHandle};
use crate::error::LoaderError;
use crate::platform::Platform;

/// One successfully opened native library.
///
/// At most one exists per distinct name string within a registry. The name
/// is compared case-sensitively and never normalized: two different path
/// spellings of the same physical file are two entries and two OS handles.
#[derive(Debug)]
pub struct LoadedLibrary {
    /// The exact string the library was opened with (cache key).
    name: String,
    /// OS handle; valid for the life of the process, never released.
    handle: NativeHandle,
}

impl LoadedLibrary {
    /// The filename or path this library was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn handle(&self) -> &NativeHandle {
        &self.handle
    }
}

/// Registry of loaded libraries with typed symbol binding.
pub struct LibraryRegistry {
    /// Platform the backend was selected for.
    platform: Platform,
    /// Loader backend, chosen once at construction.
    backend: &'static dyn LoaderBackend,
    /// Libraries opened so far, keyed by the exact open string.
    libraries: Mutex<HashMap<String, Arc<LoadedLibrary>>>,
}

impl LibraryRegistry {
    /// Create a registry for the detected host platform.
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    /// Create a registry for an explicit platform.
    ///
    /// Useful in tests; construction never fails. An unsupported platform
    /// only errors once an operation is attempted.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            backend: backend::select(platform),
            libraries: Mutex::new(HashMap::new()),
        }
    }

    /// The platform this registry dispatches for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Open a library, or return the already-open entry for this exact name.
    ///
    /// Idempotent: calling twice with the same string never opens the OS
    /// handle twice. On failure the registry is left unchanged.
    pub fn load_or_reuse(&self, name: &str) -> Result<Arc<LoadedLibrary>, LoaderError> {
        // One critical section around check-then-insert: two threads racing
        // on the same unseen name must not both open the OS handle.
        let mut libraries = self.libraries.lock();
        if let Some(library) = libraries.get(name) {
            return Ok(Arc::clone(library));
        }
        let handle = self.backend.open(name)?;
        let library = Arc::new(LoadedLibrary {
            name: name.to_string(),
            handle,
        });
        libraries.insert(name.to_string(), Arc::clone(&library));
        Ok(library)
    }

    /// Bind an exported symbol to a caller-typed callable.
    ///
    /// `T` must be a pointer-sized function pointer type, e.g.
    /// `extern "C" fn(i32, i32) -> i32`.
    ///
    /// # Safety
    ///
    /// This is a raw function-pointer cast. No signature verification of
    /// any kind is performed: the caller's declared shape is trusted
    /// verbatim, and a mismatch between `T` and the native function's real
    /// signature is undefined behavior at the moment the callable is
    /// invoked, not at bind time.
    pub unsafe fn bind<T: Copy>(
        &self,
        library: &LoadedLibrary,
        symbol: &str,
    ) -> Result<T, LoaderError> {
        assert_eq!(
            mem::size_of::<T>(),
            mem::size_of::<*mut c_void>(),
            "bind target must be a pointer-sized callable type"
        );
        match self.backend.resolve(library.handle(), symbol)? {
            Some(address) => {
                let raw = address.as_ptr();
                Ok(mem::transmute_copy::<*mut c_void, T>(&raw))
            }
            None => Err(LoaderError::InvalidEntryPoint {
                library: library.name.clone(),
                symbol: symbol.to_string(),
            }),
        }
    }

    /// Whether the library exports the given symbol.
    ///
    /// Unsupported on macOS even though symbol resolution itself works
    /// there; the probing surface was never extended to that platform.
    pub fn has_symbol(&self, library: &LoadedLibrary, symbol: &str) -> Result<bool, LoaderError> {
        if self.platform == Platform::MacOS {
            return Err(LoaderError::UnsupportedPlatform);
        }
        Ok(self.backend.resolve(library.handle(), symbol)?.is_some())
    }

    /// Whether a library was already opened under this exact name.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.libraries.lock().contains_key(name)
    }

    /// Names of all libraries opened so far.
    pub fn loaded_libraries(&self) -> Vec<String> {
        self.libraries.lock().keys().cloned().collect()
    }
}

impl Default for LibraryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_load_fails() {
        let registry = LibraryRegistry::for_platform(Platform::Other);
        let result = registry.load_or_reuse("libfoo.so");
        assert!(matches!(result, Err(LoaderError::UnsupportedPlatform)));
        // No partial entry is recorded on failure.
        assert!(!registry.is_loaded("libfoo.so"));
        assert!(registry.loaded_libraries().is_empty());
    }

    #[test]
    fn test_registry_unchanged_on_load_failure() {
        let registry = LibraryRegistry::new();
        let result = registry.load_or_reuse("/no/such/library/anywhere.so");
        assert!(result.is_err());
        assert!(registry.loaded_libraries().is_empty());
    }

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    #[test]
    fn test_load_failure_names_exact_path() {
        let registry = LibraryRegistry::new();
        let err = registry
            .load_or_reuse("/no/such/library/anywhere.so")
            .unwrap_err();
        assert_eq!(
            err,
            LoaderError::LibraryLoad("/no/such/library/anywhere.so".to_string())
        );
    }

    #[test]
    fn test_load_results_unwrap_cleanly() {
        // unwrap_err on a load result requires LoadedLibrary: Debug.
        let registry = LibraryRegistry::for_platform(Platform::Other);
        let err = registry.load_or_reuse("libfoo.so").unwrap_err();
        assert_eq!(err, LoaderError::UnsupportedPlatform);
        assert_eq!(format!("{:?}", err), "UnsupportedPlatform");
    }

    #[test]
    fn test_platform_accessor() {
        let registry = LibraryRegistry::for_platform(Platform::Linux);
        assert_eq!(registry.platform(), Platform::Linux);
    }
}

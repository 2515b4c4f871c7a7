//! Native Loader Backends
//!
//! The two primitive operations the registry delegates to (open a library
//! by name, resolve an exported symbol to an address), implemented once per
//! platform family on top of the OS loading facility:
//!
//! - POSIX (Linux, macOS): `dlopen` / `dlsym` via `libloading::os::unix`,
//!   opened with `RTLD_NOW | RTLD_GLOBAL` so load failures surface at open
//!   time and the library's exports are globally visible afterwards.
//! - Windows: `LoadLibrary` / `GetProcAddress` via `libloading::os::windows`.
//! - Unsupported: both operations fail with `UnsupportedPlatform`.
//!
//! A backend is selected exactly once per registry from the detected
//! platform, so call sites are a single dynamic dispatch instead of a
//! per-operation platform enumeration.

use std::ffi::c_void;
use std::ptr::NonNull;

use crate::error::LoaderError;
use crate::platform::Platform;

#[cfg(unix)]
type HandleRepr = std::mem::ManuallyDrop<libloading::os::unix::Library>;
#[cfg(windows)]
type HandleRepr = std::mem::ManuallyDrop<libloading::os::windows::Library>;
#[cfg(not(any(unix, windows)))]
type HandleRepr = ();

/// Opaque OS-issued token for a loaded library.
///
/// Exclusively owned by the [`LoadedLibrary`](crate::registry::LoadedLibrary)
/// it was opened for; a null handle is never stored, construction fails
/// instead. The inner library is held in `ManuallyDrop`: once opened, a
/// handle is never closed for the life of the process.
pub struct NativeHandle(#[allow(dead_code)] HandleRepr);

impl std::fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token itself is opaque; never expose the raw value.
        f.write_str("NativeHandle")
    }
}

/// The primitive operation pair behind the registry.
pub(crate) trait LoaderBackend: Send + Sync {
    /// Open a library by filename or path.
    fn open(&self, name: &str) -> Result<NativeHandle, LoaderError>;

    /// Resolve an exported symbol to its address.
    ///
    /// An absent symbol is `Ok(None)`, never an error; whether absence is
    /// an error is the caller's decision.
    fn resolve(
        &self,
        handle: &NativeHandle,
        symbol: &str,
    ) -> Result<Option<NonNull<c_void>>, LoaderError>;
}

/// Pick the backend for a platform, once, at registry construction.
///
/// A platform the running binary has no loader for (including `Other`)
/// gets the unsupported backend rather than an immediate error: failure is
/// deferred to the first attempted operation.
pub(crate) fn select(platform: Platform) -> &'static dyn LoaderBackend {
    match platform {
        #[cfg(unix)]
        Platform::Linux | Platform::MacOS => &PosixBackend,
        #[cfg(windows)]
        Platform::Windows => &WindowsBackend,
        _ => &UnsupportedBackend,
    }
}

#[cfg(unix)]
pub(crate) use posix::PosixBackend;

#[cfg(unix)]
mod posix {
    use std::ffi::{c_void, CString};
    use std::mem::ManuallyDrop;
    use std::ptr::NonNull;

    use libloading::os::unix::Library;

    use super::{LoaderBackend, NativeHandle};
    use crate::error::LoaderError;

    /// Resolve every symbol at open time and make them globally visible
    /// to later lookups.
    const OPEN_FLAGS: libc::c_int = libc::RTLD_NOW | libc::RTLD_GLOBAL;

    /// `dlopen` / `dlsym` backend shared by Linux and macOS.
    pub(crate) struct PosixBackend;

    impl LoaderBackend for PosixBackend {
        fn open(&self, name: &str) -> Result<NativeHandle, LoaderError> {
            // Safety: loading a native library runs its initializers; the
            // caller vouches for the artifact it asked for.
            let library = unsafe { Library::open(Some(name), OPEN_FLAGS) }
                .map_err(|_| LoaderError::LibraryLoad(name.to_string()))?;
            Ok(NativeHandle(ManuallyDrop::new(library)))
        }

        fn resolve(
            &self,
            handle: &NativeHandle,
            symbol: &str,
        ) -> Result<Option<NonNull<c_void>>, LoaderError> {
            let c_name = match CString::new(symbol) {
                Ok(c) => c,
                // Interior NUL can never name an export.
                Err(_) => return Ok(None),
            };
            // Safety: dlsym on a handle this backend opened.
            let resolved = unsafe { handle.0.get::<*mut c_void>(c_name.as_bytes_with_nul()) };
            Ok(match resolved {
                Ok(address) => NonNull::new(*address),
                Err(_) => None,
            })
        }
    }
}

#[cfg(windows)]
pub(crate) use windows::WindowsBackend;

#[cfg(windows)]
mod windows {
    use std::ffi::{c_void, CString};
    use std::mem::ManuallyDrop;
    use std::ptr::NonNull;

    use libloading::os::windows::Library;

    use super::{LoaderBackend, NativeHandle};
    use crate::error::LoaderError;

    /// `LoadLibrary` / `GetProcAddress` backend.
    pub(crate) struct WindowsBackend;

    impl LoaderBackend for WindowsBackend {
        fn open(&self, name: &str) -> Result<NativeHandle, LoaderError> {
            // Safety: loading a native library runs DllMain; the caller
            // vouches for the artifact it asked for.
            let library = unsafe { Library::new(name) }
                .map_err(|_| LoaderError::LibraryLoad(name.to_string()))?;
            Ok(NativeHandle(ManuallyDrop::new(library)))
        }

        fn resolve(
            &self,
            handle: &NativeHandle,
            symbol: &str,
        ) -> Result<Option<NonNull<c_void>>, LoaderError> {
            let c_name = match CString::new(symbol) {
                Ok(c) => c,
                Err(_) => return Ok(None),
            };
            // Safety: GetProcAddress on a handle this backend opened.
            let resolved = unsafe { handle.0.get::<*mut c_void>(c_name.as_bytes_with_nul()) };
            Ok(match resolved {
                Ok(address) => NonNull::new(*address),
                Err(_) => None,
            })
        }
    }
}

/// Backend for platforms with no loading facility.
pub(crate) struct UnsupportedBackend;

impl LoaderBackend for UnsupportedBackend {
    fn open(&self, _name: &str) -> Result<NativeHandle, LoaderError> {
        Err(LoaderError::UnsupportedPlatform)
    }

    fn resolve(
        &self,
        _handle: &NativeHandle,
        _symbol: &str,
    ) -> Result<Option<NonNull<c_void>>, LoaderError> {
        Err(LoaderError::UnsupportedPlatform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_platform_gets_unsupported_backend() {
        let backend = select(Platform::Other);
        let result = backend.open("libanything.so");
        assert!(matches!(result, Err(LoaderError::UnsupportedPlatform)));
    }

    #[cfg(unix)]
    #[test]
    fn test_foreign_platform_gets_unsupported_backend() {
        // A unix build has no Windows loader.
        let backend = select(Platform::Windows);
        let result = backend.open("foo.dll");
        assert!(matches!(result, Err(LoaderError::UnsupportedPlatform)));
    }

    #[cfg(any(target_os = "linux", target_os = "macos"))]
    #[test]
    fn test_open_failure_carries_requested_name() {
        let backend = select(Platform::from_os_name(std::env::consts::OS));
        let result = backend.open("/definitely/not/a/real/library.so");
        assert_eq!(
            result.err(),
            Some(LoaderError::LibraryLoad(
                "/definitely/not/a/real/library.so".to_string()
            ))
        );
    }
}

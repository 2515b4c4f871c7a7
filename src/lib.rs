//! Nativebind - Cross-Platform Native Library Loading
//!
//! Loads native shared libraries (DLLs on Windows, shared objects on
//! Linux, dylibs on macOS), resolves their exported symbols, and binds
//! them to caller-typed callables, insulating the embedding application
//! from per-OS loader APIs and per-OS artifact naming conventions.
//!
//! # Features
//!
//! - **Platform detection**: Windows / Linux / macOS / other, memoized once
//!   per process
//! - **One backend per platform**: `dlopen`+`dlsym` with
//!   `RTLD_NOW | RTLD_GLOBAL`, or `LoadLibrary`+`GetProcAddress`, selected
//!   once at registry construction
//! - **Load-once registry**: libraries cached by the exact open string,
//!   append-only, handles never released
//! - **Typed symbol binding**: raw addresses cast to caller-declared
//!   function-pointer shapes (unchecked by design)
//! - **Platform path table**: per-OS named path strings for the same
//!   logical artifact, resolved just before loading
//!
//! # Example
//!
//! ```rust,no_run
//! use nativebind::{LibraryRegistry, PathTable, Platform, PlatformPaths};
//!
//! let table = PathTable::build([
//!     PlatformPaths::new(Platform::Linux).with_path("bin", "libfoo.so"),
//!     PlatformPaths::new(Platform::Windows).with_path("bin", "foo.dll"),
//! ]);
//!
//! let registry = LibraryRegistry::new();
//! let path = table.for_current()?.get("bin")?;
//! let library = registry.load_or_reuse(path)?;
//!
//! type AddFn = extern "C" fn(i32, i32) -> i32;
//! let add: AddFn = unsafe { registry.bind(&library, "add")? };
//! assert_eq!(add(2, 3), 5);
//! # Ok::<(), nativebind::LoaderError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   Path Table     │  platform → {key → path string}
//! └────────┬─────────┘
//!          │ artifact path for the detected platform
//!          ▼
//! ┌──────────────────┐
//! │ Library Registry │  load-or-reuse, bind, has_symbol
//! └────────┬─────────┘
//!          │ one dispatch, chosen at construction
//!          ▼
//! ┌──────────────────┐
//! │ Loader Backend   │  POSIX (dlopen/dlsym) | Windows | Unsupported
//! └──────────────────┘
//! ```

#![warn(clippy::all)]

mod backend;
pub mod error;
pub mod paths;
pub mod platform;
pub mod registry;
pub mod search;

// Re-export commonly used types
pub use error::LoaderError;
pub use paths::{PathTable, PlatformPaths};
pub use platform::Platform;
pub use registry::{LibraryRegistry, LoadedLibrary};
pub use search::{library_filename, SearchPaths};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_feeds_registry() {
        let table = PathTable::build([
            PlatformPaths::new(Platform::Linux).with_path("bin", "libfoo.so"),
            PlatformPaths::new(Platform::Windows).with_path("bin", "foo.dll"),
        ]);
        let set = table.for_platform(Platform::Linux).unwrap();
        assert_eq!(set.get("bin").unwrap(), "libfoo.so");

        // The path string is handed to the registry verbatim; a bad one
        // fails without leaving a partial entry behind.
        let registry = LibraryRegistry::for_platform(Platform::Other);
        assert!(registry.load_or_reuse(set.get("bin").unwrap()).is_err());
        assert!(registry.loaded_libraries().is_empty());
    }

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

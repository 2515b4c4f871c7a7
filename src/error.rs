//! Loader Error Taxonomy
//!
//! Every failure the crate can produce, as explicit result values. All of
//! them are terminal to the operation that raised them: nothing is retried
//! or logged internally, and recovery is entirely the caller's choice.

use thiserror::Error;

use crate::platform::Platform;

/// Errors from library loading, symbol binding, and path table lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// The current platform has no backend for the attempted operation.
    ///
    /// This is the single unrecoverable failure mode of the crate. It also
    /// covers the deliberate gap in `has_symbol` on macOS.
    #[error("This platform is not supported.")]
    UnsupportedPlatform,

    /// The OS failed to open the named library.
    ///
    /// The OS is not asked to distinguish why (file not found, architecture
    /// mismatch, missing dependency, bad format); only the requested name
    /// is carried.
    #[error("Failed to load library '{0}'")]
    LibraryLoad(String),

    /// The symbol was not found in an otherwise successfully opened library.
    #[error("No entry point by the name of '{symbol}' could be found in '{library}'.")]
    InvalidEntryPoint {
        /// Name the library was opened with.
        library: String,
        /// The requested symbol name.
        symbol: String,
    },

    /// A path set has no entry for the requested key.
    #[error("No path entry for key '{0}'")]
    MissingPathEntry(String),

    /// The path table has no entry for the requested platform.
    #[error("No paths registered for platform '{0}'")]
    UnsupportedPlatformEntry(Platform),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LoaderError::LibraryLoad("libfoo.so".to_string());
        assert_eq!(err.to_string(), "Failed to load library 'libfoo.so'");

        let err = LoaderError::InvalidEntryPoint {
            library: "libfoo.so".to_string(),
            symbol: "add".to_string(),
        };
        assert!(err.to_string().contains("'add'"));
        assert!(err.to_string().contains("'libfoo.so'"));

        let err = LoaderError::MissingPathEntry("bin".to_string());
        assert_eq!(err.to_string(), "No path entry for key 'bin'");

        let err = LoaderError::UnsupportedPlatformEntry(Platform::MacOS);
        assert!(err.to_string().contains("macos"));
    }
}

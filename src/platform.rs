//! Host Platform Detection
//!
//! Identifies which operating system family the process is running on.
//! Detection happens at most once per process and is memoized: the OS a
//! process runs on cannot change during its lifetime.

use std::fmt;

use once_cell::sync::OnceCell;

static CURRENT: OnceCell<Platform> = OnceCell::new();

/// Operating system families the loader distinguishes between.
///
/// Anything that is not Windows, Linux, or macOS maps to [`Platform::Other`].
/// Detection itself never fails; an unsupported platform only becomes an
/// error at the point where a platform-specific operation is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Microsoft Windows (`LoadLibrary` / `GetProcAddress`)
    Windows,
    /// Linux (`dlopen` / `dlsym`)
    Linux,
    /// Apple macOS (`dlopen` / `dlsym` via dyld)
    MacOS,
    /// Any platform without a loader backend
    Other,
}

impl Platform {
    /// The platform this process is running on, computed on first call.
    pub fn current() -> Platform {
        *CURRENT.get_or_init(|| Self::from_os_name(std::env::consts::OS))
    }

    /// Map a `std::env::consts::OS` style name to a platform.
    pub fn from_os_name(os: &str) -> Platform {
        match os {
            "windows" => Platform::Windows,
            "linux" => Platform::Linux,
            "macos" => Platform::MacOS,
            _ => Platform::Other,
        }
    }

    /// Whether a loader backend exists for this platform.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Platform::Other)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
            Platform::MacOS => write!(f, "macos"),
            Platform::Other => write!(f, "other"),
        }
    }
}

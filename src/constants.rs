//! Application constants for distro_releases
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("distro-releases/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 2;
}

/// Request pacing
pub mod limits {
    /// Default rate limit for mirror requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
}

/// Default mirror roots
pub mod mirrors {
    /// Debian primary mirror
    pub const DEBIAN_URL: &str = "https://deb.debian.org/debian/";

    /// Ubuntu primary archive
    pub const UBUNTU_URL: &str = "https://archive.ubuntu.com/ubuntu/";
}

/// Recursive directory listing format
pub mod listing {
    /// Listing path relative to a mirror root
    pub const LISTING_PATH: &str = "ls-lR.gz";

    /// Per-release metadata file name
    pub const METADATA_FILE_NAME: &str = "Release";

    /// Directory lines that denote a single release
    pub const RELEASE_DIRECTORY_PATTERN: &str = r"^\./(dists/[^/]+):$";

    /// `perms links owner group size month day time-or-year name`
    pub const FILE_ENTRY_PATTERN: &str =
        r"^(\S+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(\d+)\s+(\S+\s+\d+\s+[\d:]+)\s+(.+)$";

    /// Marker separating a symlink name from its target
    pub const SYMLINK_ARROW: &str = " -> ";
}

/// Release classification policy
pub mod release {
    /// Distribution family using plain numeric versions
    pub const DEBIAN_LABEL: &str = "Debian";

    /// Distribution family using `YY.MM` calendar versions
    pub const UBUNTU_LABEL: &str = "Ubuntu";

    /// Debian's experimental suite
    pub const EXPERIMENTAL_SUITE: &str = "experimental";

    /// Debian's rolling development suite
    pub const UNSTABLE_SUITE: &str = "unstable";

    /// Suites that are never primary release tracks
    pub const EXCLUDED_SUITES: &[&str] = &["devel", "oldoldstable"];

    /// Suffixes of auxiliary repositories layered over a release
    pub const EXCLUDED_SUITE_SUFFIXES: &[&str] =
        &["-updates", "-backports", "-security", "-proposed", "-sloppy"];

    /// Month in which LTS releases ship
    pub const LTS_MONTH: u32 = 4;

    /// Maximum age of a relevant LTS release
    pub const LTS_MAX_AGE_DAYS: i64 = 5 * 365;

    /// Maximum age of a relevant interim release
    pub const INTERIM_MAX_AGE_DAYS: i64 = 365;

    /// Marker appended to display names of LTS releases
    pub const LTS_MARKER: &str = "LTS";
}

/// Table export
pub mod export {
    /// Column header, in output order
    pub const HEADER: [&str; 5] = ["OS", "Dist", "Arch", "Name", "Exp"];

    /// Legacy codename and the dist name it is exported as
    pub const CODENAME_RENAMES: &[(&str, &str)] = &[("rc-buggy", "experimental")];

    /// Default x86 table
    pub const X86_TABLE: &str = "x86.csv";

    /// Architectures exported into the x86 table
    pub const X86_ARCHITECTURES: &[&str] = &["amd64", "i386"];

    /// Default ARM table
    pub const ARM_TABLE: &str = "arm.csv";

    /// Architectures exported into the ARM table
    pub const ARM_ARCHITECTURES: &[&str] = &["arm64", "armhf", "armel"];
}

/// Logging and debugging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_CONFIG_FILE: &str = "distro-releases.toml";

    /// Directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "distro-releases";

    /// File name under the user config dir
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::DEFAULT_RATE_LIMIT_RPS;
pub use listing::{LISTING_PATH, METADATA_FILE_NAME};

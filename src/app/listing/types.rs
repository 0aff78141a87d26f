//! Core types for directory listing crawls

/// Statistics about a listing crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Total lines read from the listing
    pub lines_read: usize,
    /// Directory blocks encountered
    pub directory_blocks: usize,
    /// Directory blocks matching the per-release pattern
    pub release_blocks: usize,
    /// Entry lines inside release blocks that did not parse
    pub unparsed_entries: usize,
    /// Metadata files found
    pub candidates: usize,
    /// Releases successfully fetched and parsed
    pub releases: usize,
    /// Metadata fetches that failed
    pub fetch_failures: usize,
}

impl CrawlStats {
    /// Share of candidates that produced a release, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.candidates == 0 {
            0.0
        } else {
            (self.releases as f64 / self.candidates as f64) * 100.0
        }
    }
}

/// Lifecycle of a crawl
///
/// Once a crawl leaves `Running` it never yields another release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// More releases may follow
    Running,
    /// The listing ended normally
    Exhausted,
    /// The listing was malformed or could not be read
    Failed,
}

impl CrawlState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CrawlState::Running)
    }
}

/// One file entry of a directory block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Mode string (e.g., `-rw-r--r--`)
    pub permissions: String,
    /// Hard link count
    pub links: u64,
    pub owner: String,
    pub group: String,
    /// Size in bytes
    pub size: u64,
    /// Modification time as printed (e.g., `Aug 31 10:11`)
    pub timestamp: String,
    /// File name (the link name for symlinks)
    pub name: String,
    /// Symlink target, if any
    pub link_target: Option<String>,
}

impl FileEntry {
    pub fn is_symlink(&self) -> bool {
        self.permissions.starts_with('l')
    }
}

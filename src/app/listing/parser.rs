//! Line-level parsing of recursive directory listings
//!
//! A listing is a sequence of blocks, one per directory:
//!
//! ```text
//! ./dists/bookworm:
//! total 1544
//! -rw-r--r-- 1 ftp ftp  151244 Aug 31 10:11 Release
//! lrwxrwxrwx 1 ftp ftp       7 Jun 10  2023 ChangeLog -> ../../x
//!
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::types::FileEntry;
use crate::constants::listing::{
    FILE_ENTRY_PATTERN, METADATA_FILE_NAME, RELEASE_DIRECTORY_PATTERN, SYMLINK_ARROW,
};

fn directory_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RELEASE_DIRECTORY_PATTERN).expect("valid directory pattern"))
}

fn entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FILE_ENTRY_PATTERN).expect("valid entry pattern"))
}

/// Extract the mirror-relative path of a per-release directory line
///
/// `./dists/bookworm:` yields `dists/bookworm`; any other directory yields
/// `None`.
pub fn parse_release_directory(line: &str) -> Option<&str> {
    directory_regex()
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Parse the `total <count>` line that follows a directory line
pub fn parse_total_line(line: &str) -> Option<u64> {
    line.strip_prefix("total ")?.trim().parse().ok()
}

/// Parse a 7-field file entry line
pub fn parse_file_entry(line: &str) -> Option<FileEntry> {
    let captures = entry_regex().captures(line)?;
    let field = |i: usize| captures.get(i).map(|m| m.as_str());

    let permissions = field(1)?.to_string();
    let raw_name = field(7)?;
    let (name, link_target) = match raw_name.split_once(SYMLINK_ARROW) {
        Some((name, target)) if permissions.starts_with('l') => {
            (name.to_string(), Some(target.to_string()))
        }
        _ => (raw_name.to_string(), None),
    };

    Some(FileEntry {
        permissions,
        links: field(2)?.parse().ok()?,
        owner: field(3)?.to_string(),
        group: field(4)?.to_string(),
        size: field(5)?.parse().ok()?,
        timestamp: field(6)?.to_string(),
        name,
        link_target,
    })
}

/// Check whether an entry is a release metadata file or a link to one
pub fn is_metadata_entry(entry: &FileEntry) -> bool {
    entry.name == METADATA_FILE_NAME
}

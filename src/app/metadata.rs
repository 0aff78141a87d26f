//! Parser for `Release` metadata files
//!
//! `Release` files use the Debian control-file format: `Key: Value` lines,
//! with continuation lines indented by whitespace. Only the handful of keys
//! needed to describe a release are extracted; the first occurrence of each
//! key wins and everything else is ignored.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::app::release::{ReleaseFields, ReleaseRecord};

fn field_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9-]*): (.*)$").expect("valid regex"))
}

/// Parse a single `Key: Value` line
///
/// Returns `None` for continuation lines and lines without a `": "`
/// separator.
pub fn parse_field_line(line: &str) -> Option<(&str, &str)> {
    let captures = field_regex().captures(line)?;
    let key = captures.get(1)?.as_str();
    let value = captures.get(2)?.as_str();
    Some((key, value.trim()))
}

/// Build a release record from the lines of one `Release` file
///
/// Missing keys leave the corresponding field absent; an absent or empty
/// `Architectures` key yields an empty architecture set.
pub fn parse_release_lines<I, S>(lines: I) -> ReleaseRecord
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fields = ReleaseFields::default();
    let mut architectures: Option<BTreeSet<String>> = None;

    for line in lines {
        let Some((key, value)) = parse_field_line(line.as_ref()) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        let slot = match key {
            "Label" => &mut fields.label,
            "Suite" => &mut fields.suite,
            "Version" => &mut fields.version,
            "Codename" => &mut fields.codename,
            "Architectures" => {
                if architectures.is_none() {
                    architectures = Some(value.split_whitespace().map(str::to_string).collect());
                }
                continue;
            }
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    fields.architectures = architectures.unwrap_or_default();
    ReleaseRecord::new(fields)
}

/// Build a release record from the full text of one `Release` file
pub fn parse_release_text(text: &str) -> ReleaseRecord {
    parse_release_lines(text.lines())
}

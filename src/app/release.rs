//! Release records and their classification
//!
//! A [`ReleaseRecord`] describes one distribution release as announced by a
//! single `Release` file on a mirror. Every field is optional because mirrors
//! give no schema guarantees; each derived predicate defines what it does
//! when the fields it needs are missing.
//!
//! Date-dependent predicates come in two flavours: `*_on(today)` takes the
//! reference date explicitly, the plain variants use the local date.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, Duration, Local, NaiveDate};
use tracing::{debug, warn};

use crate::constants::release::{
    DEBIAN_LABEL, EXCLUDED_SUITES, EXCLUDED_SUITE_SUFFIXES, EXPERIMENTAL_SUITE,
    INTERIM_MAX_AGE_DAYS, LTS_MARKER, LTS_MAX_AGE_DAYS, LTS_MONTH, UBUNTU_LABEL, UNSTABLE_SUITE,
};

/// Raw fields of a release as read from its metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseFields {
    /// Distribution family (e.g., "Debian")
    pub label: Option<String>,
    /// Release channel (e.g., "stable", "noble")
    pub suite: Option<String>,
    /// Vendor-specific version (e.g., "12.7", "24.04")
    pub version: Option<String>,
    /// Release nickname (e.g., "bookworm")
    pub codename: Option<String>,
    /// Declared CPU architectures
    pub architectures: BTreeSet<String>,
}

/// One discovered distribution release
///
/// Records are immutable. The sort key, release date and display name are
/// derived once at construction. Equality and hashing only consider the
/// display name, so two records announcing the same release on different
/// mirrors collapse into one regardless of their architecture sets.
#[derive(Debug, Clone)]
pub struct ReleaseRecord {
    fields: ReleaseFields,
    sortkey: String,
    release_date: Option<NaiveDate>,
    display_name: String,
}

impl ReleaseRecord {
    /// Build a record from parsed metadata fields
    pub fn new(fields: ReleaseFields) -> Self {
        let sortkey = compute_sortkey(&fields);
        let release_date = compute_release_date(&fields);
        let display_name = compute_display_name(&fields, is_lts_date(release_date));

        Self {
            fields,
            sortkey,
            release_date,
            display_name,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.fields.label.as_deref()
    }

    pub fn suite(&self) -> Option<&str> {
        self.fields.suite.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.fields.version.as_deref()
    }

    pub fn codename(&self) -> Option<&str> {
        self.fields.codename.as_deref()
    }

    pub fn architectures(&self) -> &BTreeSet<String> {
        &self.fields.architectures
    }

    /// Check whether the release ships packages for `arch`
    pub fn supports(&self, arch: &str) -> bool {
        self.fields.architectures.contains(arch)
    }

    /// Key used to order releases for export
    pub fn sortkey(&self) -> &str {
        &self.sortkey
    }

    /// Human-readable name, also the de-duplication key
    ///
    /// Examples: `Debian 12 ("bookworm")`, `Debian unstable ("sid")`,
    /// `Ubuntu 24.04 LTS ("noble")`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// First day of the release month for calendar-versioned releases
    ///
    /// Only Ubuntu encodes its release date in the version (`YY.MM`); every
    /// other release has an unknown date.
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date
    }

    /// Long-term-support releases ship in April of even years
    pub fn is_lts(&self) -> bool {
        is_lts_date(self.release_date)
    }

    /// Time elapsed between the release date and `today`
    ///
    /// Negative when the release date lies in the future.
    pub fn age_on(&self, today: NaiveDate) -> Option<Duration> {
        self.release_date
            .map(|date| today.signed_duration_since(date))
    }

    pub fn age(&self) -> Option<Duration> {
        self.age_on(local_today())
    }

    /// Check whether end users should care about this release on `today`
    pub fn is_relevant_on(&self, today: NaiveDate) -> bool {
        let label = match self.label() {
            Some(label @ (DEBIAN_LABEL | UBUNTU_LABEL)) => label,
            _ => return false,
        };

        let suite = match self.suite() {
            Some(suite) => suite,
            None => return false,
        };
        if EXCLUDED_SUITES.contains(&suite)
            || EXCLUDED_SUITE_SUFFIXES
                .iter()
                .any(|suffix| suite.ends_with(suffix))
        {
            return false;
        }

        if label == UBUNTU_LABEL {
            let age = match self.age_on(today) {
                Some(age) => age,
                None => {
                    debug!(
                        "Release {} has no usable release date, treating as not relevant",
                        self.display_name
                    );
                    return false;
                }
            };
            let max_age_days = if self.is_lts() {
                LTS_MAX_AGE_DAYS
            } else {
                INTERIM_MAX_AGE_DAYS
            };
            return age < Duration::days(max_age_days);
        }

        true
    }

    pub fn is_relevant(&self) -> bool {
        self.is_relevant_on(local_today())
    }

    /// Check whether the release is an experimental or pre-release build
    ///
    /// True for Debian's experimental suite and for Ubuntu releases whose
    /// release month has not started yet on `today`.
    pub fn is_experimental_on(&self, today: NaiveDate) -> bool {
        match self.label() {
            Some(DEBIAN_LABEL) => self.suite() == Some(EXPERIMENTAL_SUITE),
            Some(UBUNTU_LABEL) => self
                .age_on(today)
                .map_or(false, |age| age < Duration::zero()),
            _ => false,
        }
    }

    pub fn is_experimental(&self) -> bool {
        self.is_experimental_on(local_today())
    }
}

impl From<ReleaseFields> for ReleaseRecord {
    fn from(fields: ReleaseFields) -> Self {
        Self::new(fields)
    }
}

impl PartialEq for ReleaseRecord {
    fn eq(&self, other: &Self) -> bool {
        self.display_name == other.display_name
    }
}

impl Eq for ReleaseRecord {}

impl Hash for ReleaseRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display_name.hash(state);
    }
}

impl fmt::Display for ReleaseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn is_lts_date(date: Option<NaiveDate>) -> bool {
    date.map_or(false, |date| {
        date.month() == LTS_MONTH && date.year() % 2 == 0
    })
}

/// Versioned releases sort by `label version`. Versionless ones sort after
/// every versioned release of the same label, with unstable and then
/// experimental last.
fn compute_sortkey(fields: &ReleaseFields) -> String {
    let label = fields.label.as_deref().unwrap_or("");
    if let Some(version) = fields.version.as_deref() {
        return format!("{} {}", label, version);
    }

    let suite = fields.suite.as_deref().unwrap_or("");
    let rank = match suite {
        UNSTABLE_SUITE => 1,
        EXPERIMENTAL_SUITE => 2,
        _ => 0,
    };
    format!("{} ~{}{}", label, rank, suite)
}

fn compute_release_date(fields: &ReleaseFields) -> Option<NaiveDate> {
    if fields.label.as_deref() != Some(UBUNTU_LABEL) {
        return None;
    }
    let version = fields.version.as_deref()?;

    let date = parse_calendar_version(version);
    if date.is_none() {
        warn!(
            "Cannot derive a release date from {} version {:?}",
            UBUNTU_LABEL, version
        );
    }
    date
}

/// Parse a `YY.MM` version into the first day of that month
///
/// Two-digit years follow the POSIX pivot: 69-99 are 19xx, 00-68 are 20xx.
pub fn parse_calendar_version(version: &str) -> Option<NaiveDate> {
    let (year, month) = version.split_once('.')?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(year) || !two_digits(month) {
        return None;
    }

    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let year = if year >= 69 { 1900 + year } else { 2000 + year };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn compute_display_name(fields: &ReleaseFields, lts: bool) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(label) = fields.label.as_deref() {
        parts.push(label);
    }

    match (fields.suite.as_deref(), fields.version.as_deref()) {
        (Some(suite), Some(version)) if fields.codename.as_deref() != Some(suite) => {
            parts.push(suite);
            parts.push(version);
        }
        (_, Some(version)) => parts.push(version),
        (Some(suite), None) => parts.push(suite),
        (None, None) => {}
    }

    if lts {
        parts.push(LTS_MARKER);
    }

    let mut name = parts.join(" ");
    if let Some(codename) = fields.codename.as_deref() {
        if !name.is_empty() {
            name.push(' ');
        }
        name.push_str(&format!("(\"{}\")", codename));
    }
    name
}

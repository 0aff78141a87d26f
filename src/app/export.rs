//! Per-architecture release tables
//!
//! Each table lists every relevant release once per requested architecture
//! it supports, with the columns `OS,Dist,Arch,Name,Exp`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::app::release::ReleaseRecord;
use crate::constants::export::{CODENAME_RENAMES, HEADER};
use crate::errors::{ExportError, ExportResult};

/// One output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "OS")]
    pub os: String,
    #[serde(rename = "Dist")]
    pub dist: String,
    #[serde(rename = "Arch")]
    pub arch: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Exp", serialize_with = "serialize_flag")]
    pub experimental: bool,
}

/// Consumers expect `True`/`False`
fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

/// Dist name for a codename, applying legacy renames
pub fn dist_name(codename: &str) -> String {
    let codename = codename.to_lowercase();
    CODENAME_RENAMES
        .iter()
        .find(|(legacy, _)| *legacy == codename)
        .map(|(_, modern)| modern.to_string())
        .unwrap_or(codename)
}

/// Rows for `records` on `today`, in record order then architecture order
///
/// Irrelevant records and architectures a record does not support produce
/// no rows. Relevant records without a codename are skipped with a warning.
pub fn build_rows<'a, I, S>(records: I, architectures: &[S], today: NaiveDate) -> Vec<ExportRow>
where
    I: IntoIterator<Item = &'a ReleaseRecord>,
    S: AsRef<str>,
{
    let mut rows = Vec::new();
    for record in records {
        if !record.is_relevant_on(today) {
            debug!("Not exporting irrelevant release {}", record);
            continue;
        }
        let Some(codename) = record.codename() else {
            warn!("Not exporting release {} without a codename", record);
            continue;
        };

        let os = record.label().unwrap_or_default().to_lowercase();
        let dist = dist_name(codename);
        let experimental = record.is_experimental_on(today);

        for arch in architectures.iter().map(AsRef::as_ref) {
            if !record.supports(arch) {
                continue;
            }
            rows.push(ExportRow {
                os: os.clone(),
                dist: dist.clone(),
                arch: arch.to_string(),
                name: record.display_name().to_string(),
                experimental,
            });
        }
    }
    rows
}

/// Write a table for `records` to `writer`, returning the number of rows
///
/// The header is written even when no row qualifies.
pub fn export_rows<'a, I, S, W>(
    records: I,
    writer: W,
    architectures: &[S],
    today: NaiveDate,
) -> ExportResult<usize>
where
    I: IntoIterator<Item = &'a ReleaseRecord>,
    S: AsRef<str>,
    W: Write,
{
    let rows = build_rows(records, architectures, today);

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for row in &rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;

    Ok(rows.len())
}

/// Write a table for `records` to the file at `path`
pub fn export_to_path<'a, I, S>(
    records: I,
    path: &Path,
    architectures: &[S],
    today: NaiveDate,
) -> ExportResult<usize>
where
    I: IntoIterator<Item = &'a ReleaseRecord>,
    S: AsRef<str>,
{
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let written = export_rows(records, file, architectures, today)?;
    info!("Wrote {} rows to {}", written, path.display());
    Ok(written)
}

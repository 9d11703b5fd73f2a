//! Backup and rename-aside naming
//!
//! Backups are named `<label>-YYYYMMDD-HHMM` in local time; the zero padding
//! makes lexical order equal to chronological order.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// strftime format of the timestamp part
pub const STAMP_FORMAT: &str = "%Y%m%d-%H%M";

/// Format a timestamp for a backup or `.bak-` name
pub fn stamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(STAMP_FORMAT).to_string()
}

/// Current local time as a name stamp
pub fn now_stamp() -> String {
    stamp(&Local::now())
}

/// `<label>-<stamp>`
pub fn backup_name(label: &str, stamp: &str) -> String {
    format!("{}-{}", label, stamp)
}

/// Prefix every backup of `label` starts with
pub fn label_prefix(label: &str) -> String {
    format!("{}-", label)
}

/// Parse the timestamp out of a `<label>-YYYYMMDD-HHMM` name
///
/// Renamed backups that no longer carry a timestamp return `None`.
pub fn parse_backup_timestamp(label: &str, name: &str) -> Option<NaiveDateTime> {
    let rest = name.strip_prefix(&label_prefix(label))?;
    let (date_part, time_part) = rest.split_once('-')?;

    if date_part.len() != 8 || time_part.len() != 4 {
        return None;
    }
    if !date_part.chars().chain(time_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[4..6].parse().ok()?;
    let day: u32 = date_part[6..8].parse().ok()?;
    let hour: u32 = time_part[0..2].parse().ok()?;
    let minute: u32 = time_part[2..4].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(NaiveDateTime::new(date, time))
}

/// `<path>.bak-<stamp>` sibling used to move a live tree out of the way
pub fn aside_path(path: &Path, stamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".bak-{}", stamp));
    PathBuf::from(name)
}

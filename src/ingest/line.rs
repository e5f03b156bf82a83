//! Line classification and field parsing for IAGA-2002-style records

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{DstError, Result};
use crate::series::{Sample, SectionHeader};

/// Parse-side timestamp format; the fractional part may carry one to six
/// digits (the canonical form has six, see [`crate::series::TIMESTAMP_FORMAT`])
const PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Classification of one raw input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Free-text header line, trailing non-whitespace character is `|`
    Header,
    /// Well-formed data line carrying a timestamp and a Dst value
    Data(Sample),
    /// Blank, comment, or short line; ignorable noise
    Invalid,
}

/// Classify one raw line.
///
/// Header lines end in the pipe delimiter. Lines with fewer than four
/// whitespace-separated fields are noise and are skipped by the caller.
/// Anything else must parse as a data line (field 0 date, field 1 time,
/// field 3 Dst value in nT); a malformed timestamp or value is fatal for the
/// stream because skipping it would corrupt gap-fill accounting.
pub fn classify_line(line: &str, lineno: usize) -> Result<LineKind> {
    let line = line.trim();

    if line.ends_with('|') {
        return Ok(LineKind::Header);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Ok(LineKind::Invalid);
    }

    // Expected layout: DATE TIME DOY DST (field 2 unused)
    let timestamp = parse_timestamp(fields[0], fields[1])
        .map_err(|reason| DstError::ParseError { line: lineno, reason })?;
    let value: f64 = fields[3].parse().map_err(|_| DstError::ParseError {
        line: lineno,
        reason: format!("invalid Dst value '{}'", fields[3]),
    })?;

    Ok(LineKind::Data(Sample::new(timestamp, value)))
}

/// Combine the date and time fields of a data line into a UTC instant
fn parse_timestamp(date: &str, time: &str) -> std::result::Result<DateTime<Utc>, String> {
    let joined = format!("{} {}", date, time);
    NaiveDateTime::parse_from_str(&joined, PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", joined, e))
}

/// Assign a recognized header line's value into the header.
///
/// Exactly these case-sensitive prefixes are recognized: `Format`,
/// `Source of Data`, `Station Name`, `IAGA CODE`, `Data Interval Type`,
/// `Data Type`. The value is the remainder with trailing pipes and
/// surrounding whitespace stripped. Unrecognized header lines are ignored.
pub fn parse_header_field(header: &mut SectionHeader, line: &str) {
    let line = line.trim();
    let value_after = |prefix: &str| {
        line.strip_prefix(prefix)
            .map(|rest| rest.trim_end_matches('|').trim().to_string())
    };

    if let Some(v) = value_after("Format") {
        header.format = Some(v);
    } else if let Some(v) = value_after("Source of Data") {
        header.source = Some(v);
    } else if let Some(v) = value_after("Station Name") {
        header.station = Some(v);
    } else if let Some(v) = value_after("IAGA CODE") {
        header.iaga_code = Some(v);
    } else if let Some(v) = value_after("Data Interval Type") {
        header.interval = Some(v);
    } else if let Some(v) = value_after("Data Type") {
        header.data_type = Some(v);
    }
}

//! Core data model: hourly samples, station headers, gap-filled sections

use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Canonical textual form of a sample timestamp (IAGA-2002 date + time,
/// microsecond precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One hourly observation: a UTC instant and a Dst value in nanotesla,
/// or an explicit missing marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observation instant (UTC)
    pub timestamp: DateTime<Utc>,
    /// Dst value in nT; `None` marks a gap-filled missing hour
    #[serde(rename = "dst_nT")]
    pub dst_nt: Option<f64>,
}

impl Sample {
    /// Create a sample carrying a real observation
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            dst_nt: Some(value),
        }
    }

    /// Create a missing-value marker for an hourly slot
    pub fn missing(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            dst_nt: None,
        }
    }

    /// True if this sample is a gap-filled missing marker
    pub fn is_missing(&self) -> bool {
        self.dst_nt.is_none()
    }
}

/// Metadata recognized from pipe-terminated header lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHeader {
    pub format: Option<String>,
    pub source: Option<String>,
    pub station: Option<String>,
    pub iaga_code: Option<String>,
    pub interval: Option<String>,
    pub data_type: Option<String>,
}

impl SectionHeader {
    /// True if no recognized header field was seen
    pub fn is_empty(&self) -> bool {
        self.format.is_none()
            && self.source.is_none()
            && self.station.is_none()
            && self.iaga_code.is_none()
            && self.interval.is_none()
            && self.data_type.is_none()
    }
}

/// One contiguous run of data lines under one header: station metadata plus
/// a chronologically ordered, gap-filled hourly sample array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub header: SectionHeader,
    pub data: Vec<Sample>,
}

impl Section {
    /// Number of samples (real and missing markers)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the section carries no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of gap-filled missing markers
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|s| s.is_missing()).count()
    }

    /// True if consecutive samples are exactly one hour apart. Holds for any
    /// section parsed from an hourly source; sources with sub-hour or
    /// non-integral steps break the grid and callers can detect that here.
    pub fn is_hourly_dense(&self) -> bool {
        self.data
            .windows(2)
            .all(|w| w[1].timestamp - w[0].timestamp == chrono::Duration::hours(1))
    }

    /// Export the series as a two-column DataFrame (`timestamp`, `dst_nT`)
    /// for DataFrame-based consumers. Missing markers become nulls.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let timestamps: Vec<String> = self
            .data
            .iter()
            .map(|s| s.timestamp.format(TIMESTAMP_FORMAT).to_string())
            .collect();
        let values: Vec<Option<f64>> = self.data.iter().map(|s| s.dst_nt).collect();

        let df = df!(
            "timestamp" => timestamps,
            "dst_nT" => values,
        )?;
        Ok(df)
    }
}

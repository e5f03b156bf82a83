//! IAGA-2002-style record ingestion
//!
//! Turns a stream of raw text lines into per-station [`Section`]s:
//!
//! - pipe-terminated header lines fill the station metadata
//! - data lines become hourly [`Sample`]s, with every skipped hourly slot
//!   materialized as an explicit missing marker
//! - sections stream lazily, one at a time
//!
//! [`Section`]: crate::series::Section
//! [`Sample`]: crate::series::Sample

mod line;
mod sections;

pub use line::{classify_line, parse_header_field, LineKind};
pub use sections::{load_sections, read_sections, Sections};

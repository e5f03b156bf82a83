//! Dst Pipeline - Hourly geomagnetic index ingestion and windowing
//!
//! This crate turns IAGA-2002-style Dst record files into model-ready
//! sliding windows:
//! - Streaming ingestion of header/data sections with hourly gap fill
//! - Explicit missing-value markers instead of sentinel floats
//! - Cyclical time encodings (hour, day of year, solar rotation)
//! - Staggered input/prediction window pairs for sequence forecasting
//!
//! # Modules
//!
//! - [`ingest`] - Line classification, header parsing, streaming sections
//! - [`series`] - Samples, section headers, sections
//! - [`window`] - Time encodings and window pair extraction
//! - [`error`] - Crate-wide error type and result alias

// Core error handling
pub mod error;

// Data model
pub mod series;

// Record ingestion
pub mod ingest;

// Window extraction
pub mod window;

pub use error::{DstError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{DstError, Result};

    // Data model
    pub use crate::series::{Sample, Section, SectionHeader, TIMESTAMP_FORMAT};

    // Ingestion
    pub use crate::ingest::{load_sections, read_sections, LineKind, Sections};

    // Windowing
    pub use crate::window::{
        encode_timestamps, TrainingPair, Window, WindowBuilder, WindowConfig, TIME_ENC_COLS,
    };
}

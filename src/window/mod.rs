//! Sliding-window feature extraction
//!
//! - cyclical time encodings for the hour, day-of-year, and solar-rotation
//!   cycles
//! - staggered input/prediction window pairs with strict boundary checks

mod builder;
mod encoding;

pub use builder::{TrainingPair, Window, WindowBuilder, WindowConfig};
pub use encoding::{
    encode_day_of_year, encode_hour, encode_solar_rotation, encode_timestamps,
    SOLAR_ROTATION_DAYS, TIME_ENC_COLS,
};

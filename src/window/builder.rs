//! Sliding input/prediction window extraction over a parsed section

use std::ops::Range;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DstError, Result};
use crate::series::Section;
use crate::window::encoding::encode_timestamps;

/// Window geometry: `size` lookback samples per input window and `pred`
/// forecast steps, which is also the number of staggered input windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Samples per input window
    pub size: usize,
    /// Forecast horizon in samples
    pub pred: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { size: 64, pred: 6 }
    }
}

impl WindowConfig {
    pub fn new(size: usize, pred: usize) -> Self {
        Self {
            size: size.max(1),
            pred: pred.max(1),
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size.max(1);
        self
    }

    pub fn with_pred(mut self, pred: usize) -> Self {
        self.pred = pred.max(1);
        self
    }

    /// Length of the combined lookback plus prediction buffer
    pub fn span(&self) -> usize {
        self.size + self.pred
    }
}

/// One contiguous run of samples, split into values and time encodings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Dst values in nT; `None` where the hourly slot was gap-filled
    #[serde(rename = "dst_nT")]
    pub dst_nt: Vec<Option<f64>>,
    /// Cyclical time encodings, one [`TIME_ENC_COLS`] row per sample
    ///
    /// [`TIME_ENC_COLS`]: crate::window::TIME_ENC_COLS
    pub time_enc: Array2<f64>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.dst_nt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dst_nt.is_empty()
    }
}

/// Aligned inputs and ground truth for one training example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPair {
    /// `pred` staggered input windows, each `size` samples long
    pub inputs: Vec<Window>,
    /// The `pred` samples immediately following the combined input region
    pub truths: Window,
}

/// Extracts aligned window pairs from an immutable section.
///
/// An index always denotes the absolute position in `section.data` of the
/// first sample of the combined buffer `data[index .. index + size + pred]`.
/// Input window `i` covers `data[index + i .. index + i + size]`, so the
/// `pred` windows are one-sample-shifted snapshots leading up to the
/// forecast origin.
#[derive(Debug, Clone, Default)]
pub struct WindowBuilder {
    config: WindowConfig,
}

impl WindowBuilder {
    pub fn new(config: WindowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    fn check_bounds(&self, op: &'static str, section: &Section, index: usize, span: usize) -> Result<()> {
        let available = section.len();
        let required = match index.checked_add(span) {
            Some(required) if required <= available => return Ok(()),
            Some(required) => required,
            None => usize::MAX,
        };
        Err(DstError::BoundaryError {
            op,
            index,
            required,
            available,
        })
    }

    /// Copy out `data[start .. start + len]` as a window
    fn window_at(&self, section: &Section, start: usize, len: usize) -> Window {
        let slice = &section.data[start..start + len];
        let timestamps: Vec<DateTime<Utc>> = slice.iter().map(|s| s.timestamp).collect();
        Window {
            dst_nt: slice.iter().map(|s| s.dst_nt).collect(),
            time_enc: encode_timestamps(&timestamps),
        }
    }

    /// Extract the `pred` staggered input windows anchored at `index`.
    ///
    /// Fails with a boundary error when `index + size + pred` exceeds the
    /// section length.
    pub fn predict_windows(&self, section: &Section, index: usize) -> Result<Vec<Window>> {
        self.check_bounds("predict_windows", section, index, self.config.span())?;
        let windows = (0..self.config.pred)
            .map(|i| self.window_at(section, index + i, self.config.size))
            .collect();
        Ok(windows)
    }

    /// Extract one training example: the staggered input windows plus the
    /// `pred` ground-truth samples immediately after the combined input
    /// region.
    ///
    /// Requires `index + size + 2 * pred` samples, so the last valid
    /// training index sits `pred` samples before the last valid prediction
    /// index.
    pub fn training_pair(&self, section: &Section, index: usize) -> Result<TrainingPair> {
        let WindowConfig { size, pred } = self.config;
        self.check_bounds("training_pair", section, index, size + 2 * pred)?;
        Ok(TrainingPair {
            inputs: self.predict_windows(section, index)?,
            truths: self.window_at(section, index + size + pred, pred),
        })
    }

    /// Every valid training index for the section, empty when the section
    /// is too short for a single pair
    pub fn training_range(&self, section: &Section) -> Range<usize> {
        let WindowConfig { size, pred } = self.config;
        let needed = size + 2 * pred;
        if section.len() < needed {
            return 0..0;
        }
        0..section.len() - needed + 1
    }

    /// Extract a training pair at every `stride`-th valid index, in index
    /// order. Pairs are independent, so extraction fans out across threads.
    pub fn training_set(&self, section: &Section, stride: usize) -> Result<Vec<TrainingPair>> {
        let stride = stride.max(1);
        let indices: Vec<usize> = self.training_range(section).step_by(stride).collect();
        indices
            .into_par_iter()
            .map(|index| self.training_pair(section, index))
            .collect()
    }
}

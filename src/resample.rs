//! Time-base reconciliation
//!
//! Channels in a BPLT file are clocked independently. The channel with the
//! most samples supplies the time axis; every shorter channel is linearly
//! interpolated onto it, extending its first or last segment outside its own
//! observed range.

use crate::error::{BpltError, Result};
use crate::types::{ChannelSeries, ChannelSet, Column, ColumnValues, MergedTable};
use log::debug;
use rayon::prelude::*;

/// Index of the channel with the most samples, first one winning ties
pub fn select_reference(channels: &[ChannelSeries]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, channel) in channels.iter().enumerate() {
        match best {
            Some(b) if channels[b].len() >= channel.len() => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Piecewise-linear interpolator over one channel's samples
pub struct LinearInterpolator {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl LinearInterpolator {
    /// Build from parallel time/value slices; samples are sorted by time.
    /// Returns `None` for an empty channel.
    pub fn new(times: &[f64], values: &[f32]) -> Option<Self> {
        let len = times.len().min(values.len());
        if len == 0 {
            return None;
        }

        let mut order: Vec<usize> = (0..len).collect();
        order.sort_by(|&a, &b| times[a].total_cmp(&times[b]));

        Some(Self {
            times: order.iter().map(|&i| times[i]).collect(),
            values: order.iter().map(|&i| values[i] as f64).collect(),
        })
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let n = self.times.len();
        if n == 1 {
            return self.values[0];
        }

        // First knot not less than t
        let idx = self.times.partition_point(|&x| x < t);
        if idx < n && self.times[idx] == t {
            return self.values[idx];
        }

        // Outside the observed range the boundary segment is extended
        let hi = idx.clamp(1, n - 1);
        let lo = hi - 1;
        let (x0, x1) = (self.times[lo], self.times[hi]);
        let (y0, y1) = (self.values[lo], self.values[hi]);

        if x1 == x0 {
            return y0;
        }
        y0 + (y1 - y0) * (t - x0) / (x1 - x0)
    }

    /// Evaluate at every point of `axis`
    pub fn resample(&self, axis: &[f64]) -> Vec<f64> {
        axis.iter().map(|&t| self.evaluate(t)).collect()
    }
}

/// Merge decoded channels onto the reference channel's time axis.
///
/// Channels as long as the reference are copied verbatim; the rest are
/// resampled in parallel. Column order follows the input order.
pub fn reconcile(set: &ChannelSet) -> Result<MergedTable> {
    let reference_index = select_reference(&set.channels).ok_or(BpltError::EmptyChannelSet)?;
    let reference = &set.channels[reference_index];
    let axis = &reference.times;
    let max_samples = reference.len();
    debug!(
        "Reference channel: {} ({} samples)",
        reference.name, max_samples
    );

    let columns: Vec<Column> = set
        .channels
        .par_iter()
        .map(|channel| {
            let values = if channel.len() == max_samples {
                ColumnValues::Recorded(channel.values.clone())
            } else {
                // Non-empty by construction of the channel decoder
                match LinearInterpolator::new(&channel.times, &channel.values) {
                    Some(interp) => ColumnValues::Resampled(interp.resample(axis)),
                    None => ColumnValues::Resampled(vec![f64::NAN; max_samples]),
                }
            };
            Column {
                name: channel.name.clone(),
                values,
            }
        })
        .collect();

    let resampled = columns.iter().filter(|c| c.values.is_resampled()).count();
    debug!(
        "Merged {} channels ({} resampled) onto {} time points",
        columns.len(),
        resampled,
        max_samples
    );

    Ok(MergedTable {
        reference_channel: reference.name.clone(),
        time: axis.clone(),
        columns,
    })
}

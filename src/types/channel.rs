use std::fmt;

/// One decoded channel: parallel time and value sequences
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSeries {
    pub name: String,
    pub times: Vec<f64>,
    pub values: Vec<f32>,
}

impl ChannelSeries {
    pub fn new(name: impl Into<String>, times: Vec<f64>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            times,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Why a channel block was left out of the decoded set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingCount,
    ZeroElements,
    IncompleteTimes,
    IncompleteValues,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCount => write!(f, "missing count bytes"),
            SkipReason::ZeroElements => write!(f, "zero elements"),
            SkipReason::IncompleteTimes => write!(f, "incomplete time data"),
            SkipReason::IncompleteValues => write!(f, "incomplete value data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChannel {
    pub name: String,
    pub reason: SkipReason,
}

/// Decoded channels in first-seen order, plus the ones that were skipped
#[derive(Debug, Clone, Default)]
pub struct ChannelSet {
    pub channels: Vec<ChannelSeries>,
    pub skipped: Vec<SkippedChannel>,
}

impl ChannelSet {
    /// Insert with mapping semantics: a repeated name replaces the earlier
    /// series but keeps its position.
    pub fn insert(&mut self, series: ChannelSeries) {
        match self.channels.iter_mut().find(|c| c.name == series.name) {
            Some(existing) => *existing = series,
            None => self.channels.push(series),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ChannelSeries> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Column storage; reference-length channels keep their recorded precision
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Recorded(Vec<f32>),
    Resampled(Vec<f64>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Recorded(v) => v.len(),
            ColumnValues::Resampled(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, row: usize) -> Option<f64> {
        match self {
            ColumnValues::Recorded(v) => v.get(row).map(|&x| x as f64),
            ColumnValues::Resampled(v) => v.get(row).copied(),
        }
    }

    pub fn is_resampled(&self) -> bool {
        matches!(self, ColumnValues::Resampled(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValues,
}

/// Rectangular table on a shared time axis
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub reference_channel: String,
    pub time: Vec<f64>,
    pub columns: Vec<Column>,
}

impl MergedTable {
    pub fn row_count(&self) -> usize {
        self.time.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

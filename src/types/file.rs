use crate::types::{ChannelSet, FileHeader};

/// Decoded BPLT file: header plus channel data
#[derive(Debug, Clone)]
pub struct BpltFile {
    pub header: FileHeader,
    pub channels: ChannelSet,
}

impl BpltFile {
    /// Nominal duration in seconds implied by the declared shape
    pub fn nominal_duration_seconds(&self) -> f64 {
        self.header.row_count as f64 * self.header.time_delta
    }

    /// Names from the header that produced no series
    pub fn missing_channels(&self) -> Vec<&str> {
        self.header
            .channel_names
            .iter()
            .filter(|name| self.channels.get(name).is_none())
            .map(|name| name.as_str())
            .collect()
    }
}

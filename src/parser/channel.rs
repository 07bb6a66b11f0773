use crate::error::{BpltError, Result};
use crate::parser::stream::BpltDataStream;
use crate::types::{ChannelSeries, ChannelSet, SkipReason, SkippedChannel};
use log::{debug, warn};

/// Read one channel block: u32 count, count x f64 times, count x f32 values
pub fn read_channel_block(
    stream: &mut BpltDataStream,
    name: &str,
) -> std::result::Result<ChannelSeries, SkipReason> {
    let count = stream.read_u32().ok_or(SkipReason::MissingCount)? as usize;
    if count == 0 {
        return Err(SkipReason::ZeroElements);
    }

    let times = stream
        .read_f64_array(count)
        .ok_or(SkipReason::IncompleteTimes)?;
    let values = stream
        .read_f32_array(count)
        .ok_or(SkipReason::IncompleteValues)?;

    Ok(ChannelSeries::new(name, times, values))
}

/// Decode the data section for every channel name, in order.
///
/// Unreadable or empty blocks are skipped; only a result with no channels
/// at all is an error.
pub fn decode_channels(stream: &mut BpltDataStream, channel_names: &[String]) -> Result<ChannelSet> {
    let mut set = ChannelSet::default();

    for name in channel_names {
        match read_channel_block(stream, name) {
            Ok(series) => {
                debug!("Channel {name}: {} samples", series.len());
                set.insert(series);
            }
            Err(reason) => {
                warn!("Skipping channel {name}: {reason}");
                set.skipped.push(SkippedChannel {
                    name: name.clone(),
                    reason,
                });
            }
        }
    }

    if set.is_empty() {
        return Err(BpltError::EmptyChannelSet);
    }

    Ok(set)
}

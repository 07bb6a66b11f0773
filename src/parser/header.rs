//! Header decoding for BPLT files
//!
//! The header is a fixed preamble (identifier, version, comments, declared
//! shape, time delta), the channel-name table, and an optional metadata block
//! with plot properties and markers. Only the preamble is required; the
//! metadata block is decoded best-effort and never fails the header.

use crate::error::{BpltError, Result};
use crate::parser::stream::BpltDataStream;
use crate::types::{
    ExtendedMetadata, FileHeader, HeaderFormat, Marker, PartialRecords, PlotProperty,
    FILE_IDENTIFIER_PREFIX, VERSION_PREFIX,
};
use log::{debug, warn};
use semver::Version;

/// Version assumed when the version number cannot be parsed
pub const FALLBACK_VERSION: Version = Version::new(1, 0, 0);

/// Parse `X.Y.Z` out of a string like "ECI Binary Plot File Version 4.2.0".
///
/// Anything other than three dot-separated integers falls back to `1.0.0`.
pub fn parse_version(version_string: &str) -> Version {
    let number = version_string.replace(VERSION_PREFIX, "");
    let parts: Vec<&str> = number.trim().split('.').collect();
    if parts.len() != 3 {
        return FALLBACK_VERSION;
    }

    let parsed: std::result::Result<Vec<u64>, _> =
        parts.iter().map(|p| p.trim().parse::<u64>()).collect();
    match parsed.as_deref() {
        Ok([major, minor, patch]) => Version::new(*major, *minor, *patch),
        _ => FALLBACK_VERSION,
    }
}

/// Names that mark an unused channel slot
pub fn is_placeholder_name(name: &str) -> bool {
    name.is_empty() || name.eq_ignore_ascii_case("NULL")
}

/// Read one channel name using the layout's termination rule
pub fn read_channel_name(stream: &mut BpltDataStream, format: HeaderFormat) -> String {
    if format.has_name_placeholder() {
        stream.skip_past_null();
    }
    stream.read_until_null()
}

/// Decode the full header from a stream positioned at offset 0
pub fn decode_header(stream: &mut BpltDataStream) -> Result<FileHeader> {
    let file_identifier = stream.read_until_null();
    debug!("File identifier: {file_identifier}");
    if !file_identifier.starts_with(FILE_IDENTIFIER_PREFIX) {
        return Err(BpltError::malformed_header(format!(
            "Invalid file identifier: {file_identifier:?}"
        )));
    }

    let version_string = stream.read_until_null();
    debug!("Version string: {version_string}");
    if !version_string.starts_with(VERSION_PREFIX) {
        return Err(BpltError::malformed_header(format!(
            "Invalid version string: {version_string:?}"
        )));
    }

    let version = parse_version(&version_string);
    let format = HeaderFormat::from_version(&version);
    debug!("Parsed version: {version} ({format:?})");

    let comments = stream.read_until_null();
    debug!("Comments: {comments}");

    let available = stream.remaining();
    let counts = stream.take(8).ok_or(BpltError::TruncatedStream {
        field: "column and row counts",
        needed: 8,
        available,
    })?;
    let column_count = u32::from_le_bytes([counts[0], counts[1], counts[2], counts[3]]);
    let row_count = u32::from_le_bytes([counts[4], counts[5], counts[6], counts[7]]);
    debug!("Columns: {column_count}, Rows: {row_count}");

    let time_delta = stream.expect_f64("time delta")?;
    debug!("Time delta: {time_delta}");

    let mut channel_names = Vec::new();
    for _ in 0..column_count {
        // Past the end every name reads as empty and would be discarded
        if stream.at_end() {
            break;
        }
        let name = read_channel_name(stream, format);
        if !is_placeholder_name(&name) {
            channel_names.push(name);
        }
    }
    debug!(
        "Channel names: {} of {} declared",
        channel_names.len(),
        column_count
    );

    let metadata = read_extended_metadata(stream, format);
    let header_position = stream.pos;
    debug!("Header ends at byte {header_position}");

    Ok(FileHeader {
        file_identifier,
        version_string,
        version,
        format,
        comments,
        column_count,
        row_count,
        time_delta,
        channel_names,
        metadata,
        header_position,
    })
}

/// Decode the optional metadata block, keeping whatever could be read
pub fn read_extended_metadata(stream: &mut BpltDataStream, format: HeaderFormat) -> ExtendedMetadata {
    let mut meta = ExtendedMetadata::default();

    let Some(count) = stream.read_u32() else {
        meta.truncated = true;
        return meta;
    };
    meta.plot_properties_count = count;

    match stream.read_f64() {
        Some(v) => meta.lead_double_1 = v,
        None => meta.truncated = true,
    }
    match stream.read_u8() {
        Some(v) => meta.lead_byte = v,
        None => meta.truncated = true,
    }
    match stream.read_f64() {
        Some(v) => meta.lead_double_2 = v,
        None => meta.truncated = true,
    }
    match stream.read_u32() {
        Some(v) => meta.lead_integer = v,
        None => meta.truncated = true,
    }

    meta.plot_properties = read_records(stream, count, "plot property", |s| {
        read_plot_property(s, format)
    });

    let Some(marker_count) = stream.read_u32() else {
        meta.truncated = true;
        return meta;
    };
    meta.markers = read_records(stream, marker_count, "marker", read_marker);

    match stream.take(8) {
        Some(b) => {
            meta.trailing_integers = (
                u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
                u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            );
        }
        None => meta.truncated = true,
    }

    if meta.truncated || !meta.plot_properties.is_complete() || !meta.markers.is_complete() {
        warn!(
            "Header metadata incomplete: {}/{} plot properties, {}/{} markers",
            meta.plot_properties.records.len(),
            meta.plot_properties.declared,
            meta.markers.records.len(),
            meta.markers.declared
        );
    }

    meta
}

/// Decode up to `declared` records, stopping at the first failure
fn read_records<T, F>(
    stream: &mut BpltDataStream,
    declared: u32,
    kind: &str,
    mut read: F,
) -> PartialRecords<T>
where
    F: FnMut(&mut BpltDataStream) -> std::result::Result<T, String>,
{
    let mut batch = PartialRecords::new(declared);
    for idx in 0..declared {
        match read(stream) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                warn!("Failed to read {kind} {idx}: {reason}");
                batch.failure = Some(reason);
                break;
            }
        }
    }
    batch
}

/// Read one plot property record with the layout's field rule
pub fn read_plot_property(
    stream: &mut BpltDataStream,
    format: HeaderFormat,
) -> std::result::Result<PlotProperty, String> {
    let name = stream.read_until_null();
    let secondary_name = if format.plot_property_names() > 1 {
        Some(stream.read_until_null())
    } else {
        None
    };

    let available = stream.remaining();
    let int_bytes = stream.take(20).ok_or_else(|| {
        format!("incomplete plot property integers: got {available} bytes")
    })?;
    let mut integers = [0u32; 5];
    for (slot, chunk) in integers.iter_mut().zip(int_bytes.chunks_exact(4)) {
        *slot = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    let doubles = if format.plot_property_has_doubles() {
        match stream.take(16) {
            Some(b) => (
                f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
                f64::from_le_bytes([b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]]),
            ),
            None => (0.0, 0.0),
        }
    } else {
        (0.0, 0.0)
    };

    Ok(PlotProperty {
        name,
        secondary_name,
        integers,
        doubles,
    })
}

/// Read one marker record
pub fn read_marker(stream: &mut BpltDataStream) -> std::result::Result<Marker, String> {
    let available = stream.remaining();
    let position = stream
        .read_f64()
        .ok_or_else(|| format!("incomplete marker position: got {available} bytes"))?;
    let labels = [
        stream.read_until_null(),
        stream.read_until_null(),
        stream.read_until_null(),
    ];
    Ok(Marker { position, labels })
}

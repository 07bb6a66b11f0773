//! BPLT conversion pipeline
//!
//! Header decode, size guard, channel decode, then time-base reconciliation.
//! The size guard runs on the declared shape before any channel bytes are
//! touched, so oversized files fail without the expensive read.

use crate::error::{BpltError, Result};
use crate::parser::{
    open_bplt_file, read_channel_data, read_channel_section, read_header_bytes, read_header_from,
};
use crate::resample::reconcile;
use crate::types::{ChannelSet, FileHeader, MergedTable, SkippedChannel};
use log::info;
use std::io::{Read, Seek};
use std::path::Path;

/// Default cell limit for the size guard
pub const DEFAULT_MAX_CELLS: i64 = 5_000_000;

/// Options for a single conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Upper bound on declared `columns x rows`; zero or negative disables it
    pub max_cells: i64,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl ConversionOptions {
    pub fn unlimited() -> Self {
        Self { max_cells: 0 }
    }

    pub fn with_max_cells(max_cells: i64) -> Self {
        Self { max_cells }
    }
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub header: FileHeader,
    pub table: MergedTable,
    pub skipped: Vec<SkippedChannel>,
}

/// Reject headers whose declared shape exceeds the configured limit
pub fn check_size_limit(header: &FileHeader, options: &ConversionOptions) -> Result<()> {
    let cells = header.estimated_cells();
    if options.max_cells > 0 && cells > options.max_cells as u64 {
        return Err(BpltError::SizeLimitExceeded {
            rows: header.row_count,
            columns: header.column_count,
            cells,
            limit: options.max_cells,
        });
    }
    Ok(())
}

fn merge_channels(header: FileHeader, channels: ChannelSet) -> Result<Conversion> {
    let table = reconcile(&channels)?;

    info!(
        "Converted {} of {} channels, {} rows (reference: {})",
        table.columns.len(),
        header.channel_names.len(),
        table.row_count(),
        table.reference_channel
    );

    Ok(Conversion {
        header,
        table,
        skipped: channels.skipped,
    })
}

/// Convert in-memory BPLT data into a merged table
pub fn convert_bplt_bytes(data: &[u8], options: &ConversionOptions) -> Result<Conversion> {
    let header = read_header_bytes(data)?;
    check_size_limit(&header, options)?;

    let channels = read_channel_data(data, &header)?;
    merge_channels(header, channels)
}

/// Convert BPLT data from a seekable reader.
///
/// Only the header prefix is read before the size guard; the channel
/// section is read afterwards, starting at the header position.
pub fn convert_bplt_reader<R: Read + Seek>(
    reader: &mut R,
    options: &ConversionOptions,
) -> Result<Conversion> {
    let header = read_header_from(reader)?;
    check_size_limit(&header, options)?;

    let channels = read_channel_section(reader, &header)?;
    merge_channels(header, channels)
}

/// Convert a BPLT file into a merged table
pub fn convert_bplt_file(input_path: &Path, options: &ConversionOptions) -> Result<Conversion> {
    let mut reader = open_bplt_file(input_path)?;
    convert_bplt_reader(&mut reader, options)
}

/// Convert a BPLT file and write the merged table as CSV
#[cfg(feature = "csv")]
pub fn convert_bplt_to_csv(
    input_path: &Path,
    output_path: &Path,
    options: &ConversionOptions,
) -> Result<Conversion> {
    let conversion = convert_bplt_file(input_path, options)?;
    crate::export::write_table_csv(&conversion.table, output_path)?;
    Ok(conversion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HeaderBuilder;
    use crate::types::ColumnValues;

    /// Reader that records how many bytes were pulled from it
    struct CountingReader<R> {
        inner: R,
        bytes_read: usize,
    }

    impl<R: Read> Read for CountingReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.bytes_read += n;
            Ok(n)
        }
    }

    impl<R: Seek> Seek for CountingReader<R> {
        fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_size_guard_reads_only_header_prefix() {
        let mut bytes = HeaderBuilder::new("4.2.0")
            .channels(&["RPM"])
            .declared_shape(1000, 10000)
            .build();
        let header_len = bytes.len();
        bytes.resize(header_len + 16 * 1024 * 1024, 0);

        let mut reader = CountingReader {
            inner: std::io::Cursor::new(bytes),
            bytes_read: 0,
        };
        let result = convert_bplt_reader(&mut reader, &ConversionOptions::with_max_cells(100));
        assert!(matches!(result, Err(BpltError::SizeLimitExceeded { .. })));
        assert!(
            reader.bytes_read <= crate::parser::HEADER_CHUNK_SIZE,
            "read {} bytes before rejecting",
            reader.bytes_read
        );
    }

    #[test]
    fn test_reader_matches_bytes_conversion() {
        let bytes = HeaderBuilder::new("4.1.0")
            .channels(&["A", "B"])
            .channel_data(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0])
            .channel_data(&[0.0, 2.0], &[10.0, 30.0])
            .build();
        let from_bytes = convert_bplt_bytes(&bytes, &ConversionOptions::default()).unwrap();
        let from_reader = convert_bplt_reader(
            &mut std::io::Cursor::new(&bytes),
            &ConversionOptions::default(),
        )
        .unwrap();
        assert_eq!(from_reader.header, from_bytes.header);
        assert_eq!(from_reader.table, from_bytes.table);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(ConversionOptions::default().max_cells, 5_000_000);
    }

    #[test]
    fn test_size_guard_before_channel_data() {
        // No valid channel data follows; the guard must fire first
        let bytes = HeaderBuilder::new("4.2.0")
            .channels(&["RPM"])
            .declared_shape(1000, 10000)
            .build();
        let result = convert_bplt_bytes(&bytes, &ConversionOptions::with_max_cells(100));
        match result {
            Err(BpltError::SizeLimitExceeded {
                rows,
                columns,
                cells,
                limit,
            }) => {
                assert_eq!(rows, 10000);
                assert_eq!(columns, 1000);
                assert_eq!(cells, 10_000_000);
                assert_eq!(limit, 100);
            }
            other => panic!("expected size limit error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_limit_disables_guard() {
        let bytes = HeaderBuilder::new("4.2.0")
            .channels(&["RPM"])
            .declared_shape(1, 100_000_000)
            .channel_data(&[0.0, 1.0], &[1.0, 2.0])
            .build();
        for limit in [0, -1] {
            let conversion =
                convert_bplt_bytes(&bytes, &ConversionOptions::with_max_cells(limit)).unwrap();
            assert_eq!(conversion.table.row_count(), 2);
        }
        assert!(convert_bplt_bytes(&bytes, &ConversionOptions::default()).is_err());
    }

    #[test]
    fn test_guard_uses_declared_column_count() {
        // Two of three names are placeholders, but all three count
        let bytes = HeaderBuilder::new("4.2.0")
            .channels(&["RPM", "NULL", ""])
            .declared_shape(3, 40)
            .channel_data(&[0.0], &[1.0])
            .build();
        assert!(convert_bplt_bytes(&bytes, &ConversionOptions::with_max_cells(100)).is_err());
        assert!(convert_bplt_bytes(&bytes, &ConversionOptions::with_max_cells(120)).is_ok());
    }

    #[test]
    fn test_end_to_end_merge() {
        let bytes = HeaderBuilder::new("4.2.0")
            .channels(&["A", "B"])
            .declared_shape(2, 3)
            .channel_data(&[0.0, 1.0, 2.0], &[10.0, 20.0, 30.0])
            .channel_data(&[0.0, 2.0], &[100.0, 200.0])
            .build();
        let conversion = convert_bplt_bytes(&bytes, &ConversionOptions::default()).unwrap();
        let table = &conversion.table;

        assert_eq!(table.reference_channel, "A");
        assert_eq!(table.time, vec![0.0, 1.0, 2.0]);
        assert_eq!(
            table.column("B").unwrap().values,
            ColumnValues::Resampled(vec![100.0, 150.0, 200.0])
        );
        assert!(conversion.skipped.is_empty());
    }

    #[test]
    fn test_partial_decode_still_succeeds() {
        let mut cut = 3u32.to_le_bytes().to_vec();
        cut.extend_from_slice(&0.0f64.to_le_bytes());
        let bytes = HeaderBuilder::new("1.1.0")
            .channels(&["A", "B"])
            .channel_data(&[0.0, 1.0], &[1.0, 2.0])
            .raw_data(&cut)
            .build();
        let conversion = convert_bplt_bytes(&bytes, &ConversionOptions::default()).unwrap();
        assert_eq!(conversion.table.columns.len(), 1);
        assert_eq!(conversion.skipped.len(), 1);
        assert_eq!(conversion.skipped[0].name, "B");
    }

    #[test]
    fn test_all_channels_empty() {
        let bytes = HeaderBuilder::new("4.2.0")
            .channels(&["A", "B"])
            .raw_data(&0u32.to_le_bytes())
            .raw_data(&0u32.to_le_bytes())
            .build();
        assert!(matches!(
            convert_bplt_bytes(&bytes, &ConversionOptions::default()),
            Err(BpltError::EmptyChannelSet)
        ));
    }
}

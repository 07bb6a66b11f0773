//! Export functionality for converted BPLT data
//!
//! Writes the merged table to CSV and the decoded header to a `Field,Value`
//! sidecar CSV or, with the `json` feature, to JSON.

use crate::error::Result;
use crate::types::*;
use log::debug;
use std::path::{Path, PathBuf};

/// Format a value as shortest round-trip decimal text; NaN becomes empty
pub fn format_f64(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:?}")
    }
}

/// Same as [`format_f64`] at single precision
pub fn format_f32(value: f32) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{value:?}")
    }
}

/// Format one cell at the column's own precision
pub fn format_cell(values: &ColumnValues, row: usize) -> String {
    match values {
        ColumnValues::Recorded(v) => v.get(row).map(|&x| format_f32(x)).unwrap_or_default(),
        ColumnValues::Resampled(v) => v.get(row).map(|&x| format_f64(x)).unwrap_or_default(),
    }
}

/// Path of the header sidecar for a given CSV output path
pub fn compute_export_paths(output_path: &Path) -> PathBuf {
    let base_name = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bplt");
    let output_dir = output_path.parent().unwrap_or(Path::new("."));
    output_dir.join(format!("{base_name}.headers.csv"))
}

fn ensure_parent_dir(output_path: &Path) -> Result<()> {
    if let Some(dir) = output_path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            debug!("Created output directory: {dir:?}");
        }
    }
    Ok(())
}

/// Write the merged table: `Time,<channels...>` then one row per time point
#[cfg(feature = "csv")]
pub fn write_table_csv(table: &MergedTable, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let mut writer = csv::Writer::from_path(output_path)?;

    let mut header = Vec::with_capacity(table.columns.len() + 1);
    header.push("Time".to_string());
    header.extend(table.column_names().map(str::to_string));
    writer.write_record(&header)?;

    let mut record = Vec::with_capacity(header.len());
    for (row, &time) in table.time.iter().enumerate() {
        record.clear();
        record.push(format_f64(time));
        for column in &table.columns {
            record.push(format_cell(&column.values, row));
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    debug!(
        "Wrote {} rows x {} columns to {:?}",
        table.row_count(),
        header.len(),
        output_path
    );
    Ok(())
}

/// Field/value pairs describing a decoded header
pub fn header_fields(header: &FileHeader) -> Vec<(String, String)> {
    let meta = &header.metadata;
    let mut fields = vec![
        ("File identifier".to_string(), header.file_identifier.clone()),
        ("Version".to_string(), header.version_string.clone()),
        ("Parsed version".to_string(), header.version.to_string()),
        ("Layout".to_string(), format!("{:?}", header.format)),
        ("Comments".to_string(), header.comments.clone()),
        ("Columns".to_string(), header.column_count.to_string()),
        ("Rows".to_string(), header.row_count.to_string()),
        ("Time delta".to_string(), format_f64(header.time_delta)),
        ("Header position".to_string(), header.header_position.to_string()),
    ];

    for (i, name) in header.channel_names.iter().enumerate() {
        fields.push((format!("Channel {}", i + 1), name.clone()));
    }

    fields.push((
        "Plot properties".to_string(),
        format!(
            "{}/{}",
            meta.plot_properties.records.len(),
            meta.plot_properties.declared
        ),
    ));
    fields.push((
        "Markers".to_string(),
        format!("{}/{}", meta.markers.records.len(), meta.markers.declared),
    ));
    for marker in &meta.markers.records {
        fields.push((
            format!("Marker {}", format_f64(marker.position)),
            marker
                .labels
                .iter()
                .filter(|l| !l.is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(" | "),
        ));
    }
    fields
}

/// Export decoded header fields to a `Field,Value` CSV
#[cfg(feature = "csv")]
pub fn export_header_to_csv(header: &FileHeader, output_path: &Path) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["Field", "Value"])?;
    for (field, value) in header_fields(header) {
        writer.write_record([field, value])?;
    }
    writer.flush()?;
    Ok(())
}

/// Export the decoded header, including metadata records, as JSON
#[cfg(feature = "json")]
pub fn export_header_to_json(header: &FileHeader, output_path: &Path) -> Result<()> {
    use std::fs::File;
    use std::io::{BufWriter, Write};

    ensure_parent_dir(output_path)?;
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, header)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_f64(1.0), "1.0");
        assert_eq!(format_f64(0.1), "0.1");
        assert_eq!(format_f64(-150.25), "-150.25");
        assert_eq!(format_f64(f64::NAN), "");
        assert_eq!(format_f32(0.1), "0.1");
        assert_eq!(format_f32(900.0), "900.0");
    }

    #[test]
    fn test_format_cell_precision() {
        let recorded = ColumnValues::Recorded(vec![0.1]);
        let resampled = ColumnValues::Resampled(vec![0.1f32 as f64]);
        assert_eq!(format_cell(&recorded, 0), "0.1");
        assert_eq!(format_cell(&resampled, 0), "0.10000000149011612");
        assert_eq!(format_cell(&recorded, 5), "");
    }

    #[test]
    fn test_compute_export_paths() {
        let path = compute_export_paths(Path::new("/tmp/out/run42.csv"));
        assert_eq!(path, PathBuf::from("/tmp/out/run42.headers.csv"));
    }
}

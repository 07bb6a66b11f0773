//! BPLT Converter Library
//!
//! A Rust library for decoding ECI Binary Plot Data (BPLT) telemetry captures
//! and merging their independently sampled channels into one table.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export functionality
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable header export in JSON format
//! - **`serde`**: Enable serialization of header types
//!
//! # Quick Start
//!
//! Decode a file and inspect its channels:
//! ```rust,no_run
//! use bplt_converter::read_bplt_file;
//! use std::path::Path;
//!
//! let file = read_bplt_file(Path::new("capture.bplt")).unwrap();
//! println!("Version {}", file.header.version);
//! for channel in &file.channels.channels {
//!     println!("{}: {} samples", channel.name, channel.len());
//! }
//! ```
//!
//! Convert to CSV with the default size guard:
//! ```rust,no_run
//! use bplt_converter::{convert_bplt_to_csv, ConversionOptions};
//! use std::path::Path;
//!
//! let conversion = convert_bplt_to_csv(
//!     Path::new("capture.bplt"),
//!     Path::new("capture.csv"),
//!     &ConversionOptions::default(),
//! )
//! .unwrap();
//! println!("Reference channel: {}", conversion.table.reference_channel);
//! ```
//!
//! # Public API
//!
//! ## Decoding Functions
//! - [`read_bplt_file`] / [`read_bplt_bytes`] - Decode header and channel data
//! - [`read_header_file`] / [`read_header_bytes`] - Decode the header only
//! - [`decode_header`] / [`decode_channels`] - Low-level stream API
//!
//! ## Conversion
//! - [`convert_bplt_bytes`] / [`convert_bplt_file`] - Decode, guard and merge
//! - [`convert_bplt_to_csv`] - Full conversion to a CSV file
//! - [`reconcile`] - Merge decoded channels onto the reference time axis
//!
//! ## Export Functions
//! - [`write_table_csv`] - Write a merged table
//! - [`export_header_to_csv`] - Write decoded header fields
//! - `export_header_to_json` - Header as JSON (`json` feature)

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod resample;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use resample::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;

use semver::Version;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Prefix every BPLT file identifier starts with
pub const FILE_IDENTIFIER_PREFIX: &str = "ECI Binary Plot Data File";

/// Prefix of the version string; the version number follows it
pub const VERSION_PREFIX: &str = "ECI Binary Plot File Version";

/// Header layout family, selected once from the parsed version.
///
/// The layouts differ in how channel names are terminated and in the shape
/// of each plot property record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum HeaderFormat {
    /// `1.1.x`: single-NUL channel names, one-name plot properties
    Legacy11,
    /// `4.1.x`: plot properties carry no float pair
    NoDoubles41,
    /// Every other version
    Standard,
}

impl HeaderFormat {
    pub fn from_version(version: &Version) -> Self {
        match (version.major, version.minor) {
            (1, 1) => HeaderFormat::Legacy11,
            (4, 1) => HeaderFormat::NoDoubles41,
            _ => HeaderFormat::Standard,
        }
    }

    /// Channel names are preceded by an empty placeholder field
    pub fn has_name_placeholder(self) -> bool {
        !matches!(self, HeaderFormat::Legacy11)
    }

    /// Number of name strings at the start of a plot property record
    pub fn plot_property_names(self) -> usize {
        match self {
            HeaderFormat::Legacy11 => 1,
            _ => 2,
        }
    }

    /// Plot property records end with two float64 values
    pub fn plot_property_has_doubles(self) -> bool {
        !matches!(self, HeaderFormat::NoDoubles41)
    }
}

/// Descriptive plot settings for one channel
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PlotProperty {
    pub name: String,
    /// Absent in the `1.1.x` layout
    pub secondary_name: Option<String>,
    pub integers: [u32; 5],
    /// `(0.0, 0.0)` in the `4.1.x` layout
    pub doubles: (f64, f64),
}

/// Annotated point on the plot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Marker {
    pub position: f64,
    pub labels: [String; 3],
}

/// Outcome of a best-effort run of records.
///
/// Records are decoded until the first failure; `declared` keeps the count
/// the file announced so skipped records are never lost silently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PartialRecords<T> {
    pub declared: u32,
    pub records: Vec<T>,
    pub failure: Option<String>,
}

impl<T> PartialRecords<T> {
    pub fn new(declared: u32) -> Self {
        Self {
            declared,
            records: Vec::new(),
            failure: None,
        }
    }

    /// Records declared but not decoded
    pub fn skipped(&self) -> usize {
        (self.declared as usize).saturating_sub(self.records.len())
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.skipped() == 0
    }
}

impl<T> Default for PartialRecords<T> {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Optional metadata between the channel-name table and the channel data.
///
/// Fields the stream is too short for keep their zero defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ExtendedMetadata {
    pub plot_properties_count: u32,
    pub lead_double_1: f64,
    pub lead_byte: u8,
    pub lead_double_2: f64,
    pub lead_integer: u32,
    pub plot_properties: PartialRecords<PlotProperty>,
    pub markers: PartialRecords<Marker>,
    pub trailing_integers: (u32, u32),
    /// Set when the block ended before all of its fields were present
    pub truncated: bool,
}

/// Decoded BPLT file header
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FileHeader {
    pub file_identifier: String,
    pub version_string: String,
    pub version: Version,
    pub format: HeaderFormat,
    pub comments: String,
    /// Declared column count, before empty names are filtered
    pub column_count: u32,
    /// Declared row count
    pub row_count: u32,
    /// Seconds between nominal samples
    pub time_delta: f64,
    pub channel_names: Vec<String>,
    pub metadata: ExtendedMetadata,
    /// Byte offset where per-channel data begins
    pub header_position: usize,
}

impl FileHeader {
    /// Cell count implied by the declared shape
    pub fn estimated_cells(&self) -> u64 {
        self.column_count as u64 * self.row_count as u64
    }

    pub fn version_tuple(&self) -> (u64, u64, u64) {
        (self.version.major, self.version.minor, self.version.patch)
    }
}

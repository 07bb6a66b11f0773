//! Synthetic BPLT file builder for unit tests

pub struct HeaderBuilder {
    version_string: String,
    legacy: bool,
    no_doubles: bool,
    comments: String,
    columns: Option<u32>,
    rows: u32,
    time_delta: f64,
    names: Vec<String>,
    metadata: bool,
    properties: Vec<(String, String, [u32; 5], (f64, f64))>,
    markers: Vec<(f64, [String; 3])>,
    trailing: (u32, u32),
    data: Vec<u8>,
}

impl HeaderBuilder {
    pub fn new(version: &str) -> Self {
        let mut builder =
            Self::with_version_string(&format!("ECI Binary Plot File Version {version}"));
        builder.legacy = version.starts_with("1.1.");
        builder.no_doubles = version.starts_with("4.1.");
        builder
    }

    pub fn with_version_string(version_string: &str) -> Self {
        Self {
            version_string: version_string.to_string(),
            legacy: false,
            no_doubles: false,
            comments: String::new(),
            columns: None,
            rows: 0,
            time_delta: 0.01,
            names: Vec::new(),
            metadata: true,
            properties: Vec::new(),
            markers: Vec::new(),
            trailing: (0, 0),
            data: Vec::new(),
        }
    }

    pub fn comments(mut self, comments: &str) -> Self {
        self.comments = comments.to_string();
        self
    }

    pub fn channels(mut self, names: &[&str]) -> Self {
        self.names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Override the declared column count written to the header
    pub fn declared_shape(mut self, columns: u32, rows: u32) -> Self {
        self.columns = Some(columns);
        self.rows = rows;
        self
    }

    pub fn without_metadata(mut self) -> Self {
        self.metadata = false;
        self
    }

    pub fn plot_property(self, name: &str, unit: &str) -> Self {
        self.plot_property_with(name, unit, [0; 5], (0.0, 0.0))
    }

    pub fn plot_property_with(
        mut self,
        name: &str,
        unit: &str,
        integers: [u32; 5],
        doubles: (f64, f64),
    ) -> Self {
        self.properties
            .push((name.to_string(), unit.to_string(), integers, doubles));
        self
    }

    pub fn marker(mut self, position: f64, labels: [&str; 3]) -> Self {
        self.markers
            .push((position, labels.map(|l| l.to_string())));
        self
    }

    pub fn trailing(mut self, a: u32, b: u32) -> Self {
        self.trailing = (a, b);
        self
    }

    pub fn channel_data(mut self, times: &[f64], values: &[f32]) -> Self {
        self.data
            .extend_from_slice(&(times.len() as u32).to_le_bytes());
        for t in times {
            self.data.extend_from_slice(&t.to_le_bytes());
        }
        for v in values {
            self.data.extend_from_slice(&v.to_le_bytes());
        }
        self
    }

    pub fn raw_data(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    /// Header bytes only
    pub fn build_header(&self) -> Vec<u8> {
        let mut out = Vec::new();
        push_str(&mut out, "ECI Binary Plot Data File");
        push_str(&mut out, &self.version_string);
        push_str(&mut out, &self.comments);
        let columns = self.columns.unwrap_or(self.names.len() as u32);
        out.extend_from_slice(&columns.to_le_bytes());
        out.extend_from_slice(&self.rows.to_le_bytes());
        out.extend_from_slice(&self.time_delta.to_le_bytes());

        for name in &self.names {
            if !self.legacy {
                out.push(0);
            }
            push_str(&mut out, name);
        }

        if !self.metadata {
            return out;
        }

        out.extend_from_slice(&(self.properties.len() as u32).to_le_bytes());
        out.extend_from_slice(&1.0f64.to_le_bytes());
        out.push(1);
        out.extend_from_slice(&2.0f64.to_le_bytes());
        out.extend_from_slice(&3u32.to_le_bytes());

        for (name, unit, integers, doubles) in &self.properties {
            push_str(&mut out, name);
            if !self.legacy {
                push_str(&mut out, unit);
            }
            for i in integers {
                out.extend_from_slice(&i.to_le_bytes());
            }
            if !self.no_doubles {
                out.extend_from_slice(&doubles.0.to_le_bytes());
                out.extend_from_slice(&doubles.1.to_le_bytes());
            }
        }

        out.extend_from_slice(&(self.markers.len() as u32).to_le_bytes());
        for (position, labels) in &self.markers {
            out.extend_from_slice(&position.to_le_bytes());
            for label in labels {
                push_str(&mut out, label);
            }
        }

        out.extend_from_slice(&self.trailing.0.to_le_bytes());
        out.extend_from_slice(&self.trailing.1.to_le_bytes());
        out
    }

    /// Header followed by any channel data added
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.build_header();
        out.extend_from_slice(&self.data);
        out
    }
}

fn push_str(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

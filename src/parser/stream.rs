use crate::error::{BpltError, Result};

/// BPLT data stream for reading little-endian binary data
pub struct BpltDataStream<'a> {
    data: &'a [u8],
    pub pos: usize,
    end: usize,
    pub eof: bool,
}

impl<'a> BpltDataStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
            eof: data.is_empty(),
        }
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
        self.eof = self.pos >= self.end;
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Whether the stream is exhausted, marking `eof` when it is
    pub fn at_end(&mut self) -> bool {
        if self.pos >= self.end {
            self.eof = true;
        }
        self.eof
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        if self.pos < self.end {
            let byte = self.data[self.pos];
            self.pos += 1;
            Some(byte)
        } else {
            self.eof = true;
            None
        }
    }

    /// Take `len` bytes. A short read still consumes what is left, so the
    /// position ends up at the end of the stream.
    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        if len <= self.remaining() {
            let data = self.data;
            let slice = &data[self.pos..self.pos + len];
            self.pos += len;
            Some(slice)
        } else {
            self.pos = self.end;
            self.eof = true;
            None
        }
    }

    fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N).and_then(|bytes| bytes.try_into().ok())
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.take_array::<1>().map(|b| b[0])
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        self.take_array::<4>().map(u32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Option<f64> {
        self.take_array::<8>().map(f64::from_le_bytes)
    }

    /// Read a required f64, failing with `TruncatedStream` when short
    pub fn expect_f64(&mut self, field: &'static str) -> Result<f64> {
        let available = self.remaining();
        self.read_f64().ok_or(BpltError::TruncatedStream {
            field,
            needed: 8,
            available,
        })
    }

    /// Read bytes up to a NUL (consumed) or the end of the stream.
    ///
    /// Non-ASCII bytes are dropped. Surrounding whitespace and the ASCII
    /// separator controls (0x1C to 0x1F) are trimmed.
    pub fn read_until_null(&mut self) -> String {
        let mut buf = Vec::new();
        while let Some(byte) = self.read_byte() {
            if byte == 0 {
                break;
            }
            if byte.is_ascii() {
                buf.push(byte);
            }
        }
        String::from_utf8_lossy(&buf)
            .trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
            .to_string()
    }

    /// Advance past the next NUL without keeping the bytes
    pub fn skip_past_null(&mut self) {
        while let Some(byte) = self.read_byte() {
            if byte == 0 {
                break;
            }
        }
    }

    /// Read `count` little-endian f64 values. `None` when short.
    pub fn read_f64_array(&mut self, count: usize) -> Option<Vec<f64>> {
        let bytes = match count.checked_mul(8) {
            Some(len) => self.take(len)?,
            None => {
                self.set_position(self.end);
                return None;
            }
        };
        Some(
            bytes
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        )
    }

    /// Read `count` little-endian f32 values. `None` when short.
    pub fn read_f32_array(&mut self, count: usize) -> Option<Vec<f32>> {
        let bytes = match count.checked_mul(4) {
            Some(len) => self.take(len)?,
            None => {
                self.set_position(self.end);
                return None;
            }
        };
        Some(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        )
    }
}

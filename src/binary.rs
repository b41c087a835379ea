//! Sequential reader and writer for the master data wire format.
//!
//! All scalars are little-endian. Strings are length-prefixed by *character*
//! count (not byte count) and stored as two bytes per character. Nullable
//! fields carry a one-byte presence flag before the value.
//!
//! Every payload opens with a 12-byte header of three int32 fields:
//! reserved/version, declared body length in bytes, reserved. The declared
//! length is the authoritative end-of-rows bound; the physical buffer may be
//! longer (container padding).

use crate::error::DecodeError;

/// Size of the three-int32 payload header.
pub const HEADER_LEN: usize = 12;

/// Stateful cursor over a raw master data payload.
///
/// Constructing the reader consumes and validates the header. Reads past the
/// physical end of the buffer are fatal; there is no partial-row recovery.
pub struct MasterDataReader<'a> {
    buf: &'a [u8],
    pos: usize,
    declared_end: usize,
}

impl<'a> MasterDataReader<'a> {
    /// Wrap a payload, consuming the 12-byte header.
    pub fn new(buf: &'a [u8]) -> Result<Self, DecodeError> {
        if buf.len() < HEADER_LEN {
            return Err(DecodeError::MissingHeader { len: buf.len() });
        }
        let mut reader = Self {
            buf,
            pos: 0,
            declared_end: 0,
        };
        reader.read_i32()?; // reserved/version
        let declared = reader.read_i32()?;
        reader.read_i32()?; // reserved
        let declared_end = HEADER_LEN + declared.max(0) as usize;
        if declared < 0 || declared_end > buf.len() {
            return Err(DecodeError::DeclaredLength {
                declared: declared.max(0) as usize,
                len: buf.len(),
            });
        }
        reader.declared_end = declared_end;
        Ok(reader)
    }

    /// Current byte offset from the start of the payload.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Offset at which the last row must end (header + declared length).
    pub fn declared_end(&self) -> usize {
        self.declared_end
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos.checked_add(n).ok_or(DecodeError::Truncated {
            offset: self.pos,
            wanted: n,
        })?;
        if end > self.buf.len() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                wanted: n,
            });
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// One byte; any nonzero value is true.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.take(1)?[0] != 0)
    }

    /// Length-prefixed string.
    ///
    /// `intern` strings are always UTF-16LE. Non-intern strings inspect byte
    /// offset 1 of the block: zero means single-byte characters packed two
    /// bytes apart; otherwise the block is tried as UTF-8, falling back to a
    /// raw-bytes representation.
    pub fn read_string(&mut self, intern: bool) -> Result<String, DecodeError> {
        let start = self.pos;
        let chars = self.read_i32()?;
        if chars == 0 {
            return Ok(String::new());
        }
        if chars < 0 {
            return Err(DecodeError::NegativeLength {
                offset: start,
                len: chars,
            });
        }
        let byte_len = (chars as usize).checked_mul(2).ok_or(DecodeError::Truncated {
            offset: self.pos,
            wanted: usize::MAX,
        })?;
        let block = self.take(byte_len)?;

        if intern {
            let units: Vec<u16> = block
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            return String::from_utf16(&units)
                .map_err(|_| DecodeError::InvalidString { offset: start });
        }

        if block[1] == 0 {
            // Single-byte characters stored two bytes apart.
            let packed: Vec<u8> = block.iter().step_by(2).copied().collect();
            String::from_utf8(packed).map_err(|_| DecodeError::InvalidString { offset: start })
        } else {
            match std::str::from_utf8(block) {
                Ok(s) => Ok(s.to_owned()),
                Err(_) => Ok(format!("{:?}", block)),
            }
        }
    }

    /// Presence flag + int32. Absent fields consume only the flag byte.
    pub fn read_i32_opt(&mut self) -> Result<Option<i32>, DecodeError> {
        if self.read_bool()? {
            Ok(Some(self.read_i32()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_f32_opt(&mut self) -> Result<Option<f32>, DecodeError> {
        if self.read_bool()? {
            Ok(Some(self.read_f32()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_bool_opt(&mut self) -> Result<Option<bool>, DecodeError> {
        if self.read_bool()? {
            Ok(Some(self.read_bool()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_string_opt(&mut self, intern: bool) -> Result<Option<String>, DecodeError> {
        if self.read_bool()? {
            Ok(Some(self.read_string(intern)?))
        } else {
            Ok(None)
        }
    }

    /// Nullable date-like string. Present-but-empty means "no date" to the
    /// model layer, but the wire distinction is preserved for round-trips.
    pub fn read_date_opt(&mut self) -> Result<Option<String>, DecodeError> {
        self.read_string_opt(false)
    }
}

/// Writer counterpart, producing byte-exact payloads for the reader.
///
/// Used to re-serialize decoded rows (round-trip verification) and to build
/// synthetic payloads in tests.
#[derive(Default)]
pub struct MasterDataWriter {
    body: Vec<u8>,
}

impl MasterDataWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_i32(&mut self, value: i32) {
        self.body.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.body.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.body.push(u8::from(value));
    }

    /// Characters are written as UTF-16LE code units; the prefix is the code
    /// unit count, matching the reader's character-count contract.
    pub fn write_string(&mut self, value: &str) {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_i32(units.len() as i32);
        for unit in units {
            self.body.extend_from_slice(&unit.to_le_bytes());
        }
    }

    pub fn write_i32_opt(&mut self, value: Option<i32>) {
        self.write_bool(value.is_some());
        if let Some(v) = value {
            self.write_i32(v);
        }
    }

    pub fn write_f32_opt(&mut self, value: Option<f32>) {
        self.write_bool(value.is_some());
        if let Some(v) = value {
            self.write_f32(v);
        }
    }

    pub fn write_string_opt(&mut self, value: Option<&str>) {
        self.write_bool(value.is_some());
        if let Some(v) = value {
            self.write_string(v);
        }
    }

    /// Number of body bytes written so far.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Prepend the 12-byte header and return the complete payload.
    pub fn finish(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.body.len());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&(self.body.len() as i32).to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&self.body);
        out
    }
}

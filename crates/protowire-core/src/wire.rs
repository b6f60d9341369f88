///
/// Wire primitive helpers.
///
/// Tag, varint, zig-zag, and fixed-width plumbing shared by every codec.
/// Reads are bounds-checked before every access so truncated input fails
/// fast instead of reading unbounded memory.
///
use thiserror::Error as ThisError;

/// Longest legal varint encoding of a 64-bit value.
pub const MAX_VARINT_LEN: usize = 10;

/// Highest field number the tag format can address (29 bits).
pub const FIELD_NUMBER_MAX: u32 = (1 << 29) - 1;

///
/// WireError
///

#[derive(Clone, Debug, Eq, ThisError, PartialEq)]
pub enum WireError {
    #[error("varint exceeds {MAX_VARINT_LEN} bytes")]
    VarintOverlong,

    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("length prefix {len} exceeds remaining {remaining} bytes")]
    LengthOverrun { len: u64, remaining: usize },

    #[error("group wire types are not supported")]
    Group,

    #[error("unknown wire type {0}")]
    UnknownWireType(u8),

    #[error("field number {0} is out of range")]
    FieldNumber(u64),
}

///
/// WireType
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl WireType {
    pub const fn try_from_raw(raw: u8) -> Result<Self, WireError> {
        match raw {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::Fixed32),
            _ => Err(WireError::UnknownWireType(raw)),
        }
    }
}

//
// zig-zag transform: n >= 0 ? 2n : -2n-1
//

#[must_use]
pub const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[must_use]
pub const fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

//
// writers
//

pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

pub fn write_tag(buf: &mut Vec<u8>, field: u32, wire: WireType) {
    write_varint(buf, (u64::from(field) << 3) | wire as u64);
}

pub fn write_fixed32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn write_fixed64(buf: &mut Vec<u8>, value: u64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub fn write_len_prefixed(buf: &mut Vec<u8>, payload: &[u8]) {
    write_varint(buf, payload.len() as u64);
    buf.extend_from_slice(payload);
}

///
/// WireReader
/// bounds-checked cursor over an input slice
///

#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn read_byte(&mut self) -> Result<u8, WireError> {
        let Some(byte) = self.buf.get(self.pos) else {
            return Err(WireError::UnexpectedEof { offset: self.pos });
        };
        self.pos += 1;

        Ok(*byte)
    }

    pub fn read_varint(&mut self) -> Result<u64, WireError> {
        let mut value: u64 = 0;

        for shift in 0..MAX_VARINT_LEN {
            let byte = self.read_byte()?;
            value |= u64::from(byte & 0x7F) << (shift * 7);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(WireError::VarintOverlong)
    }

    pub fn read_tag(&mut self) -> Result<(u32, WireType), WireError> {
        let tag = self.read_varint()?;
        let field = tag >> 3;

        if field == 0 || field > u64::from(FIELD_NUMBER_MAX) {
            return Err(WireError::FieldNumber(field));
        }
        let wire = WireType::try_from_raw((tag & 0x7) as u8)?;

        Ok((field as u32, wire))
    }

    pub fn read_fixed32(&mut self) -> Result<u32, WireError> {
        let bytes = self.read_bytes(4)?;

        Ok(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
    }

    pub fn read_fixed64(&mut self) -> Result<u64, WireError> {
        let bytes = self.read_bytes(8)?;

        Ok(u64::from_le_bytes(bytes.try_into().expect("8-byte slice")))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        if len > self.remaining() {
            return Err(WireError::LengthOverrun {
                len: len as u64,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;

        Ok(bytes)
    }

    pub fn read_len_prefixed(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.read_varint()?;

        if len > self.remaining() as u64 {
            return Err(WireError::LengthOverrun {
                len,
                remaining: self.remaining(),
            });
        }

        self.read_bytes(len as usize)
    }

    /// Discard one field value per its wire type. Groups are rejected.
    pub fn skip(&mut self, wire: WireType) -> Result<(), WireError> {
        match wire {
            WireType::Varint => {
                self.read_varint()?;
            }
            WireType::Fixed64 => {
                self.read_bytes(8)?;
            }
            WireType::LengthDelimited => {
                self.read_len_prefixed()?;
            }
            WireType::Fixed32 => {
                self.read_bytes(4)?;
            }
            WireType::StartGroup | WireType::EndGroup => return Err(WireError::Group),
        }

        Ok(())
    }
}

///
/// TESTS
///

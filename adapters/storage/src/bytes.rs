//! Cursor-style readers and writers for the fixed big-endian layouts.
//!
//! The on-disk formats predate this implementation: integers are big-endian,
//! strings are UTF-8 prefixed with a big-endian `u16` byte length, and
//! booleans occupy one byte. The reader tracks its offset so decode errors
//! can point at the exact byte that went wrong.

use crate::CodecError;

pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < count {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed: count,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, CodecError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32, CodecError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64, CodecError> {
        let bytes = self.take(8)?;
        Ok(i64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool, CodecError> {
        let offset = self.offset;
        let byte = self.take(1)?[0];
        match byte {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(CodecError::InvalidBool { offset, value }),
        }
    }

    pub(crate) fn read_string(&mut self) -> Result<String, CodecError> {
        let length = usize::from(self.read_u16()?);
        let offset = self.offset;
        let bytes = self.take(length)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8 { offset })
    }

    /// Reads a non-negative `i32` used as an element count.
    pub(crate) fn read_count(&mut self, what: &'static str) -> Result<usize, CodecError> {
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| CodecError::NegativeCount { what, value })
    }

    /// Fails unless every byte of the input was consumed.
    pub(crate) fn finish(self) -> Result<(), CodecError> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                remaining: self.remaining(),
            })
        }
    }
}

#[derive(Default)]
pub(crate) struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn write_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    pub(crate) fn write_string(&mut self, value: &str, what: &'static str) -> Result<(), CodecError> {
        let length =
            u16::try_from(value.len()).map_err(|_| CodecError::ValueTooLarge { what })?;
        self.bytes.extend_from_slice(&length.to_be_bytes());
        self.bytes.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub(crate) fn write_count(&mut self, value: usize, what: &'static str) -> Result<(), CodecError> {
        let value = i32::try_from(value).map_err(|_| CodecError::ValueTooLarge { what })?;
        self.write_i32(value);
        Ok(())
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

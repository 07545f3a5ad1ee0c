//! Primitive codec
//!
//! Fixed-width little-endian numbers, the two length-prefixed string
//! encodings and the float vector used by every packet and command.
//!
//! Narrow strings carry one byte per character and the length byte counts
//! bytes. Wide strings carry four bytes per character (UTF-32LE) and the
//! length byte counts characters, not bytes.

use bytes::{Buf, BufMut};
use serde::Serialize;
use thiserror::Error;

/// Longest string either encoding can describe with its one-byte length
pub const MAX_STRING_LEN: usize = u8::MAX as usize;

/// Bytes per character in a wide string
const WIDE_CHAR_SIZE: usize = 4;

/// Codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unknown packet tag: {0}")]
    UnknownTag(u8),

    #[error("Unknown client event type: {0}")]
    UnknownEventKind(u8),

    #[error("Truncated buffer: needed {needed} bytes, {available} available")]
    TruncatedBuffer { needed: usize, available: usize },

    #[error("Invalid character data: {0:#x} is not a valid code point")]
    InvalidCharacterData(u32),

    #[error("Message too long: {0} characters (max: {max})", max = MAX_STRING_LEN)]
    MessageTooLong(usize),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Three floats in simulation space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Cursor over a received datagram
///
/// Every read checks the remaining length first, so running off the end
/// of the buffer is reported as [`CodecError::TruncatedBuffer`].
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            total: buf.len(),
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.total - self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn ensure(&self, needed: usize) -> CodecResult<()> {
        let available = self.buf.remaining();
        if available < needed {
            return Err(CodecError::TruncatedBuffer { needed, available });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// A byte where any non-zero value means true
    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> CodecResult<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16_le())
    }

    pub fn read_i16(&mut self) -> CodecResult<i16> {
        self.ensure(2)?;
        Ok(self.buf.get_i16_le())
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_i32(&mut self) -> CodecResult<i32> {
        self.ensure(4)?;
        Ok(self.buf.get_i32_le())
    }

    pub fn read_f32(&mut self) -> CodecResult<f32> {
        self.ensure(4)?;
        Ok(self.buf.get_f32_le())
    }

    pub fn read_vector3(&mut self) -> CodecResult<Vector3> {
        self.ensure(12)?;
        Ok(Vector3 {
            x: self.buf.get_f32_le(),
            y: self.buf.get_f32_le(),
            z: self.buf.get_f32_le(),
        })
    }

    /// Length byte, then that many single-byte characters
    pub fn read_narrow_string(&mut self) -> CodecResult<String> {
        let len = self.read_u8()? as usize;
        self.ensure(len)?;

        let text = self.buf[..len].iter().map(|&b| char::from(b)).collect();
        self.buf.advance(len);
        Ok(text)
    }

    /// Length byte (characters), then that many UTF-32LE code points
    pub fn read_wide_string(&mut self) -> CodecResult<String> {
        let len = self.read_u8()? as usize;
        self.ensure(len * WIDE_CHAR_SIZE)?;

        let mut text = String::with_capacity(len);
        for _ in 0..len {
            let code = self.buf.get_u32_le();
            let ch = char::from_u32(code).ok_or(CodecError::InvalidCharacterData(code))?;
            text.push(ch);
        }
        Ok(text)
    }
}

/// Writing side of the primitive codec, available on any [`BufMut`]
pub trait WireWrite: BufMut {
    /// Write a wide string: character count, then 4 bytes per character.
    ///
    /// Nothing is written when the string has more than
    /// [`MAX_STRING_LEN`] characters.
    fn put_wide_string(&mut self, text: &str) -> CodecResult<()> {
        let len = text.chars().count();
        if len > MAX_STRING_LEN {
            return Err(CodecError::MessageTooLong(len));
        }

        self.put_u8(len as u8);
        for ch in text.chars() {
            self.put_u32_le(ch as u32);
        }
        Ok(())
    }

    fn put_vector3(&mut self, v: &Vector3) {
        self.put_f32_le(v.x);
        self.put_f32_le(v.y);
        self.put_f32_le(v.z);
    }
}

impl<B: BufMut + ?Sized> WireWrite for B {}

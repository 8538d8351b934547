//! # Word Reader / Writer
//!
//! Payload fields are 32-byte big-endian words. Narrow integers and
//! addresses sit in the low-order bytes; the high-order bytes must be zero.

use super::errors::CodecError;
use primitive_types::U256;
use shared_types::{Address, Word};

/// Word size in bytes.
pub const WORD: usize = 32;

/// Cursor over a payload body.
pub struct WordReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> WordReader<'a> {
    /// `data` is the whole payload; reading starts after the selector.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 4 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(CodecError::InvalidPayloadSize {
                expected: self.offset.saturating_add(len),
                actual: self.data.len(),
            })?;
        let slice = &self.data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    /// Raw word.
    pub fn word(&mut self) -> Result<Word, CodecError> {
        let mut word = [0u8; WORD];
        word.copy_from_slice(self.take(WORD)?);
        Ok(word)
    }

    /// Full-width unsigned integer.
    pub fn u256(&mut self) -> Result<U256, CodecError> {
        Ok(U256::from_big_endian(&self.word()?))
    }

    /// Unsigned integer that must fit in 64 bits.
    pub fn u64(&mut self, field: &'static str) -> Result<u64, CodecError> {
        let value = self.u256()?;
        if value > U256::from(u64::MAX) {
            return Err(CodecError::FieldOutOfRange { field });
        }
        Ok(value.low_u64())
    }

    /// Unsigned integer that must fit in 32 bits.
    pub fn u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        let value = self.u64(field)?;
        u32::try_from(value).map_err(|_| CodecError::FieldOutOfRange { field })
    }

    /// Left-padded 20-byte address.
    pub fn address(&mut self, field: &'static str) -> Result<Address, CodecError> {
        let word = self.word()?;
        shared_types::word_to_address(&word).ok_or(CodecError::FieldOutOfRange { field })
    }

    /// `n` raw bytes with no padding rule.
    pub fn raw(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        self.take(len)
    }

    /// Length word followed by data zero-padded to a word boundary.
    pub fn bytes(&mut self, field: &'static str) -> Result<Vec<u8>, CodecError> {
        let len = usize::try_from(self.u64(field)?)
            .map_err(|_| CodecError::FieldOutOfRange { field })?;
        let padded = padded_len(len).ok_or(CodecError::FieldOutOfRange { field })?;
        let chunk = self.take(padded)?;
        if chunk[len..].iter().any(|b| *b != 0) {
            return Err(CodecError::FieldOutOfRange { field });
        }
        Ok(chunk[..len].to_vec())
    }

    /// Fails unless every byte was consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        if self.offset != self.data.len() {
            return Err(CodecError::InvalidPayloadSize {
                expected: self.offset,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }
}

fn padded_len(len: usize) -> Option<usize> {
    len.checked_add(WORD - 1).map(|l| l / WORD * WORD)
}

/// Payload builder.
pub struct WordWriter {
    buf: Vec<u8>,
}

impl WordWriter {
    /// Start a payload with its selector.
    pub fn new(selector: [u8; 4]) -> Self {
        let mut buf = Vec::with_capacity(4 + 8 * WORD);
        buf.extend_from_slice(&selector);
        Self { buf }
    }

    pub fn word(&mut self, word: &Word) -> &mut Self {
        self.buf.extend_from_slice(word);
        self
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        let mut word = [0u8; WORD];
        U256::from(value).to_big_endian(&mut word);
        self.word(&word)
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.u64(u64::from(value))
    }

    pub fn address(&mut self, address: &Address) -> &mut Self {
        self.word(&shared_types::address_to_word(address))
    }

    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.u64(data.len() as u64);
        self.buf.extend_from_slice(data);
        let pad = padded_len(data.len()).unwrap_or(data.len()) - data.len();
        self.buf.extend(std::iter::repeat(0u8).take(pad));
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

//! Cursor over metadata byte slices.
//!
//! [`Parser`] is used by the signature decoder and the heap readers. Besides plain little-endian
//! reads it understands the ECMA-335 compressed integer encodings (II.23.2) and the compressed
//! `TypeDefOrRefOrSpecEncoded` tokens that appear inside signature blobs.

use crate::{
    file::io::{read_le_at, CilIO},
    metadata::token::Token,
    Error::OutOfBounds,
    Result,
};

/// A generic Parser for byte slices, keeps track of the current position.
///
/// # Examples
///
/// ```rust
/// use dotbrowse::file::parser::Parser;
///
/// let data = [0x03, 0x81, 0x00, 0x2A];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_compressed_uint()?, 3);
/// assert_eq!(parser.read_compressed_uint()?, 0x100);
/// assert_eq!(parser.read_le::<u8>()?, 0x2A);
/// assert!(!parser.has_more_data());
/// # Ok::<(), dotbrowse::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new Parser from a byte slice
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the underlying data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if there is more data to parse
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the position to a specific index
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` lies beyond the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Get the current position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Look at the next byte without consuming it
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(OutOfBounds),
        }
    }

    /// Read a type T in little-endian and advance the position
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough bytes are left.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer (1, 2 or 4 bytes)
    ///
    /// # Errors
    /// Returns an error on a truncated value or an invalid leading byte.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        Ok(self.read_compressed_uint_sized()?.0)
    }

    /// Read a compressed signed integer (1, 2 or 4 bytes). The sign bit is rotated into the
    /// lowest bit of the encoded value.
    ///
    /// # Errors
    /// Returns an error on a truncated value or an invalid leading byte.
    pub fn read_compressed_int(&mut self) -> Result<i32> {
        let (unsigned, width) = self.read_compressed_uint_sized()?;

        let magnitude = (unsigned >> 1) as i32;
        if unsigned & 1 == 0 {
            return Ok(magnitude);
        }

        let sign_bit = match width {
            1 => 0x40,
            2 => 0x2000,
            _ => 0x1000_0000,
        };

        Ok(magnitude - sign_bit)
    }

    /// Read a compressed `TypeDefOrRefOrSpecEncoded` token
    ///
    /// # Errors
    /// Returns an error if the tag bits do not name TypeDef, TypeRef or TypeSpec.
    pub fn read_compressed_token(&mut self) -> Result<Token> {
        let compressed_token = self.read_compressed_uint()?;

        let table: u32 = match compressed_token & 0x3 {
            0x0 => 0x0200_0000, // TypeDef
            0x1 => 0x0100_0000, // TypeRef
            0x2 => 0x1B00_0000, // TypeSpec
            _ => {
                return Err(malformed_error!(
                    "Invalid compressed token - {}",
                    compressed_token
                ))
            }
        };

        Ok(Token::new(table | (compressed_token >> 2)))
    }

    /// Consume `length` bytes and return them as a slice
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough bytes are left.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(length) else {
            return Err(OutOfBounds);
        };

        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }

    fn read_compressed_uint_sized(&mut self) -> Result<(u32, usize)> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok((u32::from(first_byte), 1));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok((value, 2));
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok((value, 4));
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_uint() {
        // Samples from ECMA-335 II.23.2
        let data = [
            0x03, 0x7F, 0x80, 0x80, 0xAE, 0x57, 0xBF, 0xFF, 0xC0, 0x00, 0x40, 0x00, 0xDF, 0xFF,
            0xFF, 0xFF,
        ];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_compressed_uint().unwrap(), 0x03);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x7F);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x80);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x2E57);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x3FFF);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x4000);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x1FFF_FFFF);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn compressed_uint_invalid() {
        let mut parser = Parser::new(&[0xE0, 0x00, 0x00, 0x00]);
        assert!(parser.read_compressed_uint().is_err());

        let mut parser = Parser::new(&[0x80]);
        assert!(matches!(parser.read_compressed_uint(), Err(OutOfBounds)));
    }

    #[test]
    fn compressed_int() {
        // Samples from ECMA-335 II.23.2
        let data = [
            0x06, 0x7B, 0x80, 0x80, 0x01, 0xC0, 0x00, 0x40, 0x00, 0x80, 0x01, 0xDF, 0xFF, 0xFF,
            0xFE, 0xC0, 0x00, 0x00, 0x01,
        ];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_compressed_int().unwrap(), 3);
        assert_eq!(parser.read_compressed_int().unwrap(), -3);
        assert_eq!(parser.read_compressed_int().unwrap(), 64);
        assert_eq!(parser.read_compressed_int().unwrap(), -64);
        assert_eq!(parser.read_compressed_int().unwrap(), 8192);
        assert_eq!(parser.read_compressed_int().unwrap(), -8192);
        assert_eq!(parser.read_compressed_int().unwrap(), 268_435_455);
        assert_eq!(parser.read_compressed_int().unwrap(), -268_435_456);
    }

    #[test]
    fn compressed_token() {
        let data = [0x49, 0x12, 0x0A, 0x0B];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_compressed_token().unwrap().value(), 0x0100_0012);
        assert_eq!(parser.read_compressed_token().unwrap().value(), 0x1B00_0004);
        assert_eq!(parser.read_compressed_token().unwrap().value(), 0x1B00_0002);
        assert!(parser.read_compressed_token().is_err());
    }

    #[test]
    fn bytes_and_seek() {
        let data = [1, 2, 3, 4, 5];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(parser.peek_byte().unwrap(), 3);
        assert!(parser.read_bytes(4).is_err());
        parser.seek(4).unwrap();
        assert_eq!(parser.read_le::<u8>().unwrap(), 5);
        assert!(parser.peek_byte().is_err());
        assert!(parser.seek(6).is_err());
    }
}

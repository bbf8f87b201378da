//! Blob heap (`#Blob`, ECMA-335 II.24.2.4).
//!
//! Length-prefixed binary entries, mostly signatures. The length is a compressed unsigned
//! integer, index 0 is the empty blob.

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// View onto the `#Blob` heap
#[derive(Clone, Copy)]
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a `Blob` view over `data`
    ///
    /// # Errors
    /// Returns an error if the heap does not start with the mandatory empty blob.
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// A heap without content, used when a module carries no `#Blob` stream
    #[must_use]
    pub fn empty() -> Blob<'static> {
        Blob { data: &[0] }
    }

    /// Get the blob starting at `index`, without its length prefix
    ///
    /// # Errors
    /// Returns an error if the index or the encoded length point outside of the heap.
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        let Some(tail) = self.data.get(index..) else {
            return Err(OutOfBounds);
        };

        let mut parser = Parser::new(tail);
        let len = parser.read_compressed_uint()? as usize;
        parser.read_bytes(len)
    }
}

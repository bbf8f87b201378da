//! String heap (`#Strings`, ECMA-335 II.24.2.3).
//!
//! Identifiers referenced by the metadata tables: type names, namespaces, member names. Entries
//! are NUL-terminated UTF-8, index 0 is always the empty string.

use std::ffi::CStr;

use crate::{Error::OutOfBounds, Result};

/// View onto the `#Strings` heap
///
/// # Examples
///
/// ```rust
/// use dotbrowse::metadata::streams::Strings;
/// let data = &[0u8, b'H', b'e', b'l', b'l', b'o', 0u8];
/// let strings = Strings::from(data)?;
/// assert_eq!(strings.get(1)?, "Hello");
/// assert_eq!(strings.get(0)?, "");
/// # Ok::<(), dotbrowse::Error>(())
/// ```
#[derive(Clone, Copy)]
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a `Strings` view over `data`
    ///
    /// # Errors
    /// Returns an error if the heap does not start with the mandatory empty string.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #String heap is empty"));
        }

        Ok(Strings { data })
    }

    /// A heap without content, used when a module carries no `#Strings` stream
    #[must_use]
    pub fn empty() -> Strings<'static> {
        Strings { data: &[0] }
    }

    /// Get the string starting at `index`
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds or the string is unterminated or not UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        let Some(tail) = self.data.get(index..) else {
            return Err(OutOfBounds);
        };

        match CStr::from_bytes_until_nul(tail) {
            Ok(result) => result
                .to_str()
                .map_err(|_| malformed_error!("Invalid string at index - {}", index)),
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }
}

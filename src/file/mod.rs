//! PE file access for .NET modules.
//!
//! A [`File`] owns the raw bytes of a module (memory mapped from disk or handed over as a
//! buffer) together with the [`goblin`] parse of its PE headers. Only what is needed to reach
//! the CLI header is exposed: the CLR runtime data directory and RVA to file offset conversion.
//!
//! # Key Components
//!
//! - [`Backend`] - the source of the bytes
//! - [`physical::Physical`] - memory mapped file on disk
//! - [`memory::Memory`] - owned in-memory buffer
//! - [`io`] and [`parser`] - bounds checked little-endian readers shared by the metadata code
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotbrowse::file::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("MyLibrary.dll"))?;
//! let (clr_rva, clr_size) = file.clr()?;
//! let clr_offset = file.rva_to_offset(clr_rva)?;
//! let cor20 = file.data_slice(clr_offset, clr_size)?;
//! # Ok::<(), dotbrowse::Error>(())
//! ```

pub mod io;
pub mod memory;
pub mod parser;
pub mod physical;

use std::path::Path;

use goblin::pe::PE;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

use crate::{
    Error::{Empty, GoblinErr, NotSupported, OutOfBounds},
    Result,
};

/// Backend trait for file data sources.
///
/// This trait abstracts over the source of PE data, allowing for both in-memory and on-disk
/// representations. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded PE image which carries a CLR runtime header.
///
/// The parsed [`PE`] borrows the backend it was parsed from, which is why this struct is
/// self-referencing.
pub struct File {
    /// The underlying data source
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    pe: PE<'this>,
}

impl File {
    /// Loads a PE file from the given path, using a memory map.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a PE image, or does not carry a
    /// CLR runtime header.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads a PE file from an owned memory buffer.
    ///
    /// # Errors
    /// Returns an error if the buffer is not a PE image or does not carry a CLR runtime header.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data: Box<dyn Backend> = Box::new(data);

        File::try_new(data, |data| match PE::parse(data.data()) {
            Ok(pe) => match pe.header.optional_header {
                Some(optional_header) => {
                    if let Some(clr) = optional_header.data_directories.get_clr_runtime_header() {
                        if clr.virtual_address == 0 || clr.size == 0 {
                            return Err(NotSupported);
                        }
                        Ok(pe)
                    } else {
                        Err(NotSupported)
                    }
                }
                None => Err(malformed_error!("File does not have an OptionalHeader")),
            },
            Err(error) => Err(GoblinErr(error)),
        })
    }

    /// Returns the total size of the file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// True if the file holds no data, never the case for a successfully loaded file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw file data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns a bounds checked slice of the file data.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range lies outside of the file.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }

    /// Returns RVA and size of the CLR runtime header (data directory 14).
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the directory is missing.
    pub fn clr(&self) -> Result<(usize, usize)> {
        self.with_pe(|pe| {
            let Some(optional_header) = pe.header.optional_header else {
                return Err(NotSupported);
            };

            match optional_header.data_directories.get_clr_runtime_header() {
                Some(clr_dir) => Ok((clr_dir.virtual_address as usize, clr_dir.size as usize)),
                None => Err(NotSupported),
            }
        })
    }

    /// Converts a relative virtual address into a file offset, using the section table.
    ///
    /// # Errors
    /// Returns an error if no section contains the RVA, or the section table is malformed.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let Ok(rva_u32) = u32::try_from(rva) else {
            return Err(malformed_error!("RVA too large to fit in u32: {}", rva));
        };

        self.with_pe(|pe| {
            for section in &pe.sections {
                let span = section.virtual_size.max(section.size_of_raw_data);
                let Some(section_max) = section.virtual_address.checked_add(span) else {
                    return Err(malformed_error!(
                        "Section malformed, causing integer overflow - {} + {}",
                        section.virtual_address,
                        span
                    ));
                };

                if section.virtual_address <= rva_u32 && rva_u32 < section_max {
                    let delta = (rva_u32 - section.virtual_address) as usize;
                    return (section.pointer_to_raw_data as usize)
                        .checked_add(delta)
                        .ok_or(OutOfBounds);
                }
            }

            Err(malformed_error!(
                "RVA could not be converted to offset - {}",
                rva
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_empty() {
        assert!(matches!(File::from_mem(Vec::new()), Err(Empty)));
    }

    #[test]
    fn load_invalid() {
        let data = b"this is not a portable executable at all".to_vec();
        if File::from_mem(data).is_ok() {
            panic!("This should not load!")
        }
    }

    #[test]
    fn load_missing_file() {
        let result = File::from_file(Path::new("/nonexistent/definitely/missing.dll"));
        assert!(matches!(result, Err(crate::Error::FileError(_))));
    }
}

//! Memory mapped file backend.
//!
//! The operating system pages in only the parts of the module that the metadata reader touches,
//! which keeps loading large framework assemblies cheap.

use std::{fs, path::Path};

use memmap2::Mmap;

use super::Backend;
use crate::{
    Error::{FileError, OutOfBounds},
    Result,
};

/// A file backend that maps a file on disk into memory.
#[derive(Debug)]
pub struct Physical {
    /// Memory-mapped file data
    data: Mmap,
}

impl Physical {
    /// Open and map the file at `path`
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file can not be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) => return Err(FileError(error)),
        };

        // The mapping is read-only and outlives no borrow of `file`
        let mmap = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => mmap,
            Err(error) => return Err(FileError(error)),
        };

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if offset_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn physical() {
        let path = std::env::temp_dir().join(format!("dotbrowse-physical-{}.bin", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(&[0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00]).unwrap();
        }

        let physical = Physical::new(&path).unwrap();
        assert_eq!(physical.len(), 6);
        assert_eq!(physical.data()[0], 0x4D);
        assert_eq!(physical.data_slice(2, 2).unwrap(), &[0x90, 0x00]);
        assert!(physical.data_slice(4, 3).is_err());
        assert!(physical
            .data_slice(u32::MAX as usize, u32::MAX as usize)
            .is_err());

        drop(physical);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing() {
        assert!(matches!(
            Physical::new("/nonexistent/dotbrowse/missing.dll"),
            Err(FileError(_))
        ));
    }
}

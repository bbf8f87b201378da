//! CLI header (ECMA-335 II.25.3.3).
//!
//! The 72-byte header pointed to by the CLR runtime data directory. The only field the browser
//! truly needs is the location of the metadata root, the rest is kept for completeness and for
//! the sanity checks performed while reading.

use crate::{file::parser::Parser, Error::OutOfBounds, Result};

/// The CLI header of a .NET module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cor20Header {
    /// Size of the header in bytes, always 72
    pub cb: u32,
    /// Minimum runtime major version
    pub major_runtime_version: u16,
    /// Minimum runtime minor version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata
    pub meta_data_size: u32,
    /// `COMIMAGE_FLAGS_*` runtime flags
    pub flags: u32,
    /// Token of the entry point method (or file for multi-module assemblies)
    pub entry_point_token: u32,
    /// RVA of the managed resources
    pub resource_rva: u32,
    /// Size of the managed resources
    pub resource_size: u32,
    /// RVA of the strong name signature
    pub strong_name_signature_rva: u32,
    /// Size of the strong name signature
    pub strong_name_signature_size: u32,
}

impl Cor20Header {
    /// Read the CLI header from `data`
    ///
    /// # Errors
    /// Returns an error if the data is too short or fails the ECMA-335 sanity checks.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        const VALID_FLAGS: u32 = 0x0001_001F;

        if data.len() < 72 {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb != 72 {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = parser.read_le::<u16>()?;
        let minor_runtime_version = parser.read_le::<u16>()?;

        let meta_data_rva = parser.read_le::<u32>()?;
        if meta_data_rva == 0 {
            return Err(malformed_error!("Metadata RVA cannot be zero"));
        }

        let meta_data_size = parser.read_le::<u32>()?;
        if meta_data_size == 0 {
            return Err(malformed_error!("Metadata size cannot be zero"));
        }

        let flags = parser.read_le::<u32>()?;
        if flags & !VALID_FLAGS != 0 {
            return Err(malformed_error!(
                "Invalid CLR flags: 0x{:08X} contains undefined bits",
                flags
            ));
        }

        let entry_point_token = parser.read_le::<u32>()?;
        let resource_rva = parser.read_le::<u32>()?;
        let resource_size = parser.read_le::<u32>()?;
        let strong_name_signature_rva = parser.read_le::<u32>()?;
        let strong_name_signature_size = parser.read_le::<u32>()?;

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags,
            entry_point_token,
            resource_rva,
            resource_size,
            strong_name_signature_rva,
            strong_name_signature_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(flags: u32) -> Vec<u8> {
        let mut data = vec![0u8; 72];
        data[0] = 0x48;
        data[4] = 0x02; // major 2
        data[6] = 0x05; // minor 5
        data[8..12].copy_from_slice(&0x2050_u32.to_le_bytes());
        data[12..16].copy_from_slice(&0x0A1C_u32.to_le_bytes());
        data[16..20].copy_from_slice(&flags.to_le_bytes());
        data[20..24].copy_from_slice(&0x0600_0001_u32.to_le_bytes());
        data
    }

    #[test]
    fn crafted() {
        let parsed = Cor20Header::read(&header(0x1)).unwrap();

        assert_eq!(parsed.cb, 72);
        assert_eq!(parsed.major_runtime_version, 2);
        assert_eq!(parsed.minor_runtime_version, 5);
        assert_eq!(parsed.meta_data_rva, 0x2050);
        assert_eq!(parsed.meta_data_size, 0x0A1C);
        assert_eq!(parsed.flags, 0x1);
        assert_eq!(parsed.entry_point_token, 0x0600_0001);
    }

    #[test]
    fn invalid() {
        assert!(Cor20Header::read(&header(0x8000_0000)).is_err());
        assert!(matches!(Cor20Header::read(&[0x48; 16]), Err(OutOfBounds)));

        let mut zero_rva = header(0x1);
        zero_rva[8..12].copy_from_slice(&[0; 4]);
        assert!(Cor20Header::read(&zero_rva).is_err());
    }
}

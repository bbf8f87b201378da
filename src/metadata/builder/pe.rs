//! Wraps a metadata root into a minimal PE32 image.
//!
//! The image has a single `.text` section holding the CLI header followed by the metadata.
//! No code, no imports, no relocations. It exists so the full PE loading path can be
//! exercised without shipping binaries.

use crate::{file::io::write_le, Result};

const FILE_ALIGNMENT: u32 = 0x200;
const SECTION_ALIGNMENT: u32 = 0x2000;
const PE_OFFSET: u32 = 0x80;
const TEXT_RVA: u32 = 0x2000;
const CLI_HEADER_SIZE: u32 = 72;
const OPTIONAL_HEADER_SIZE: u16 = 0xE0;
const CLR_DIRECTORY: usize = 14;

/// Build a PE32 DLL around `metadata`
pub(crate) fn wrap_metadata(metadata: &[u8]) -> Result<Vec<u8>> {
    let Ok(metadata_size) = u32::try_from(metadata.len()) else {
        return Err(malformed_error!("Metadata of {} bytes is too large", metadata.len()));
    };

    let text_size = CLI_HEADER_SIZE + metadata_size;
    let raw_size = align(text_size, FILE_ALIGNMENT);
    let image_size = TEXT_RVA + align(text_size, SECTION_ALIGNMENT);

    let mut out = Vec::with_capacity((FILE_ALIGNMENT + raw_size) as usize);

    // DOS header, only the magic and e_lfanew matter
    out.extend_from_slice(b"MZ");
    out.resize(0x3C, 0);
    write_le::<u32>(&mut out, PE_OFFSET);
    out.resize(PE_OFFSET as usize, 0);

    // COFF header
    out.extend_from_slice(b"PE\0\0");
    write_le::<u16>(&mut out, 0x014C); // i386
    write_le::<u16>(&mut out, 1); // sections
    write_le::<u32>(&mut out, 0); // timestamp
    write_le::<u32>(&mut out, 0); // symbol table
    write_le::<u32>(&mut out, 0); // symbols
    write_le::<u16>(&mut out, OPTIONAL_HEADER_SIZE);
    write_le::<u16>(&mut out, 0x2102); // executable, 32 bit, dll

    // Optional header, standard fields
    write_le::<u16>(&mut out, 0x010B);
    write_le::<u8>(&mut out, 8);
    write_le::<u8>(&mut out, 0);
    write_le::<u32>(&mut out, raw_size); // size of code
    write_le::<u32>(&mut out, 0);
    write_le::<u32>(&mut out, 0);
    write_le::<u32>(&mut out, 0); // entry point
    write_le::<u32>(&mut out, TEXT_RVA); // base of code
    write_le::<u32>(&mut out, 0); // base of data

    // Optional header, windows fields
    write_le::<u32>(&mut out, 0x0040_0000);
    write_le::<u32>(&mut out, SECTION_ALIGNMENT);
    write_le::<u32>(&mut out, FILE_ALIGNMENT);
    write_le::<u16>(&mut out, 4);
    write_le::<u16>(&mut out, 0);
    write_le::<u16>(&mut out, 0);
    write_le::<u16>(&mut out, 0);
    write_le::<u16>(&mut out, 4);
    write_le::<u16>(&mut out, 0);
    write_le::<u32>(&mut out, 0);
    write_le::<u32>(&mut out, image_size);
    write_le::<u32>(&mut out, FILE_ALIGNMENT); // size of headers
    write_le::<u32>(&mut out, 0); // checksum
    write_le::<u16>(&mut out, 3); // console
    write_le::<u16>(&mut out, 0x8540);
    write_le::<u32>(&mut out, 0x0010_0000);
    write_le::<u32>(&mut out, 0x1000);
    write_le::<u32>(&mut out, 0x0010_0000);
    write_le::<u32>(&mut out, 0x1000);
    write_le::<u32>(&mut out, 0);
    write_le::<u32>(&mut out, 16);

    // Data directories
    for directory in 0..16 {
        if directory == CLR_DIRECTORY {
            write_le::<u32>(&mut out, TEXT_RVA);
            write_le::<u32>(&mut out, CLI_HEADER_SIZE);
        } else {
            write_le::<u64>(&mut out, 0);
        }
    }

    // Section table
    out.extend_from_slice(b".text\0\0\0");
    write_le::<u32>(&mut out, text_size);
    write_le::<u32>(&mut out, TEXT_RVA);
    write_le::<u32>(&mut out, raw_size);
    write_le::<u32>(&mut out, FILE_ALIGNMENT);
    write_le::<u32>(&mut out, 0);
    write_le::<u32>(&mut out, 0);
    write_le::<u16>(&mut out, 0);
    write_le::<u16>(&mut out, 0);
    write_le::<u32>(&mut out, 0x6000_0020); // code, execute, read
    out.resize(FILE_ALIGNMENT as usize, 0);

    // CLI header
    write_le::<u32>(&mut out, CLI_HEADER_SIZE);
    write_le::<u16>(&mut out, 2);
    write_le::<u16>(&mut out, 5);
    write_le::<u32>(&mut out, TEXT_RVA + CLI_HEADER_SIZE);
    write_le::<u32>(&mut out, metadata_size);
    write_le::<u32>(&mut out, 0x0000_0001); // IL only
    out.resize((FILE_ALIGNMENT + CLI_HEADER_SIZE) as usize, 0);

    out.extend_from_slice(metadata);
    out.resize((FILE_ALIGNMENT + raw_size) as usize, 0);

    Ok(out)
}

fn align(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}

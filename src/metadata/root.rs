//! Metadata root (ECMA-335 II.24.2.1).
//!
//! The root is the entry point into the metadata: a `BSJB` magic, the runtime version string
//! and the directory of streams that follow it.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// The MAGIC value indicating the CIL header
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// The header of the metadata, with the stream directory.
///
/// # Example
///
/// ```rust
/// use dotbrowse::metadata::root::Root;
/// let root = Root::read(&[
///            0x42, 0x53, 0x4A, 0x42,
///            0x01, 0x00,
///            0x01, 0x00,
///            0x00, 0x00, 0x00, 0x00,
///            0x04, 0x00, 0x00, 0x00,
///            b'v', b'4', 0x00, 0x00,
///            0x00, 0x00,
///            0x01, 0x00,
///            0x20, 0x00, 0x00, 0x00, // StreamHeader
///            0x04, 0x00, 0x00, 0x00,
///            0x23, 0x7E, 0x00, 0x00,
///            0x00, 0x00, 0x00, 0x00,
///        ])?;
/// assert_eq!(root.version, "v4");
/// assert_eq!(root.stream_headers[0].name, "#~");
/// # Ok::<(), dotbrowse::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Root {
    /// Magic signature for physical metadata: 0x424A5342
    pub signature: u32,
    /// `MajorVersion`
    pub major_version: u16,
    /// `MinorVersion`
    pub minor_version: u16,
    /// Number of bytes allocated to hold version string, padded to 4
    pub length: u32,
    /// Runtime version string, e.g. `v4.0.30319`
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// Streams
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Reads the [`Root`] metadata header from the start of `data`.
    ///
    /// # Errors
    /// Returns an error if the data is too short, the signature is invalid, or the stream
    /// directory points outside of `data`.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 20 {
            return Err(OutOfBounds);
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - 0x{:08X}",
                signature
            ));
        }

        let length = read_le_at::<u32>(data, &mut 12)?;
        let Some(version_end) = (length as usize).checked_add(16) else {
            return Err(malformed_error!("Version string length overflow - {}", length));
        };

        let Some(version_bytes) = data.get(16..version_end) else {
            return Err(OutOfBounds);
        };
        let version_len = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_bytes.len());
        let version = String::from_utf8_lossy(&version_bytes[..version_len]).into_owned();

        let mut offset = version_end;
        let flags = read_le_at::<u16>(data, &mut offset)?;
        let stream_count = read_le_at::<u16>(data, &mut offset)?;
        if stream_count == 0 {
            return Err(malformed_error!("No streams present"));
        }

        let mut stream_headers: Vec<StreamHeader> = Vec::with_capacity(stream_count as usize);
        for _ in 0..stream_count {
            let Some(header_data) = data.get(offset..) else {
                return Err(OutOfBounds);
            };

            let header = StreamHeader::from(header_data)?;
            match header.offset.checked_add(header.size) {
                Some(end) if end as usize <= data.len() => {}
                Some(_) => return Err(OutOfBounds),
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        header.offset,
                        header.size
                    ))
                }
            }

            if stream_headers.iter().any(|known| known.name == header.name) {
                return Err(malformed_error!("Duplicate stream - {}", header.name));
            }

            offset += header.header_size();
            stream_headers.push(header);
        }

        Ok(Root {
            signature,
            major_version: read_le_at::<u16>(data, &mut 4)?,
            minor_version: read_le_at::<u16>(data, &mut 6)?,
            length,
            version,
            flags,
            stream_headers,
        })
    }

    /// Find the header of the stream called `name`
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }
}

//! Interning writers for the `#Strings`, `#Blob` and `#GUID` heaps.

use std::collections::HashMap;

use crate::{file::io::write_compressed_uint, Result};

/// `#Strings` heap under construction, equal strings share one entry
pub(crate) struct StringHeap {
    data: Vec<u8>,
    offsets: HashMap<String, u32>,
}

impl StringHeap {
    pub(crate) fn new() -> Self {
        StringHeap {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    /// Offset of `value`, appending it on first use. The empty string is offset 0.
    pub(crate) fn intern(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }
        if let Some(offset) = self.offsets.get(value) {
            return *offset;
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        self.offsets.insert(value.to_string(), offset);
        offset
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn bytes(&self) -> Vec<u8> {
        padded(&self.data)
    }
}

/// `#Blob` heap under construction
pub(crate) struct BlobHeap {
    data: Vec<u8>,
    offsets: HashMap<Vec<u8>, u32>,
}

impl BlobHeap {
    pub(crate) fn new() -> Self {
        BlobHeap {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    /// Offset of `value` with its length prefix, appending it on first use
    pub(crate) fn intern(&mut self, value: &[u8]) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }
        if let Some(offset) = self.offsets.get(value) {
            return Ok(*offset);
        }

        let offset = self.data.len() as u32;
        write_compressed_uint(&mut self.data, value.len() as u32)?;
        self.data.extend_from_slice(value);
        self.offsets.insert(value.to_vec(), offset);
        Ok(offset)
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn bytes(&self) -> Vec<u8> {
        padded(&self.data)
    }
}

/// `#GUID` heap under construction, indices are 1-based
pub(crate) struct GuidHeap {
    data: Vec<u8>,
}

impl GuidHeap {
    pub(crate) fn new() -> Self {
        GuidHeap { data: Vec::new() }
    }

    pub(crate) fn push(&mut self, guid: uguid::Guid) -> u32 {
        self.data.extend_from_slice(&guid.to_bytes());
        (self.data.len() / 16) as u32
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len() / 16
    }

    pub(crate) fn bytes(&self) -> Vec<u8> {
        self.data.clone()
    }
}

/// `data` zero-padded to a multiple of 4 bytes
pub(crate) fn padded(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    out.resize(align4(data.len()), 0);
    out
}

pub(crate) fn align4(value: usize) -> usize {
    (value + 3) & !3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::streams::{Blob, Guid, Strings};

    #[test]
    fn strings_are_shared() {
        let mut heap = StringHeap::new();
        let system = heap.intern("System");
        assert_eq!(system, 1);
        assert_eq!(heap.intern("Object"), 8);
        assert_eq!(heap.intern("System"), system);
        assert_eq!(heap.intern(""), 0);

        let bytes = heap.bytes();
        assert_eq!(bytes.len() % 4, 0);

        let strings = Strings::from(&bytes).unwrap();
        assert_eq!(strings.get(8).unwrap(), "Object");
    }

    #[test]
    fn blobs_carry_their_length() {
        let mut heap = BlobHeap::new();
        let long = vec![0xAB; 0x90];
        let short = heap.intern(&[0x06, 0x08]).unwrap();
        let long_offset = heap.intern(&long).unwrap();
        assert_eq!(heap.intern(&[0x06, 0x08]).unwrap(), short);

        let bytes = heap.bytes();
        let blob = Blob::from(&bytes).unwrap();
        assert_eq!(blob.get(short as usize).unwrap(), &[0x06, 0x08]);
        assert_eq!(blob.get(long_offset as usize).unwrap(), long.as_slice());
    }

    #[test]
    fn guids_are_one_based() {
        let mut heap = GuidHeap::new();
        let guid = uguid::guid!("01234567-89ab-cdef-0123-456789abcdef");
        assert_eq!(heap.push(guid), 1);
        assert_eq!(heap.len(), 1);

        let bytes = heap.bytes();
        assert_eq!(Guid::from(&bytes).unwrap().get(1).unwrap(), guid);
    }
}

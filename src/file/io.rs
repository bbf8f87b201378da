//! Low-level little-endian reading and writing helpers.
//!
//! Everything in ECMA-335 metadata is stored little-endian. The [`CilIO`] trait ties each
//! primitive integer to its fixed-size byte representation, and the free functions below perform
//! the bounds-checked reads on top of it. Heap and table indices can be either 2 or 4 bytes wide
//! depending on the sizes of the referenced heap/table, which is what the `_dyn` variants are for.
//!
//! The writers append to a `Vec<u8>` and are used by the metadata builder.

use crate::{Error::OutOfBounds, Result};

/// Trait for implementing type-specific safe binary data reading operations.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait CilIO: Sized {
    /// Associated type for the byte representation of this type
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Produce the little-endian bytes of this value
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_cilio {
    ($($t:ty),*) => {
        $(
            impl CilIO for $t {
                type Bytes = [u8; std::mem::size_of::<$t>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$t>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$t>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_cilio!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Safely reads a value of type `T` in little-endian byte order from the start of a data buffer.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`, advancing the offset.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = T::Bytes::try_from(&data[*offset..end]) else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Reads either a 4-byte or a 2-byte index, depending on `is_large`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

/// Appends `value` in little-endian byte order.
pub fn write_le<T: CilIO>(data: &mut Vec<u8>, value: T) {
    data.extend_from_slice(value.to_le_bytes().as_ref());
}

/// Appends either a 4-byte or a 2-byte index, depending on `is_large`.
///
/// # Errors
/// Returns a malformed error if a small index does not fit into 16 bits.
pub fn write_le_dyn(data: &mut Vec<u8>, value: u32, is_large: bool) -> Result<()> {
    if is_large {
        write_le::<u32>(data, value);
    } else {
        let Ok(small) = u16::try_from(value) else {
            return Err(malformed_error!("Index {} does not fit a small column", value));
        };
        write_le::<u16>(data, small);
    }

    Ok(())
}

/// Appends `value` as a compressed unsigned integer (ECMA-335 II.23.2).
///
/// # Errors
/// Returns a malformed error for values above `0x1FFF_FFFF`.
pub fn write_compressed_uint(data: &mut Vec<u8>, value: u32) -> Result<()> {
    match value {
        0..=0x7F => data.push(value as u8),
        0x80..=0x3FFF => {
            data.push(0x80 | (value >> 8) as u8);
            data.push(value as u8);
        }
        0x4000..=0x1FFF_FFFF => {
            data.push(0xC0 | (value >> 24) as u8);
            data.push((value >> 16) as u8);
            data.push((value >> 8) as u8);
            data.push(value as u8);
        }
        _ => {
            return Err(malformed_error!(
                "Value {} can not be compressed",
                value
            ))
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u8() {
        let result = read_le::<u8>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x01);
    }

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_le_u32() {
        let result = read_le::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0403_0201);
    }

    #[test]
    fn read_le_u64() {
        let result = read_le::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0807_0605_0403_0201);
    }

    #[test]
    fn read_le_at_advances() {
        let mut offset = 2;
        assert_eq!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap(), 0x0403);
        assert_eq!(offset, 4);
        assert_eq!(read_le_at::<i8>(&TEST_BUFFER, &mut offset).unwrap(), 0x05);
        assert_eq!(offset, 5);
    }

    #[test]
    fn read_le_dyn() {
        let mut offset = 0;
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, false).unwrap(), 0x0201);
        assert_eq!(offset, 2);
        assert_eq!(
            read_le_at_dyn(&TEST_BUFFER, &mut offset, true).unwrap(),
            0x0605_0403
        );
        assert_eq!(offset, 6);
    }

    #[test]
    fn errors() {
        let buffer = [0xFF, 0xFF, 0xFF, 0xFF];

        let result = read_le::<u64>(&buffer);
        assert!(matches!(result, Err(OutOfBounds)));

        let mut offset = usize::MAX;
        let result = read_le_at::<u16>(&buffer, &mut offset);
        assert!(matches!(result, Err(OutOfBounds)));
    }

    #[test]
    fn write_dyn() {
        let mut out = Vec::new();
        write_le_dyn(&mut out, 0x1234, false).unwrap();
        write_le_dyn(&mut out, 0x1234, true).unwrap();
        write_le::<u8>(&mut out, 0xAB);
        assert_eq!(out, [0x34, 0x12, 0x34, 0x12, 0x00, 0x00, 0xAB]);

        assert!(write_le_dyn(&mut out, 0x1_0000, false).is_err());
    }

    #[test]
    fn compressed() {
        let mut out = Vec::new();
        write_compressed_uint(&mut out, 0x03).unwrap();
        write_compressed_uint(&mut out, 0x80).unwrap();
        write_compressed_uint(&mut out, 0x2E57).unwrap();
        write_compressed_uint(&mut out, 0x4000).unwrap();
        assert_eq!(out, [0x03, 0x80, 0x80, 0xAE, 0x57, 0xC0, 0x00, 0x40, 0x00]);

        assert!(write_compressed_uint(&mut out, 0x2000_0000).is_err());
    }
}

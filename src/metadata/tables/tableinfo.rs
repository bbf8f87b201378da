//! Row counts and index widths of a metadata tables stream.

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    metadata::tables::{columns, CodedIndex, CodedIndexType, Column, TableId},
    Error::OutOfBounds,
    Result,
};

/// Heap size flag: `#Strings` indices are 4 bytes
pub const HEAP_LARGE_STRINGS: u8 = 0x01;
/// Heap size flag: `#GUID` indices are 4 bytes
pub const HEAP_LARGE_GUID: u8 = 0x02;
/// Heap size flag: `#Blob` indices are 4 bytes
pub const HEAP_LARGE_BLOB: u8 = 0x04;
/// Heap size flag: an extra 4 bytes follow the row counts
pub const HEAP_EXTRA_DATA: u8 = 0x40;

/// Row counts of all tables, plus everything needed to compute column widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    rows: [u32; TableId::COUNT],
    heap_sizes: u8,
}

impl TableInfo {
    /// Create size information from the heap size flags and the row counts of present tables
    #[must_use]
    pub fn new(heap_sizes: u8, row_counts: &[(TableId, u32)]) -> TableInfo {
        let mut rows = [0; TableId::COUNT];
        for (table, count) in row_counts {
            rows[*table as usize] = *count;
        }

        TableInfo { rows, heap_sizes }
    }

    /// Number of rows of `table`
    #[must_use]
    pub fn rows(&self, table: TableId) -> u32 {
        self.rows[table as usize]
    }

    /// The heap size flags
    #[must_use]
    pub fn heap_sizes(&self) -> u8 {
        self.heap_sizes
    }

    /// True if a simple index into `table` needs 4 bytes
    #[must_use]
    pub fn is_large(&self, table: TableId) -> bool {
        self.rows(table) > u32::from(u16::MAX)
    }

    /// True if a coded index of kind `coded` needs 4 bytes
    #[must_use]
    pub fn is_large_coded(&self, coded: CodedIndexType) -> bool {
        let limit = 1_u32 << (16 - coded.tag_bits());
        coded
            .tables()
            .iter()
            .flatten()
            .any(|table| self.rows(*table) >= limit)
    }

    /// Width of `column` in bytes
    #[must_use]
    pub fn column_size(&self, column: Column) -> usize {
        let large = match column {
            Column::U16 => false,
            Column::U32 => true,
            Column::Str => self.heap_sizes & HEAP_LARGE_STRINGS != 0,
            Column::Guid => self.heap_sizes & HEAP_LARGE_GUID != 0,
            Column::Blob => self.heap_sizes & HEAP_LARGE_BLOB != 0,
            Column::Table(table) => self.is_large(table),
            Column::Coded(coded) => self.is_large_coded(coded),
        };

        if large {
            4
        } else {
            2
        }
    }

    /// Width of one row of `table` in bytes
    #[must_use]
    pub fn row_size(&self, table: TableId) -> usize {
        columns(table)
            .iter()
            .map(|column| self.column_size(*column))
            .sum()
    }

    /// Total number of bytes occupied by the rows of all tables
    #[must_use]
    pub fn tables_size(&self) -> usize {
        TableId::iter()
            .map(|table| self.row_size(table) * self.rows(table) as usize)
            .sum()
    }

    /// Split a raw coded index value into table and row
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for a tag that does not name a table.
    pub fn decode_coded_index(&self, value: u32, coded: CodedIndexType) -> Result<CodedIndex> {
        let tag_bits = coded.tag_bits();
        let tag = (value & ((1 << tag_bits) - 1)) as usize;

        match coded.tables().get(tag) {
            Some(Some(table)) => Ok(CodedIndex::new(*table, value >> tag_bits)),
            _ => Err(OutOfBounds),
        }
    }

    /// Pack a reference into a raw coded index value
    ///
    /// # Errors
    /// Returns a malformed error if `coded` cannot address `index.tag`.
    pub fn encode_coded_index(&self, index: CodedIndex, coded: CodedIndexType) -> Result<u32> {
        let Some(tag) = coded
            .tables()
            .iter()
            .position(|table| *table == Some(index.tag))
        else {
            return Err(malformed_error!(
                "{} can not be addressed by {:?}",
                index.tag,
                coded
            ));
        };

        Ok((index.row << coded.tag_bits()) | tag as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_indices() {
        let info = TableInfo::new(0, &[(TableId::TypeDef, 10), (TableId::Field, 3)]);

        assert_eq!(info.rows(TableId::TypeDef), 10);
        assert_eq!(info.rows(TableId::MethodDef), 0);
        // flags, name, namespace, extends, field list, method list
        assert_eq!(info.row_size(TableId::TypeDef), 4 + 2 + 2 + 2 + 2 + 2);
        assert_eq!(info.row_size(TableId::Field), 6);
        assert_eq!(info.tables_size(), 10 * 14 + 3 * 6);
    }

    #[test]
    fn large_indices() {
        let info = TableInfo::new(
            HEAP_LARGE_STRINGS | HEAP_LARGE_BLOB,
            &[(TableId::TypeRef, 0x4000), (TableId::MethodDef, 0x1_0000)],
        );

        // TypeDefOrRef has 2 tag bits, so 2^14 TypeRef rows no longer fit
        assert!(info.is_large_coded(CodedIndexType::TypeDefOrRef));
        assert!(!info.is_large_coded(CodedIndexType::HasSemantics));
        assert!(info.is_large(TableId::MethodDef));
        assert!(!info.is_large(TableId::Field));
        assert_eq!(info.row_size(TableId::TypeDef), 4 + 4 + 4 + 4 + 2 + 4);
        assert_eq!(info.row_size(TableId::Field), 2 + 4 + 4);
    }

    #[test]
    fn coded_roundtrip_and_invalid_tags() {
        let info = TableInfo::new(0, &[]);

        let decoded = info
            .decode_coded_index(0x0000_0031, CodedIndexType::TypeDefOrRef)
            .unwrap();
        assert_eq!(decoded.tag, TableId::TypeRef);
        assert_eq!(decoded.row, 0x0C);

        let encoded = info
            .encode_coded_index(CodedIndex::new(TableId::Property, 4), CodedIndexType::HasSemantics)
            .unwrap();
        assert_eq!(encoded, (4 << 1) | 1);

        assert!(info
            .decode_coded_index(0x03, CodedIndexType::TypeDefOrRef)
            .is_err());
        assert!(info
            .decode_coded_index(0x00, CodedIndexType::CustomAttributeType)
            .is_err());
        assert!(info
            .encode_coded_index(CodedIndex::new(TableId::Field, 1), CodedIndexType::TypeDefOrRef)
            .is_err());
    }
}

//! The metadata tables stream (`#~`, ECMA-335 II.24.2.6).
//!
//! After a small header carrying the heap size flags and the valid/sorted masks, the stream
//! holds one row count per present table, followed by the rows of all present tables in table
//! number order. Rows are decoded through [`super::columns`] into plain `u32` column values;
//! strings, blobs and coded indices are resolved later by the typed row readers.

use strum::IntoEnumIterator;

use crate::{
    file::io::{read_le, read_le_at, read_le_at_dyn},
    metadata::tables::{columns, TableId, TableInfo, HEAP_EXTRA_DATA},
    Error::OutOfBounds,
    Result,
};

/// The decoded rows of one table
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    width: usize,
    values: Vec<u32>,
}

impl RawTable {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> u32 {
        if self.width == 0 {
            0
        } else {
            (self.values.len() / self.width) as u32
        }
    }

    /// True if the table holds no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Column values of the row with 1-based id `rid`
    #[must_use]
    pub fn row(&self, rid: u32) -> Option<&[u32]> {
        if rid == 0 || rid > self.len() {
            return None;
        }

        let start = (rid as usize - 1) * self.width;
        self.values.get(start..start + self.width)
    }
}

/// The parsed `#~` stream
///
/// # Examples
///
/// ```rust,no_run
/// use dotbrowse::metadata::tables::{TableId, TablesHeader};
///
/// # fn stream() -> &'static [u8] { &[] }
/// let tables = TablesHeader::from(stream())?;
/// println!("{} types defined", tables.row_count(TableId::TypeDef));
/// # Ok::<(), dotbrowse::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TablesHeader {
    /// Major version of the table schema, shall be 2
    pub major_version: u8,
    /// Minor version of the table schema, shall be 0
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    info: TableInfo,
    tables: Vec<RawTable>,
}

impl TablesHeader {
    /// Parse the tables stream
    ///
    /// # Errors
    /// Returns an error if the stream is truncated or declares more rows than it holds.
    pub fn from(data: &[u8]) -> Result<TablesHeader> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let major_version = read_le::<u8>(&data[4..])?;
        let minor_version = read_le::<u8>(&data[5..])?;
        let heap_sizes = read_le::<u8>(&data[6..])?;
        let valid = read_le::<u64>(&data[8..])?;
        let sorted = read_le::<u64>(&data[16..])?;

        let mut offset = 24_usize;
        let mut row_counts = Vec::new();
        for bit in 0..64_u8 {
            if valid & (1 << bit) == 0 {
                continue;
            }

            let count = read_le_at::<u32>(data, &mut offset)?;
            if let Some(table) = TableId::from_u8(bit) {
                row_counts.push((table, count));
            }
        }

        if heap_sizes & HEAP_EXTRA_DATA != 0 {
            offset += 4;
        }

        let info = TableInfo::new(heap_sizes, &row_counts);

        let mut tables = Vec::with_capacity(TableId::iter().len());
        for table in TableId::iter() {
            let layout = columns(table);
            let rows = info.rows(table) as usize;

            let Some(table_size) = info.row_size(table).checked_mul(rows) else {
                return Err(malformed_error!("Table {} size overflows", table));
            };
            match offset.checked_add(table_size) {
                Some(end) if end <= data.len() => {}
                _ => {
                    return Err(malformed_error!(
                        "Table {} with {} rows exceeds the stream",
                        table,
                        rows
                    ))
                }
            }

            let mut values = Vec::with_capacity(rows * layout.len());
            for _ in 0..rows {
                for column in layout {
                    let is_large = info.column_size(*column) == 4;
                    values.push(read_le_at_dyn(data, &mut offset, is_large)?);
                }
            }

            tables.push(RawTable {
                width: layout.len(),
                values,
            });
        }

        Ok(TablesHeader {
            major_version,
            minor_version,
            valid,
            sorted,
            info,
            tables,
        })
    }

    /// Size information of this stream
    #[must_use]
    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    /// Number of rows in `table`
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.info.rows(table)
    }

    /// The decoded rows of `table`
    #[must_use]
    pub fn table(&self, table: TableId) -> &RawTable {
        &self.tables[table as usize]
    }

    /// Number of tables which hold at least one row
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.iter().filter(|table| !table.is_empty()).count()
    }
}

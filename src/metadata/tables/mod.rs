//! Metadata tables (ECMA-335 II.22 and II.24.2.6).
//!
//! The `#~` stream is decoded in two steps:
//!
//! 1. [`TablesHeader`] reads the row counts and decodes every row of every table through the
//!    column layout in [`columns`], yielding raw `u32` column values.
//! 2. [`RowReadable`] implementations turn the rows of the tables the browser needs into owned,
//!    typed rows ([`TypeDefRow`], [`MethodDefRow`], ...).
//!
//! Column widths (2 or 4 bytes) are derived from the heap size flags and row counts by
//! [`TableInfo`].

mod codedindex;
mod rows;
mod schema;
mod tableid;
mod tableinfo;
mod tablesheader;

pub use codedindex::{CodedIndex, CodedIndexType};
pub use rows::*;
pub use schema::{columns, Column};
pub use tableid::TableId;
pub use tableinfo::{
    TableInfo, HEAP_EXTRA_DATA, HEAP_LARGE_BLOB, HEAP_LARGE_GUID, HEAP_LARGE_STRINGS,
};
pub use tablesheader::{RawTable, TablesHeader};

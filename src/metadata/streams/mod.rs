//! Metadata streams.
//!
//! The metadata root is followed by a directory of streams. The browser reads four of them:
//!
//! - **`#~`** (or the uncompressed `#-`) - the metadata tables, see [`crate::metadata::tables`]
//! - **`#Strings`** - NUL-terminated UTF-8 identifiers, see [`Strings`]
//! - **`#Blob`** - length-prefixed binary data such as signatures, see [`Blob`]
//! - **`#GUID`** - the module version id, see [`Guid`]
//!
//! `#US` is accepted in the directory but never dereferenced, string literals play no role in
//! declaration rendering.
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2.2 - Stream Headers

mod blob;
mod guid;
mod streamheader;
mod strings;

pub use blob::Blob;
pub use guid::Guid;
pub use streamheader::{StreamHeader, STREAM_NAMES};
pub use strings::Strings;

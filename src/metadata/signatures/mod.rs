//! Signature blobs (ECMA-335 II.23.2).
//!
//! Fields, methods, properties and type specifications describe their types in compact
//! binary signatures stored on the `#Blob` heap. [`SignatureParser`] decodes them into the
//! structures of this module, the resolver in [`crate::metadata::typesystem`] then turns the
//! contained [`TypeSignature`]s into fully named types.
//!
//! Custom modifiers are kept where the grammar places them but play no role in rendering.
//!
//! # Examples
//!
//! ```rust
//! use dotbrowse::metadata::signatures::{parse_field_signature, TypeSignature};
//!
//! let field = parse_field_signature(&[0x06, 0x1D, 0x08])?;
//! assert!(matches!(field.base, TypeSignature::SzArray(_)));
//! # Ok::<(), dotbrowse::Error>(())
//! ```

mod encoders;
mod parser;
mod types;

pub use encoders::*;
pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a `MethodDefSig` from a byte slice
///
/// # Errors
/// Returns an error if the signature data is malformed.
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    SignatureParser::new(data).parse_method_signature()
}

/// Parse a `FieldSig` from a byte slice
///
/// # Errors
/// Returns an error if the signature data is malformed.
pub fn parse_field_signature(data: &[u8]) -> Result<SignatureField> {
    SignatureParser::new(data).parse_field_signature()
}

/// Parse a `PropertySig` from a byte slice
///
/// # Errors
/// Returns an error if the signature data is malformed.
pub fn parse_property_signature(data: &[u8]) -> Result<SignatureProperty> {
    SignatureParser::new(data).parse_property_signature()
}

/// Parse a `TypeSpec` blob from a byte slice
///
/// # Errors
/// Returns an error if the signature data is malformed.
pub fn parse_type_spec_signature(data: &[u8]) -> Result<SignatureTypeSpec> {
    SignatureParser::new(data).parse_type_spec_signature()
}

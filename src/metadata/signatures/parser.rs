//! Recursive descent decoder for signature blobs.

use crate::{
    file::parser::Parser,
    metadata::{
        signatures::{
            calling_convention as CC, element_type as ET, ArrayDimensions, SignatureArray,
            SignatureField, SignatureMethod, SignatureParameter, SignaturePointer,
            SignatureProperty, SignatureSzArray, SignatureTypeSpec, TypeSignature,
        },
        token::Token,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum nesting of types inside one signature
pub const MAX_RECURSION_DEPTH: usize = 50;

/// Decoder for the signature blobs of ECMA-335 II.23.2
///
/// # Examples
///
/// ```rust
/// use dotbrowse::metadata::signatures::{SignatureParser, TypeSignature};
///
/// // instance void (int32, string)
/// let mut parser = SignatureParser::new(&[0x20, 0x02, 0x01, 0x08, 0x0E]);
/// let method = parser.parse_method_signature()?;
///
/// assert!(method.has_this);
/// assert_eq!(method.return_type.base, TypeSignature::Void);
/// assert_eq!(method.params.len(), 2);
/// # Ok::<(), dotbrowse::Error>(())
/// ```
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a decoder over one signature blob
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
        }
    }

    fn parse_type(&mut self) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let result = self.parse_type_inner();
        self.depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<TypeSignature> {
        let current_byte = self.parser.read_le::<u8>()?;
        match current_byte {
            ET::VOID => Ok(TypeSignature::Void),
            ET::BOOLEAN => Ok(TypeSignature::Boolean),
            ET::CHAR => Ok(TypeSignature::Char),
            ET::I1 => Ok(TypeSignature::I1),
            ET::U1 => Ok(TypeSignature::U1),
            ET::I2 => Ok(TypeSignature::I2),
            ET::U2 => Ok(TypeSignature::U2),
            ET::I4 => Ok(TypeSignature::I4),
            ET::U4 => Ok(TypeSignature::U4),
            ET::I8 => Ok(TypeSignature::I8),
            ET::U8 => Ok(TypeSignature::U8),
            ET::R4 => Ok(TypeSignature::R4),
            ET::R8 => Ok(TypeSignature::R8),
            ET::STRING => Ok(TypeSignature::String),
            ET::PTR => Ok(TypeSignature::Ptr(SignaturePointer {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            })),
            ET::BYREF => Ok(TypeSignature::ByRef(Box::new(self.parse_type()?))),
            ET::VALUETYPE => Ok(TypeSignature::ValueType(self.parser.read_compressed_token()?)),
            ET::CLASS => Ok(TypeSignature::Class(self.parser.read_compressed_token()?)),
            ET::VAR => Ok(TypeSignature::GenericParamType(
                self.parser.read_compressed_uint()?,
            )),
            ET::ARRAY => {
                let base = self.parse_type()?;
                let rank = self.parser.read_compressed_uint()?;

                let num_sizes = self.parser.read_compressed_uint()?;
                let mut sizes = Vec::with_capacity(num_sizes.min(rank) as usize);
                for _ in 0..num_sizes {
                    sizes.push(self.parser.read_compressed_uint()?);
                }

                let num_lo_bounds = self.parser.read_compressed_uint()?;
                let mut lo_bounds = Vec::with_capacity(num_lo_bounds.min(rank) as usize);
                for _ in 0..num_lo_bounds {
                    lo_bounds.push(self.parser.read_compressed_int()?);
                }

                let dimensions = (0..rank as usize)
                    .map(|i| ArrayDimensions {
                        size: sizes.get(i).copied(),
                        lower_bound: lo_bounds.get(i).copied(),
                    })
                    .collect();

                Ok(TypeSignature::Array(SignatureArray {
                    base: Box::new(base),
                    rank,
                    dimensions,
                }))
            }
            ET::GENERICINST => {
                let peek_byte = self.parser.peek_byte()?;
                if peek_byte != ET::CLASS && peek_byte != ET::VALUETYPE {
                    return Err(malformed_error!(
                        "GENERICINST - Next byte is not TYPE_CLASS or TYPE_VALUE - {}",
                        peek_byte
                    ));
                }

                let base_type = self.parse_type()?;
                let arg_count = self.parser.read_compressed_uint()?;

                let mut type_args = Vec::with_capacity(arg_count.min(64) as usize);
                for _ in 0..arg_count {
                    type_args.push(self.parse_type()?);
                }

                Ok(TypeSignature::GenericInst(Box::new(base_type), type_args))
            }
            ET::TYPEDBYREF => Ok(TypeSignature::TypedByRef),
            ET::I => Ok(TypeSignature::I),
            ET::U => Ok(TypeSignature::U),
            ET::FNPTR => Ok(TypeSignature::FnPtr(Box::new(self.parse_method_signature()?))),
            ET::OBJECT => Ok(TypeSignature::Object),
            ET::SZARRAY => Ok(TypeSignature::SzArray(SignatureSzArray {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            })),
            ET::MVAR => Ok(TypeSignature::GenericParamMethod(
                self.parser.read_compressed_uint()?,
            )),
            ET::CMOD_REQD | ET::CMOD_OPT => {
                // Modifiers in type position carry no rendering information
                self.parser.read_compressed_token()?;
                self.parse_custom_mods()?;
                self.parse_type()
            }
            ET::PINNED => Ok(TypeSignature::Pinned(Box::new(self.parse_type()?))),
            _ => Err(malformed_error!(
                "Unsupported ELEMENT_TYPE - {}",
                current_byte
            )),
        }
    }

    fn parse_custom_mods(&mut self) -> Result<Vec<Token>> {
        let mut mods = Vec::new();

        while self.parser.has_more_data() {
            let next_byte = self.parser.peek_byte()?;
            if next_byte != ET::CMOD_REQD && next_byte != ET::CMOD_OPT {
                break;
            }

            self.parser.read_le::<u8>()?;
            mods.push(self.parser.read_compressed_token()?);
        }

        Ok(mods)
    }

    fn parse_param(&mut self) -> Result<SignatureParameter> {
        let modifiers = self.parse_custom_mods()?;

        let mut by_ref = false;
        if self.parser.peek_byte()? == ET::BYREF {
            self.parser.read_le::<u8>()?;
            by_ref = true;
        }

        Ok(SignatureParameter {
            modifiers,
            by_ref,
            base: self.parse_type()?,
        })
    }

    /// Decode a `MethodDefSig`, `MethodRefSig` or `StandAloneMethodSig`
    ///
    /// # Errors
    /// Returns an error for truncated or malformed signatures.
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        let convention_byte = self.parser.read_le::<u8>()?;

        let param_count_generic = if convention_byte & CC::GENERIC != 0 {
            self.parser.read_compressed_uint()?
        } else {
            0
        };

        let param_count = self.parser.read_compressed_uint()?;
        let return_type = self.parse_param()?;

        let mut params = Vec::with_capacity(param_count.min(256) as usize);
        let mut varargs = Vec::new();
        let mut after_sentinel = false;
        for _ in 0..param_count {
            if self.parser.peek_byte()? == ET::SENTINEL {
                self.parser.read_le::<u8>()?;
                after_sentinel = true;
            }

            let param = self.parse_param()?;
            if after_sentinel {
                varargs.push(param);
            } else {
                params.push(param);
            }
        }

        Ok(SignatureMethod {
            has_this: convention_byte & CC::HASTHIS != 0,
            explicit_this: convention_byte & CC::EXPLICITTHIS != 0,
            vararg: convention_byte & CC::KIND_MASK == CC::VARARG,
            calling_convention: convention_byte & CC::KIND_MASK,
            param_count_generic,
            return_type,
            params,
            varargs,
        })
    }

    /// Decode a `FieldSig`
    ///
    /// # Errors
    /// Returns an error if the blob does not start with the FIELD marker or is malformed.
    pub fn parse_field_signature(&mut self) -> Result<SignatureField> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != CC::FIELD {
            return Err(malformed_error!(
                "SignatureField - invalid start - {}",
                head_byte
            ));
        }

        Ok(SignatureField {
            modifiers: self.parse_custom_mods()?,
            base: self.parse_type()?,
        })
    }

    /// Decode a `PropertySig`
    ///
    /// # Errors
    /// Returns an error if the blob does not start with the PROPERTY marker or is malformed.
    pub fn parse_property_signature(&mut self) -> Result<SignatureProperty> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte & CC::PROPERTY == 0 {
            return Err(malformed_error!(
                "SignatureProperty - invalid start - {}",
                head_byte
            ));
        }

        let param_count = self.parser.read_compressed_uint()?;
        let modifiers = self.parse_custom_mods()?;
        let base = self.parse_type()?;

        let mut params = Vec::with_capacity(param_count.min(256) as usize);
        for _ in 0..param_count {
            params.push(self.parse_param()?);
        }

        Ok(SignatureProperty {
            has_this: head_byte & CC::HASTHIS != 0,
            modifiers,
            base,
            params,
        })
    }

    /// Decode a `TypeSpec` blob
    ///
    /// # Errors
    /// Returns an error for truncated or malformed signatures.
    pub fn parse_type_spec_signature(&mut self) -> Result<SignatureTypeSpec> {
        Ok(SignatureTypeSpec {
            base: self.parse_type()?,
        })
    }
}

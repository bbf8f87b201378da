//! Decoded signature structures.

use crate::metadata::token::Token;

/// Element type constants of ECMA-335 II.23.1.16
#[allow(missing_docs)]
pub mod element_type {
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    pub const PTR: u8 = 0x0f;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1b;
    pub const OBJECT: u8 = 0x1c;
    pub const SZARRAY: u8 = 0x1d;
    pub const MVAR: u8 = 0x1e;
    pub const CMOD_REQD: u8 = 0x1f;
    pub const CMOD_OPT: u8 = 0x20;
    pub const INTERNAL: u8 = 0x21;
    pub const MODIFIER: u8 = 0x40;
    pub const SENTINEL: u8 = 0x41;
    pub const PINNED: u8 = 0x45;
}

/// Calling convention bits of the leading signature byte (II.23.2.1 - II.23.2.5)
#[allow(missing_docs)]
pub mod calling_convention {
    pub const DEFAULT: u8 = 0x00;
    pub const VARARG: u8 = 0x05;
    pub const FIELD: u8 = 0x06;
    pub const PROPERTY: u8 = 0x08;
    pub const GENERIC: u8 = 0x10;
    pub const HASTHIS: u8 = 0x20;
    pub const EXPLICITTHIS: u8 = 0x40;
    pub const KIND_MASK: u8 = 0x0F;
}

/// A type as it appears inside a signature blob
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TypeSignature {
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    String,
    /// Unmanaged pointer, `T*`
    Ptr(SignaturePointer),
    /// Managed reference, `T&`
    ByRef(Box<TypeSignature>),
    /// A value type, referenced by a `TypeDef`, `TypeRef` or `TypeSpec` token
    ValueType(Token),
    /// A reference type, referenced by a `TypeDef`, `TypeRef` or `TypeSpec` token
    Class(Token),
    /// Generic parameter of the enclosing type (`!n`)
    GenericParamType(u32),
    /// Multi-dimensional array
    Array(SignatureArray),
    /// Instantiation of a generic type definition with type arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    TypedByRef,
    /// Native integer, `System.IntPtr`
    I,
    /// Native unsigned integer, `System.UIntPtr`
    U,
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    Object,
    /// Single-dimensional, zero based array
    SzArray(SignatureSzArray),
    /// Generic parameter of the enclosing method (`!!n`)
    GenericParamMethod(u32),
    /// Pinned local
    Pinned(Box<TypeSignature>),
}

/// One dimension of a [`SignatureArray`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayDimensions {
    /// Number of elements, if specified
    pub size: Option<u32>,
    /// Lower bound, if specified
    pub lower_bound: Option<i32>,
}

/// A multi-dimensional array `T[,]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureArray {
    /// Element type
    pub base: Box<TypeSignature>,
    /// Number of dimensions
    pub rank: u32,
    /// Sizes and lower bounds, one entry per dimension
    pub dimensions: Vec<ArrayDimensions>,
}

/// A single-dimensional array `T[]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSzArray {
    /// Custom modifiers applied to the element type
    pub modifiers: Vec<Token>,
    /// Element type
    pub base: Box<TypeSignature>,
}

/// An unmanaged pointer `T*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePointer {
    /// Custom modifiers applied to the pointee
    pub modifiers: Vec<Token>,
    /// Pointee type
    pub base: Box<TypeSignature>,
}

/// A parameter or return type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParameter {
    /// Custom modifiers (`modreq`/`modopt`) in front of the type
    pub modifiers: Vec<Token>,
    /// True for `ref`/`out` parameters
    pub by_ref: bool,
    /// The parameter type
    pub base: TypeSignature,
}

/// A method definition or function pointer signature (II.23.2.1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureMethod {
    /// Instance method, `this` is passed implicitly
    pub has_this: bool,
    /// `this` is the first explicit parameter
    pub explicit_this: bool,
    /// Variable argument list
    pub vararg: bool,
    /// The calling convention kind (low four bits)
    pub calling_convention: u8,
    /// Number of generic method parameters, 0 for non-generic methods
    pub param_count_generic: u32,
    /// Return type
    pub return_type: SignatureParameter,
    /// Fixed parameters
    pub params: Vec<SignatureParameter>,
    /// Parameters after the sentinel, call sites only
    pub varargs: Vec<SignatureParameter>,
}

/// A field signature (II.23.2.4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureField {
    /// Custom modifiers in front of the field type
    pub modifiers: Vec<Token>,
    /// The field type
    pub base: TypeSignature,
}

/// A property signature (II.23.2.5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureProperty {
    /// Instance property
    pub has_this: bool,
    /// Custom modifiers in front of the property type
    pub modifiers: Vec<Token>,
    /// The property type
    pub base: TypeSignature,
    /// Indexer parameters
    pub params: Vec<SignatureParameter>,
}

/// A `TypeSpec` blob (II.23.2.14)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureTypeSpec {
    /// The specified type
    pub base: TypeSignature,
}

impl TypeSignature {
    /// Single element type byte of the primitive signatures, `None` for composite ones
    #[must_use]
    pub fn primitive_element_type(&self) -> Option<u8> {
        use element_type as ET;

        let value = match self {
            TypeSignature::Void => ET::VOID,
            TypeSignature::Boolean => ET::BOOLEAN,
            TypeSignature::Char => ET::CHAR,
            TypeSignature::I1 => ET::I1,
            TypeSignature::U1 => ET::U1,
            TypeSignature::I2 => ET::I2,
            TypeSignature::U2 => ET::U2,
            TypeSignature::I4 => ET::I4,
            TypeSignature::U4 => ET::U4,
            TypeSignature::I8 => ET::I8,
            TypeSignature::U8 => ET::U8,
            TypeSignature::R4 => ET::R4,
            TypeSignature::R8 => ET::R8,
            TypeSignature::String => ET::STRING,
            TypeSignature::TypedByRef => ET::TYPEDBYREF,
            TypeSignature::I => ET::I,
            TypeSignature::U => ET::U,
            TypeSignature::Object => ET::OBJECT,
            _ => return None,
        };

        Some(value)
    }
}

impl SignatureParameter {
    /// A plain parameter of type `base`, without modifiers
    #[must_use]
    pub fn new(base: TypeSignature) -> Self {
        SignatureParameter {
            modifiers: Vec::new(),
            by_ref: false,
            base,
        }
    }
}

impl SignatureMethod {
    /// A default calling convention method signature
    #[must_use]
    pub fn new(has_this: bool, return_type: TypeSignature, params: Vec<TypeSignature>) -> Self {
        SignatureMethod {
            has_this,
            explicit_this: false,
            vararg: false,
            calling_convention: calling_convention::DEFAULT,
            param_count_generic: 0,
            return_type: SignatureParameter::new(return_type),
            params: params.into_iter().map(SignatureParameter::new).collect(),
            varargs: Vec::new(),
        }
    }
}

//! The CLR primitive types and the other well-known `System` types signatures name directly.

use crate::metadata::{
    signatures::TypeSignature,
    token::Token,
    typesystem::{CilFlavor, CilType, TypeAttributes},
};

/// Namespace of all built-in types
pub const SYSTEM_NAMESPACE: &str = "System";

/// The CLR primitive types (`Type.IsPrimitive`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum CilPrimitiveKind {
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
    I,
    U,
}

impl CilPrimitiveKind {
    /// Every primitive kind
    pub const ALL: [CilPrimitiveKind; 14] = [
        CilPrimitiveKind::Boolean,
        CilPrimitiveKind::Char,
        CilPrimitiveKind::I1,
        CilPrimitiveKind::U1,
        CilPrimitiveKind::I2,
        CilPrimitiveKind::U2,
        CilPrimitiveKind::I4,
        CilPrimitiveKind::U4,
        CilPrimitiveKind::I8,
        CilPrimitiveKind::U8,
        CilPrimitiveKind::R4,
        CilPrimitiveKind::R8,
        CilPrimitiveKind::I,
        CilPrimitiveKind::U,
    ];

    /// Simple name of the type in the `System` namespace
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CilPrimitiveKind::Boolean => "Boolean",
            CilPrimitiveKind::Char => "Char",
            CilPrimitiveKind::I1 => "SByte",
            CilPrimitiveKind::U1 => "Byte",
            CilPrimitiveKind::I2 => "Int16",
            CilPrimitiveKind::U2 => "UInt16",
            CilPrimitiveKind::I4 => "Int32",
            CilPrimitiveKind::U4 => "UInt32",
            CilPrimitiveKind::I8 => "Int64",
            CilPrimitiveKind::U8 => "UInt64",
            CilPrimitiveKind::R4 => "Single",
            CilPrimitiveKind::R8 => "Double",
            CilPrimitiveKind::I => "IntPtr",
            CilPrimitiveKind::U => "UIntPtr",
        }
    }

    /// The primitive called `name` in the `System` namespace
    #[must_use]
    pub fn from_name(name: &str) -> Option<CilPrimitiveKind> {
        CilPrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
    }
}

/// The built-in type a signature names with a single element type, `None` for composites
#[must_use]
pub fn well_known(signature: &TypeSignature) -> Option<CilType> {
    let primitive = match signature {
        TypeSignature::Boolean => CilPrimitiveKind::Boolean,
        TypeSignature::Char => CilPrimitiveKind::Char,
        TypeSignature::I1 => CilPrimitiveKind::I1,
        TypeSignature::U1 => CilPrimitiveKind::U1,
        TypeSignature::I2 => CilPrimitiveKind::I2,
        TypeSignature::U2 => CilPrimitiveKind::U2,
        TypeSignature::I4 => CilPrimitiveKind::I4,
        TypeSignature::U4 => CilPrimitiveKind::U4,
        TypeSignature::I8 => CilPrimitiveKind::I8,
        TypeSignature::U8 => CilPrimitiveKind::U8,
        TypeSignature::R4 => CilPrimitiveKind::R4,
        TypeSignature::R8 => CilPrimitiveKind::R8,
        // Function pointers are surfaced as native integers
        TypeSignature::I | TypeSignature::FnPtr(_) => CilPrimitiveKind::I,
        TypeSignature::U => CilPrimitiveKind::U,
        TypeSignature::Void => return Some(system_struct("Void")),
        TypeSignature::TypedByRef => return Some(system_struct("TypedReference")),
        TypeSignature::String => return Some(system_class("String", true)),
        TypeSignature::Object => return Some(system_class("Object", false)),
        _ => return None,
    };

    Some(primitive_type(primitive))
}

/// The well-known type called `System.{name}`, if there is one
#[must_use]
pub fn well_known_by_name(name: &str) -> Option<CilType> {
    if let Some(kind) = CilPrimitiveKind::from_name(name) {
        return Some(primitive_type(kind));
    }

    match name {
        "Void" | "TypedReference" => Some(system_struct(name)),
        "String" => Some(system_class(name, true)),
        "Object" => Some(system_class(name, false)),
        _ => None,
    }
}

/// `System.{kind}` as a public sealed primitive
#[must_use]
pub fn primitive_type(kind: CilPrimitiveKind) -> CilType {
    CilType::external(
        Token::new(0),
        Some(SYSTEM_NAMESPACE),
        kind.name(),
        TypeAttributes::PUBLIC | TypeAttributes::SEALED,
        CilFlavor::Primitive(kind),
    )
}

fn system_struct(name: &str) -> CilType {
    CilType::external(
        Token::new(0),
        Some(SYSTEM_NAMESPACE),
        name,
        TypeAttributes::PUBLIC | TypeAttributes::SEALED,
        CilFlavor::ValueType,
    )
}

fn system_class(name: &str, sealed: bool) -> CilType {
    let mut flags = TypeAttributes::PUBLIC;
    if sealed {
        flags |= TypeAttributes::SEALED;
    }

    CilType::external(
        Token::new(0),
        Some(SYSTEM_NAMESPACE),
        name,
        flags,
        CilFlavor::Class,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives() {
        let int = well_known(&TypeSignature::I4).unwrap();
        assert_eq!(int.full_name, "System.Int32");
        assert!(int.is_primitive());
        assert!(int.is_value_type());
        assert!(int.is_sealed());
        assert!(!int.is_class());

        let native = well_known(&TypeSignature::U).unwrap();
        assert_eq!(native.name, "UIntPtr");
        assert!(native.is_primitive());
    }

    #[test]
    fn special_types() {
        let void = well_known(&TypeSignature::Void).unwrap();
        assert!(void.is_value_type());
        assert!(!void.is_primitive());

        let string = well_known(&TypeSignature::String).unwrap();
        assert!(string.is_class());
        assert!(string.is_sealed());

        let object = well_known_by_name("Object").unwrap();
        assert!(object.is_class());
        assert!(!object.is_sealed());

        assert!(well_known(&TypeSignature::GenericParamType(0)).is_none());
        assert!(well_known_by_name("Console").is_none());
    }

    #[test]
    fn names() {
        assert_eq!(CilPrimitiveKind::from_name("Double"), Some(CilPrimitiveKind::R8));
        assert_eq!(CilPrimitiveKind::from_name("Decimal"), None);
        assert_eq!(CilPrimitiveKind::I1.name(), "SByte");
    }
}

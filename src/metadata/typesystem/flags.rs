//! Attribute flags of type definitions, methods, fields and accessors (ECMA-335 II.23.1).
//!
//! Visibility and member access are three bit enumerations inside the flag words, not
//! independent bits. Use [`TypeAttributes::visibility`], [`MethodAttributes::access`] and
//! [`FieldAttributes::access`] to compare them, `contains` is only meaningful for the single
//! bit flags.

use bitflags::bitflags;

bitflags! {
    /// `TypeAttributes` of a `TypeDef` row
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeAttributes: u32 {
        /// Mask of the visibility enumeration
        const VISIBILITY_MASK = 0x0000_0007;
        /// Top level, visible outside the assembly
        const PUBLIC = 0x0000_0001;
        /// Nested, public
        const NESTED_PUBLIC = 0x0000_0002;
        /// Nested, private
        const NESTED_PRIVATE = 0x0000_0003;
        /// Nested, family (protected)
        const NESTED_FAMILY = 0x0000_0004;
        /// Nested, assembly (internal)
        const NESTED_ASSEMBLY = 0x0000_0005;
        /// Nested, family and assembly (private protected)
        const NESTED_FAM_AND_ASSEM = 0x0000_0006;
        /// Nested, family or assembly (protected internal)
        const NESTED_FAM_OR_ASSEM = 0x0000_0007;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Type can not be instantiated
        const ABSTRACT = 0x0000_0080;
        /// Type can not be derived from
        const SEALED = 0x0000_0100;
        /// Name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x0000_0800;
        /// Type is imported
        const IMPORT = 0x0000_1000;
        /// Type is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Static initializer may run before the first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;

        const _ = !0;
    }
}

impl TypeAttributes {
    /// The visibility enumeration value, one of the `PUBLIC`/`NESTED_*` constants or 0
    #[must_use]
    pub fn visibility(self) -> u32 {
        self.bits() & Self::VISIBILITY_MASK.bits()
    }
}

bitflags! {
    /// `MethodAttributes` of a `MethodDef` row
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodAttributes: u16 {
        /// Mask of the member access enumeration
        const MEMBER_ACCESS_MASK = 0x0007;
        /// Not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the declaring type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types in the same assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible in the same assembly
        const ASSEM = 0x0003;
        /// Accessible by sub-types
        const FAMILY = 0x0004;
        /// Accessible by sub-types and anywhere in the same assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible everywhere
        const PUBLIC = 0x0006;
        /// Defined on the type, not per instance
        const STATIC = 0x0010;
        /// Can not be overridden
        const FINAL = 0x0020;
        /// Virtual dispatch
        const VIRTUAL = 0x0040;
        /// Hidden by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Gets a new vtable slot
        const NEW_SLOT = 0x0100;
        /// No implementation
        const ABSTRACT = 0x0400;
        /// Name is special, e.g. property accessors
        const SPECIAL_NAME = 0x0800;
        /// Runtime checks the name encoding, e.g. constructors
        const RT_SPECIAL_NAME = 0x1000;

        const _ = !0;
    }
}

impl MethodAttributes {
    /// The member access enumeration value
    #[must_use]
    pub fn access(self) -> u16 {
        self.bits() & Self::MEMBER_ACCESS_MASK.bits()
    }

    /// True for `private` and compiler controlled members
    #[must_use]
    pub fn is_private(self) -> bool {
        self.access() <= Self::PRIVATE.bits()
    }
}

bitflags! {
    /// `FieldAttributes` of a `Field` row
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldAttributes: u16 {
        /// Mask of the field access enumeration
        const FIELD_ACCESS_MASK = 0x0007;
        /// Not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the declaring type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types in the same assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessible in the same assembly
        const ASSEMBLY = 0x0003;
        /// Accessible by sub-types
        const FAMILY = 0x0004;
        /// Accessible by sub-types and anywhere in the same assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessible everywhere
        const PUBLIC = 0x0006;
        /// Defined on the type, not per instance
        const STATIC = 0x0010;
        /// Only assignable during initialization (`readonly`)
        const INIT_ONLY = 0x0020;
        /// Compile time constant
        const LITERAL = 0x0040;
        /// Name is special
        const SPECIAL_NAME = 0x0200;
        /// Runtime checks the name encoding
        const RT_SPECIAL_NAME = 0x0400;

        const _ = !0;
    }
}

impl FieldAttributes {
    /// The field access enumeration value
    #[must_use]
    pub fn access(self) -> u16 {
        self.bits() & Self::FIELD_ACCESS_MASK.bits()
    }

    /// True for `private` and compiler controlled fields
    #[must_use]
    pub fn is_private(self) -> bool {
        self.access() <= Self::PRIVATE.bits()
    }
}

bitflags! {
    /// `MethodSemanticsAttributes`: the role of an accessor method
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodSemanticsAttributes: u16 {
        /// Property setter
        const SETTER = 0x0001;
        /// Property getter
        const GETTER = 0x0002;
        /// Other property or event method
        const OTHER = 0x0004;
        /// Event add method
        const ADD_ON = 0x0008;
        /// Event remove method
        const REMOVE_ON = 0x0010;
        /// Event raise method
        const FIRE = 0x0020;
    }
}

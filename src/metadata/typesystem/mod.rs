//! Owned, fully resolved type descriptions.
//!
//! Every type the browser renders, whether defined in the module, referenced from another
//! assembly, built into the runtime or composed inside a signature, is described by one
//! [`CilType`]. The predicates on it mirror the ones of runtime reflection (`IsPublic`,
//! `IsNestedFamily`, `IsValueType`, ...), which is what the declaration formatter is written
//! against.
//!
//! # Key Components
//!
//! - [`CilType`] - name, namespace, flags and generic arguments of a type
//! - [`CilFlavor`] - what kind of type it is
//! - [`GenericContext`] - the type and method arguments signatures are resolved in
//! - [`flags`] - `TypeAttributes`, `MethodAttributes` and friends

pub mod flags;
mod primitives;
mod resolver;

pub use flags::{FieldAttributes, MethodAttributes, MethodSemanticsAttributes, TypeAttributes};
pub use primitives::{
    primitive_type, well_known, well_known_by_name, CilPrimitiveKind, SYSTEM_NAMESPACE,
};
pub use resolver::GenericContext;
pub(crate) use resolver::TypeResolver;

use crate::metadata::token::Token;

/// The kind of a [`CilType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CilFlavor {
    /// Reference type
    Class,
    /// Interface
    Interface,
    /// User defined value type
    ValueType,
    /// Enumeration, derives from `System.Enum`
    Enum,
    /// CLR primitive such as `System.Int32`
    Primitive(CilPrimitiveKind),
    /// Generic parameter of a type (`!n`) or method (`!!n`)
    GenericParameter {
        /// Position in the owner's parameter list
        index: u32,
        /// Owned by a method rather than a type
        method: bool,
    },
    /// Array with `rank` dimensions
    Array {
        /// Number of dimensions
        rank: u32,
    },
    /// Unmanaged pointer
    Pointer,
    /// Managed reference
    ByRef,
}

/// A resolved type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CilType {
    /// `TypeDef` or `TypeRef` token, null for built-in and composed types
    pub token: Token,
    /// Namespace, `None` for global types
    pub namespace: Option<String>,
    /// Simple name, including a generic arity suffix such as `` List`1 ``
    pub name: String,
    /// Namespace qualified name, nested types joined with `+`
    pub full_name: String,
    /// Type attributes
    pub flags: TypeAttributes,
    /// Kind of type
    pub flavor: CilFlavor,
    /// Generic parameters of a definition, or the arguments of an instantiation
    pub generic_args: Vec<CilType>,
    /// Element type of arrays, pointers and references
    pub element: Option<Box<CilType>>,
}

impl CilType {
    /// A type without a definition in the current module
    #[must_use]
    pub fn external(
        token: Token,
        namespace: Option<&str>,
        name: &str,
        flags: TypeAttributes,
        flavor: CilFlavor,
    ) -> CilType {
        let namespace = namespace.filter(|ns| !ns.is_empty()).map(str::to_string);
        let full_name = match &namespace {
            Some(ns) => format!("{ns}.{name}"),
            None => name.to_string(),
        };

        CilType {
            token,
            namespace,
            name: name.to_string(),
            full_name,
            flags,
            flavor,
            generic_args: Vec::new(),
            element: None,
        }
    }

    /// Generic parameter `name` at `index`, declared by a type in `namespace`
    #[must_use]
    pub fn generic_parameter(
        namespace: Option<&str>,
        name: &str,
        index: u32,
        method: bool,
    ) -> CilType {
        CilType::external(
            Token::new(0),
            namespace,
            name,
            TypeAttributes::PUBLIC,
            CilFlavor::GenericParameter { index, method },
        )
    }

    /// An array of `element` with `rank` dimensions
    #[must_use]
    pub fn array(element: CilType, rank: u32) -> CilType {
        let suffix = format!("[{}]", ",".repeat(rank.saturating_sub(1) as usize));
        CilType::composed(
            element,
            &suffix,
            TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            CilFlavor::Array { rank },
        )
    }

    /// An unmanaged pointer to `element`
    #[must_use]
    pub fn pointer(element: CilType) -> CilType {
        CilType::composed(element, "*", TypeAttributes::PUBLIC, CilFlavor::Pointer)
    }

    /// A managed reference to `element`
    #[must_use]
    pub fn by_ref(element: CilType) -> CilType {
        CilType::composed(element, "&", TypeAttributes::PUBLIC, CilFlavor::ByRef)
    }

    fn composed(element: CilType, suffix: &str, flags: TypeAttributes, flavor: CilFlavor) -> CilType {
        CilType {
            token: Token::new(0),
            namespace: element.namespace.clone(),
            name: format!("{}{}", element.name, suffix),
            full_name: format!("{}{}", element.full_name, suffix),
            flags,
            flavor,
            generic_args: Vec::new(),
            element: Some(Box::new(element)),
        }
    }

    /// This type with its generic arguments replaced
    #[must_use]
    pub fn with_generic_args(mut self, generic_args: Vec<CilType>) -> CilType {
        self.generic_args = generic_args;
        self
    }

    /// Full name plus generic arguments, identifies a type for signature comparisons
    #[must_use]
    pub fn signature_key(&self) -> String {
        if self.generic_args.is_empty() {
            return self.full_name.clone();
        }

        let args: Vec<String> = self.generic_args.iter().map(CilType::signature_key).collect();
        format!("{}[{}]", self.full_name, args.join(","))
    }

    /// Top level public type
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags.visibility() == TypeAttributes::PUBLIC.bits()
    }

    /// Top level type, not visible outside the assembly
    #[must_use]
    pub fn is_not_public(&self) -> bool {
        self.flags.visibility() == 0
    }

    /// Nested public type
    #[must_use]
    pub fn is_nested_public(&self) -> bool {
        self.flags.visibility() == TypeAttributes::NESTED_PUBLIC.bits()
    }

    /// Nested private type
    #[must_use]
    pub fn is_nested_private(&self) -> bool {
        self.flags.visibility() == TypeAttributes::NESTED_PRIVATE.bits()
    }

    /// Nested protected type
    #[must_use]
    pub fn is_nested_family(&self) -> bool {
        self.flags.visibility() == TypeAttributes::NESTED_FAMILY.bits()
    }

    /// Nested internal type
    #[must_use]
    pub fn is_nested_assembly(&self) -> bool {
        self.flags.visibility() == TypeAttributes::NESTED_ASSEMBLY.bits()
    }

    /// Nested `private protected` type
    #[must_use]
    pub fn is_nested_fam_and_assem(&self) -> bool {
        self.flags.visibility() == TypeAttributes::NESTED_FAM_AND_ASSEM.bits()
    }

    /// Nested `protected internal` type
    #[must_use]
    pub fn is_nested_fam_or_assem(&self) -> bool {
        self.flags.visibility() == TypeAttributes::NESTED_FAM_OR_ASSEM.bits()
    }

    /// Nested in another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.flags.visibility() > TypeAttributes::PUBLIC.bits()
    }

    /// Declared `abstract`, also set for interfaces and static classes
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeAttributes::ABSTRACT)
    }

    /// Declared `sealed`
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.flags.contains(TypeAttributes::SEALED)
    }

    /// Interface type
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flavor == CilFlavor::Interface
    }

    /// Value type: structs, enums and primitives
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        matches!(
            self.flavor,
            CilFlavor::ValueType | CilFlavor::Enum | CilFlavor::Primitive(_)
        )
    }

    /// Neither an interface nor a value type
    #[must_use]
    pub fn is_class(&self) -> bool {
        !self.is_interface() && !self.is_value_type()
    }

    /// Enumeration
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.flavor == CilFlavor::Enum
    }

    /// CLR primitive
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.flavor, CilFlavor::Primitive(_))
    }

    /// Generic definition or instantiation
    #[must_use]
    pub fn is_generic_type(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// Generic parameter of a type or method
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.flavor, CilFlavor::GenericParameter { .. })
    }
}

//! Declaration strings.
//!
//! Pure functions from resolved metadata to the source-like text shown for types and members.
//! The templates are fixed and keep the spacing produced by the modifier renderers, e.g. a
//! private method without qualifiers renders as `private  System.Void M ()`.
//!
//! Type names always follow `{namespace}.{name}`, so a type declared outside of any namespace
//! renders with a leading dot (`.Program`). This differs from [`CilType::full_name`], which is
//! the metadata name of the type (`Program`) and is what type nodes carry.
//!
//! # Key Components
//!
//! - [`type_name`], [`method_name`], [`parameter_list`] - the building blocks of declarations
//! - [`type_modifiers`], [`method_modifiers`] - rendered modifier text
//! - [`method_declaration`], [`constructor_declaration`], [`field_declaration`],
//!   [`property_declaration`], [`event_declaration`] - full member declarations
//!
//! All of them are total: empty parameter lists, empty generic argument lists and
//! non-generic types need no special handling by the caller.

use crate::metadata::{
    members::{Accessor, EventMember, FieldMember, MethodMember, PropertyMember},
    typesystem::{CilFlavor, CilType, FieldAttributes, MethodAttributes},
};

/// `Ns.Name<Args>`, with the generic arity suffix dropped from the name
///
/// Types without a namespace keep the separator and render as `.Name`. Arrays, pointers and
/// by-refs render their element type followed by `[]`, `*` or `&`.
///
/// # Arguments
/// * `ty` - The type to render, generic arguments are rendered recursively
///
/// # Examples
///
/// ```rust
/// use dotbrowse::browser::format::type_name;
/// use dotbrowse::metadata::token::Token;
/// use dotbrowse::metadata::typesystem::{well_known_by_name, CilFlavor, CilType, TypeAttributes};
///
/// let string = well_known_by_name("String").unwrap();
/// let list = CilType::external(
///     Token::new(0x0100_0001),
///     Some("System.Collections.Generic"),
///     "List`1",
///     TypeAttributes::PUBLIC,
///     CilFlavor::Class,
/// )
/// .with_generic_args(vec![string]);
/// assert_eq!(type_name(&list), "System.Collections.Generic.List<System.String>");
///
/// let program = CilType::external(
///     Token::new(0x0200_0002),
///     None,
///     "Program",
///     TypeAttributes::empty(),
///     CilFlavor::Class,
/// );
/// assert_eq!(type_name(&program), ".Program");
/// ```
#[must_use]
pub fn type_name(ty: &CilType) -> String {
    if let Some(element) = &ty.element {
        let suffix = match ty.flavor {
            CilFlavor::Array { rank } => {
                format!("[{}]", ",".repeat(rank.saturating_sub(1) as usize))
            }
            CilFlavor::Pointer => "*".to_string(),
            CilFlavor::ByRef => "&".to_string(),
            _ => String::new(),
        };
        return format!("{}{}", type_name(element), suffix);
    }

    let simple = strip_arity(&ty.name);
    let mut result = match &ty.namespace {
        Some(namespace) => format!("{namespace}.{simple}"),
        None => format!(".{simple}"),
    };

    if ty.is_generic_type() {
        result.push_str(&generic_arguments(&ty.generic_args));
    }

    result
}

/// The name of a generic type without its `` `N `` arity suffix
#[must_use]
pub fn strip_arity(name: &str) -> &str {
    match name.rfind('`') {
        Some(position) if name[position + 1..].bytes().all(|b| b.is_ascii_digit()) => {
            &name[..position]
        }
        _ => name,
    }
}

/// `<A, B>` from rendered type names
#[must_use]
pub fn generic_arguments(args: &[CilType]) -> String {
    let rendered: Vec<String> = args.iter().map(type_name).collect();
    format!("<{}>", rendered.join(", "))
}

/// A method name, followed by its own generic arguments for generic methods
#[must_use]
pub fn method_name(name: &str, generic_args: &[CilType]) -> String {
    if generic_args.is_empty() {
        return name.to_string();
    }

    format!("{}{}", name, generic_arguments(generic_args))
}

/// `(A, B)`, or `()` without parameters
#[must_use]
pub fn parameter_list(params: &[CilType]) -> String {
    let rendered: Vec<String> = params.iter().map(type_name).collect();
    format!("({})", rendered.join(", "))
}

/// Visibility, qualifier and kind of a type, e.g. `public sealed class `
///
/// Nested visibility wins over top level visibility. The kind word is the first that applies
/// of `class`, `enum`, `interface`, `generic` and `struct`, primitives get none.
#[must_use]
pub fn type_modifiers(ty: &CilType) -> String {
    let mut result = String::new();

    let visibility = if ty.is_nested_public() || ty.is_public() {
        "public "
    } else if ty.is_nested_private() {
        "private "
    } else if ty.is_nested_family() {
        "protected "
    } else if ty.is_nested_assembly() {
        "internal "
    } else if ty.is_nested_fam_or_assem() {
        "protected internal "
    } else if ty.is_nested_fam_and_assem() {
        "private protected "
    } else if ty.is_not_public() {
        "private "
    } else {
        ""
    };
    result.push_str(visibility);

    if ty.is_abstract() && ty.is_sealed() {
        result.push_str("static ");
    } else if ty.is_abstract() {
        result.push_str("abstract ");
    } else if ty.is_sealed() {
        result.push_str("sealed ");
    }

    if ty.is_class() {
        result.push_str("class ");
    } else if ty.is_enum() {
        result.push_str("enum ");
    } else if ty.is_interface() {
        result.push_str("interface ");
    } else if ty.is_generic_type() {
        result.push_str("generic ");
    } else if ty.is_value_type() && !ty.is_primitive() {
        result.push_str("struct ");
    }

    result
}

/// Shared by methods and fields, which use the same access values
fn member_access(access: u16) -> &'static str {
    match access {
        3 => "internal ",
        4 => "protected ",
        5 => "protected internal ",
        2 => "private protected ",
        1 => "private ",
        6 => "public ",
        _ => "",
    }
}

/// Access and `static`/`abstract`/`virtual` of a method or constructor
#[must_use]
pub fn method_modifiers(flags: MethodAttributes) -> String {
    let mut result = member_access(flags.access()).to_string();

    if flags.contains(MethodAttributes::STATIC) {
        result.push_str("static ");
    } else if flags.contains(MethodAttributes::ABSTRACT) {
        result.push_str("abstract ");
    } else if flags.contains(MethodAttributes::VIRTUAL) {
        result.push_str("virtual ");
    }

    result
}

/// `{modifiers} {return} {name} {params}`
#[must_use]
pub fn method_declaration(method: &MethodMember) -> String {
    format!(
        "{} {} {} {}",
        method_modifiers(method.flags),
        type_name(&method.return_type),
        method_name(&method.name, &method.generic_args),
        parameter_list(&method.params)
    )
}

/// `{modifiers} {name} {params}`
#[must_use]
pub fn constructor_declaration(constructor: &MethodMember) -> String {
    format!(
        "{} {} {}",
        method_modifiers(constructor.flags),
        method_name(&constructor.name, &constructor.generic_args),
        parameter_list(&constructor.params)
    )
}

/// Access, `readonly`, `static`, type and name of a field
#[must_use]
pub fn field_declaration(field: &FieldMember) -> String {
    let mut result = member_access(field.flags.access()).to_string();

    if field.flags.contains(FieldAttributes::INIT_ONLY) {
        result.push_str("readonly ");
    }
    if field.flags.contains(FieldAttributes::STATIC) {
        result.push_str("static ");
    }

    result.push_str(&type_name(&field.field_type));
    result.push(' ');
    result.push_str(&field.name);
    result
}

/// ` { get_X } ` for every special-name accessor, in accessor order
#[must_use]
pub fn property_accessors(accessors: &[Accessor]) -> String {
    accessors
        .iter()
        .filter(|accessor| accessor.flags.contains(MethodAttributes::SPECIAL_NAME))
        .map(|accessor| format!(" {{ {} }} ", accessor.name))
        .collect()
}

/// `{type} {name}` followed by the accessor list
#[must_use]
pub fn property_declaration(property: &PropertyMember) -> String {
    format!(
        "{} {}{}",
        type_name(&property.property_type),
        property.name,
        property_accessors(&property.accessors)
    )
}

/// ` [add_X]  [remove_X] `
#[must_use]
pub fn event_accessors(add: &Accessor, remove: &Accessor) -> String {
    format!(" [{}]  [{}] ", add.name, remove.name)
}

/// `{type} {name}` followed by the accessor list, padded by one space on each side
#[must_use]
pub fn event_declaration(event: &EventMember, add: &Accessor, remove: &Accessor) -> String {
    format!(
        "{} {} {} ",
        type_name(&event.event_type),
        event.name,
        event_accessors(add, remove)
    )
}

/// Modifiers and name of a type, e.g. `private class N.Outer.Inner `
#[must_use]
pub fn type_declaration(ty: &CilType) -> String {
    format!("{}{} ", type_modifiers(ty), type_name(ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        members::Accessor,
        token::Token,
        typesystem::{
            primitive_type, well_known_by_name, CilPrimitiveKind, MethodSemanticsAttributes,
            TypeAttributes,
        },
    };

    fn string() -> CilType {
        well_known_by_name("String").unwrap()
    }

    fn list_of(arg: CilType) -> CilType {
        CilType::external(
            Token::new(0x0100_0001),
            Some("System.Collections.Generic"),
            "List`1",
            TypeAttributes::PUBLIC,
            CilFlavor::Class,
        )
        .with_generic_args(vec![arg])
    }

    fn local(flags: TypeAttributes, flavor: CilFlavor) -> CilType {
        CilType::external(Token::new(0x0200_0002), Some("N"), "T", flags, flavor)
    }

    fn accessor(name: &str, flags: MethodAttributes) -> Accessor {
        Accessor {
            token: Token::new(0x0600_0001),
            name: name.to_string(),
            flags,
            semantics: MethodSemanticsAttributes::GETTER,
        }
    }

    fn method(flags: MethodAttributes, params: Vec<CilType>) -> MethodMember {
        MethodMember {
            token: Token::new(0x0600_0001),
            name: "M".to_string(),
            flags,
            return_type: well_known_by_name("Void").unwrap(),
            params,
            generic_args: Vec::new(),
            declaring_type: "N.C".to_string(),
        }
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(&string()), "System.String");
        assert_eq!(
            type_name(&list_of(string())),
            "System.Collections.Generic.List<System.String>"
        );
        assert_eq!(
            type_name(&list_of(list_of(primitive_type(CilPrimitiveKind::I4)))),
            "System.Collections.Generic.List<System.Collections.Generic.List<System.Int32>>"
        );

        let global = CilType::external(
            Token::new(0x0200_0002),
            None,
            "Program",
            TypeAttributes::empty(),
            CilFlavor::Class,
        );
        assert_eq!(type_name(&global), ".Program");
        assert_eq!(global.full_name, "Program");
        assert_eq!(
            type_name(&CilType::generic_parameter(None, "T", 0, false)),
            ".T"
        );
        assert_eq!(type_name(&CilType::array(global, 1)), ".Program[]");

        assert_eq!(type_name(&CilType::array(string(), 1)), "System.String[]");
        assert_eq!(
            type_name(&CilType::array(list_of(string()), 2)),
            "System.Collections.Generic.List<System.String>[,]"
        );
        assert_eq!(
            type_name(&CilType::by_ref(primitive_type(CilPrimitiveKind::I4))),
            "System.Int32&"
        );
    }

    #[test]
    fn non_generic_names_have_no_brackets() {
        for kind in CilPrimitiveKind::ALL {
            let name = type_name(&primitive_type(kind));
            assert!(!name.contains('<') && !name.contains('>'), "{name}");
        }
    }

    #[test]
    fn arity() {
        assert_eq!(strip_arity("List`1"), "List");
        assert_eq!(strip_arity("Dictionary`2"), "Dictionary");
        assert_eq!(strip_arity("Plain"), "Plain");
        assert_eq!(strip_arity("Odd`Name"), "Odd`Name");
    }

    #[test]
    fn lists() {
        assert_eq!(parameter_list(&[]), "()");
        assert_eq!(
            parameter_list(&[string(), primitive_type(CilPrimitiveKind::Boolean)]),
            "(System.String, System.Boolean)"
        );
        assert_eq!(generic_arguments(&[]), "<>");
        assert_eq!(method_name("Get", &[]), "Get");
        assert_eq!(
            method_name("Get", &[CilType::generic_parameter(Some("N"), "T", 0, true)]),
            "Get<N.T>"
        );
    }

    #[test]
    fn type_modifier_rendering() {
        let cases = [
            (TypeAttributes::PUBLIC, CilFlavor::Class, "public class "),
            (
                TypeAttributes::PUBLIC | TypeAttributes::SEALED,
                CilFlavor::Class,
                "public sealed class ",
            ),
            (
                TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT | TypeAttributes::SEALED,
                CilFlavor::Class,
                "public static class ",
            ),
            (TypeAttributes::empty(), CilFlavor::Class, "private class "),
            (
                TypeAttributes::NESTED_FAMILY | TypeAttributes::ABSTRACT,
                CilFlavor::Class,
                "protected abstract class ",
            ),
            (TypeAttributes::NESTED_ASSEMBLY, CilFlavor::Enum, "internal enum "),
            (
                TypeAttributes::NESTED_FAM_OR_ASSEM | TypeAttributes::INTERFACE,
                CilFlavor::Interface,
                "protected internal interface ",
            ),
            (
                TypeAttributes::NESTED_FAM_AND_ASSEM | TypeAttributes::SEALED,
                CilFlavor::ValueType,
                "private protected sealed struct ",
            ),
            (TypeAttributes::NESTED_PRIVATE, CilFlavor::ValueType, "private struct "),
        ];

        for (flags, flavor, expected) in cases {
            assert_eq!(type_modifiers(&local(flags, flavor)), expected);
        }

        assert_eq!(
            type_modifiers(&primitive_type(CilPrimitiveKind::I4)),
            "public sealed "
        );

        let generic_struct = local(TypeAttributes::PUBLIC | TypeAttributes::SEALED, CilFlavor::ValueType)
            .with_generic_args(vec![string()]);
        assert_eq!(type_modifiers(&generic_struct), "public sealed generic ");
    }

    #[test]
    fn method_modifier_rendering() {
        let cases = [
            (MethodAttributes::PUBLIC, "public "),
            (MethodAttributes::PRIVATE, "private "),
            (MethodAttributes::FAMILY | MethodAttributes::VIRTUAL, "protected virtual "),
            (MethodAttributes::ASSEM | MethodAttributes::STATIC, "internal static "),
            (
                MethodAttributes::FAM_OR_ASSEM | MethodAttributes::ABSTRACT | MethodAttributes::VIRTUAL,
                "protected internal abstract ",
            ),
            (MethodAttributes::FAM_AND_ASSEM, "private protected "),
            (MethodAttributes::COMPILER_CONTROLLED, ""),
        ];

        for (flags, expected) in cases {
            assert_eq!(method_modifiers(flags), expected);
        }
    }

    #[test]
    fn declarations() {
        let private = method(MethodAttributes::PRIVATE, vec![]);
        assert_eq!(method_declaration(&private), "private  System.Void M ()");

        let mut constructor = method(
            MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME | MethodAttributes::RT_SPECIAL_NAME,
            vec![string()],
        );
        constructor.name = ".ctor".to_string();
        assert_eq!(
            constructor_declaration(&constructor),
            "public  .ctor (System.String)"
        );

        let field = FieldMember {
            token: Token::new(0x0400_0001),
            name: "Cache".to_string(),
            flags: FieldAttributes::PRIVATE | FieldAttributes::STATIC | FieldAttributes::INIT_ONLY,
            field_type: list_of(string()),
            declaring_type: "N.C".to_string(),
        };
        assert_eq!(
            field_declaration(&field),
            "private readonly static System.Collections.Generic.List<System.String> Cache"
        );

        let special = MethodAttributes::PUBLIC | MethodAttributes::SPECIAL_NAME;
        let property = PropertyMember {
            token: Token::new(0x1700_0001),
            name: "Count".to_string(),
            property_type: primitive_type(CilPrimitiveKind::I4),
            accessors: vec![
                accessor("get_Count", special),
                accessor("set_Count", special),
                accessor("Helper", MethodAttributes::PUBLIC),
            ],
        };
        assert_eq!(
            property_accessors(&property.accessors),
            " { get_Count }  { set_Count } "
        );
        assert_eq!(
            property_declaration(&property),
            "System.Int32 Count { get_Count }  { set_Count } "
        );

        let add = accessor("add_Changed", special);
        let remove = accessor("remove_Changed", special);
        let event = EventMember {
            token: Token::new(0x1400_0001),
            name: "Changed".to_string(),
            event_type: CilType::external(
                Token::new(0x0100_0002),
                Some("System"),
                "EventHandler",
                TypeAttributes::PUBLIC,
                CilFlavor::Class,
            ),
            add: Some(add.clone()),
            remove: Some(remove.clone()),
        };
        assert_eq!(
            event_accessors(&add, &remove),
            " [add_Changed]  [remove_Changed] "
        );
        assert_eq!(
            event_declaration(&event, &add, &remove),
            "System.EventHandler Changed  [add_Changed]  [remove_Changed]  "
        );

        let nested = CilType::external(
            Token::new(0x0200_0003),
            Some("N"),
            "Inner",
            TypeAttributes::NESTED_PRIVATE,
            CilFlavor::Class,
        );
        assert_eq!(type_declaration(&nested), "private class N.Inner ");
    }
}

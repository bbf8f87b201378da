//! Normalizes one [`Member`] into a [`MemberNode`].
//!
//! Every member kind has its own metadata shape. The classifier reduces all of them to the
//! same six strings: name, full declaration, type name, kind specific extra text and access
//! modifier.
//!
//! Properties, fields and events take their access modifier from their value type, not from
//! their own flags. Constructors and methods use their own flags. Constructors carry their full
//! declaration as name and the owning type as type name. Nested types report the reflection
//! object type [`RUNTIME_TYPE_NAME`] as their type name.

use crate::{
    browser::{
        format::{
            constructor_declaration, event_accessors, event_declaration, field_declaration,
            method_declaration, parameter_list, property_accessors, property_declaration,
            method_modifiers, type_declaration, type_modifiers, type_name,
        },
        nodes::{MemberKind, MemberNode},
    },
    metadata::{members::Member, typesystem::CilType},
    Result,
};

/// Type name reported for nested type members
pub const RUNTIME_TYPE_NAME: &str = "System.RuntimeType";

/// Describe `member` of the type `owner`
///
/// # Arguments
/// * `member` - A member handle as returned by [`crate::CilModule::members`]
/// * `owner` - The type the member is listed under, used for constructors and error context
///
/// # Examples
///
/// ```rust
/// use dotbrowse::browser::{classify_member, MemberKind};
/// use dotbrowse::metadata::members::{FieldMember, Member};
/// use dotbrowse::metadata::token::Token;
/// use dotbrowse::metadata::typesystem::{
///     primitive_type, CilFlavor, CilPrimitiveKind, CilType, FieldAttributes, TypeAttributes,
/// };
///
/// let owner = CilType::external(
///     Token::new(0x0200_0002),
///     Some("N"),
///     "C",
///     TypeAttributes::PUBLIC,
///     CilFlavor::Class,
/// );
/// let field = Member::Field(FieldMember {
///     token: Token::new(0x0400_0001),
///     name: "F".to_string(),
///     flags: FieldAttributes::PUBLIC,
///     field_type: primitive_type(CilPrimitiveKind::I4),
///     declaring_type: "N.C".to_string(),
/// });
///
/// let node = classify_member(&field, &owner)?;
/// assert_eq!(node.kind, MemberKind::Field);
/// assert_eq!(node.full_name, "public System.Int32 F");
/// assert_eq!(node.type_name, "System.Int32");
/// # Ok::<(), dotbrowse::Error>(())
/// ```
///
/// # Errors
/// Returns [`crate::Error::MetadataResolution`] for an event without add or remove accessor.
pub fn classify_member(member: &Member, owner: &CilType) -> Result<MemberNode> {
    let node = match member {
        Member::Property(property) => MemberNode {
            kind: MemberKind::Property,
            name: property.name.clone(),
            full_name: property_declaration(property),
            type_name: type_name(&property.property_type),
            declaration_info: property_accessors(&property.accessors),
            access_modifier: type_modifiers(&property.property_type),
        },
        Member::Field(field) => {
            let declaration = field_declaration(field);
            MemberNode {
                kind: MemberKind::Field,
                name: field.name.clone(),
                full_name: declaration.clone(),
                type_name: type_name(&field.field_type),
                declaration_info: declaration,
                access_modifier: type_modifiers(&field.field_type),
            }
        }
        Member::Event(event) => {
            let context = format!("{}::{}", owner.full_name, event.name);
            let Some(add) = &event.add else {
                return Err(resolution_error!(context, "event has no add accessor"));
            };
            let Some(remove) = &event.remove else {
                return Err(resolution_error!(context, "event has no remove accessor"));
            };

            MemberNode {
                kind: MemberKind::Event,
                name: event.name.clone(),
                full_name: event_declaration(event, add, remove),
                type_name: type_name(&event.event_type),
                declaration_info: event_accessors(add, remove),
                access_modifier: type_modifiers(&event.event_type),
            }
        }
        Member::Constructor(constructor) => {
            let declaration = constructor_declaration(constructor);
            MemberNode {
                kind: MemberKind::Constructor,
                name: declaration.clone(),
                full_name: declaration,
                type_name: owner.full_name.clone(),
                declaration_info: parameter_list(&constructor.params),
                access_modifier: method_modifiers(constructor.flags),
            }
        }
        Member::Method(method) => MemberNode {
            kind: MemberKind::Method,
            name: method.name.clone(),
            full_name: method_declaration(method),
            type_name: type_name(&method.return_type),
            declaration_info: parameter_list(&method.params),
            access_modifier: method_modifiers(method.flags),
        },
        Member::NestedType(nested) => MemberNode {
            kind: MemberKind::NestedType,
            name: nested.name.clone(),
            full_name: nested.full_name.clone(),
            type_name: RUNTIME_TYPE_NAME.to_string(),
            declaration_info: type_declaration(nested),
            access_modifier: type_modifiers(nested),
        },
    };

    Ok(node)
}

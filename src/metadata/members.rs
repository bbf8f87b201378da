//! Member enumeration of type definitions.
//!
//! [`CilModule::members`] yields what runtime reflection returns for "all members" of a type:
//! instance and static, public and non-public, declared and inherited. Every [`Member`] is a
//! fully resolved handle, signatures are decoded and their types resolved in the generic context
//! of the declaring type.
//!
//! The order is fixed: methods, constructors, properties, events, fields, nested types. Within
//! each group the type's own members come first in token order, followed by the members of
//! its base types, nearest base first.

use std::collections::HashSet;

use crate::{
    browser::BrowserConfig,
    metadata::{
        cilmodule::CilModule,
        signatures::{parse_field_signature, parse_method_signature, parse_property_signature},
        tables::{CodedIndex, MethodSemanticsRow, TableId},
        token::Token,
        typesystem::{
            CilType, FieldAttributes, GenericContext, MethodAttributes,
            MethodSemanticsAttributes, TypeResolver,
        },
    },
    Result,
};

/// Name of instance constructors
pub const CONSTRUCTOR_NAME: &str = ".ctor";
/// Name of type initializers
pub const TYPE_INITIALIZER_NAME: &str = ".cctor";

/// One member of a type, as returned by [`CilModule::members`]
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// A property with its accessors
    Property(PropertyMember),
    /// A field
    Field(FieldMember),
    /// An event with its add and remove accessors
    Event(EventMember),
    /// An instance constructor or type initializer
    Constructor(MethodMember),
    /// A method that is not a constructor
    Method(MethodMember),
    /// A type nested into the owning type
    NestedType(CilType),
}

impl Member {
    /// Simple name of the member
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Member::Property(property) => &property.name,
            Member::Field(field) => &field.name,
            Member::Event(event) => &event.name,
            Member::Constructor(method) | Member::Method(method) => &method.name,
            Member::NestedType(nested) => &nested.name,
        }
    }

    /// Metadata token of the member
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            Member::Property(property) => property.token,
            Member::Field(field) => field.token,
            Member::Event(event) => event.token,
            Member::Constructor(method) | Member::Method(method) => method.token,
            Member::NestedType(nested) => nested.token,
        }
    }
}

/// A method or constructor
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMember {
    /// `MethodDef` token
    pub token: Token,
    /// Simple name
    pub name: String,
    /// `MethodAttributes`
    pub flags: MethodAttributes,
    /// Return type, `System.Void` for constructors
    pub return_type: CilType,
    /// Parameter types in declaration order
    pub params: Vec<CilType>,
    /// Generic parameters of the method itself
    pub generic_args: Vec<CilType>,
    /// Full name of the type that declares the method
    pub declaring_type: String,
}

/// A field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMember {
    /// `Field` token
    pub token: Token,
    /// Simple name
    pub name: String,
    /// `FieldAttributes`
    pub flags: FieldAttributes,
    /// Type of the field
    pub field_type: CilType,
    /// Full name of the type that declares the field
    pub declaring_type: String,
}

/// A property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMember {
    /// `Property` token
    pub token: Token,
    /// Simple name
    pub name: String,
    /// Type of the property value
    pub property_type: CilType,
    /// Accessors, getter first, then setter, then any others
    pub accessors: Vec<Accessor>,
}

/// An event
#[derive(Debug, Clone, PartialEq)]
pub struct EventMember {
    /// `Event` token
    pub token: Token,
    /// Simple name
    pub name: String,
    /// The delegate type of the event
    pub event_type: CilType,
    /// The `add_` accessor
    pub add: Option<Accessor>,
    /// The `remove_` accessor
    pub remove: Option<Accessor>,
}

/// A method bound to a property or event through `MethodSemantics`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// `MethodDef` token of the accessor
    pub token: Token,
    /// Name of the accessor method, e.g. `get_Count`
    pub name: String,
    /// `MethodAttributes` of the accessor method
    pub flags: MethodAttributes,
    /// The role of the accessor
    pub semantics: MethodSemanticsAttributes,
}

impl Accessor {
    /// Reachable from a derived type: neither static nor private
    fn is_inheritable(&self) -> bool {
        !self.flags.contains(MethodAttributes::STATIC) && !self.flags.is_private()
    }
}

/// One type of the inheritance chain, with the generic arguments it is seen with
struct ChainLink {
    rid: u32,
    ty: CilType,
}

/// Members gathered over the chain, before they are put in order
#[derive(Default)]
struct Collected {
    methods: Vec<Member>,
    constructors: Vec<Member>,
    properties: Vec<Member>,
    events: Vec<Member>,
    fields: Vec<Member>,
    nested: Vec<Member>,
}

impl CilModule {
    /// All members of `ty`, in reflection order
    ///
    /// Types that are not defined in this module have no members here.
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataResolution`] if a member (or a base type) can not be
    /// described.
    pub fn members(&self, ty: &CilType, config: &BrowserConfig) -> Result<Vec<Member>> {
        if ty.token.table() != TableId::TypeDef as u8 {
            return Ok(Vec::new());
        }

        let collect = || -> Result<Vec<Member>> {
            let chain = if config.include_inherited_members {
                self.inheritance_chain(ty, config.max_inheritance_depth)?
            } else {
                vec![ChainLink {
                    rid: ty.token.row(),
                    ty: ty.clone(),
                }]
            };

            let mut collected = Collected::default();
            let mut hidden_methods = HashSet::new();
            let mut hidden_properties = HashSet::new();
            let mut hidden_events = HashSet::new();

            for (level, link) in chain.iter().enumerate() {
                let inherited = level > 0;
                self.collect_methods(link, inherited, &mut hidden_methods, &mut collected)?;
                self.collect_properties(link, inherited, &mut hidden_properties, &mut collected)?;
                self.collect_events(link, inherited, &mut hidden_events, &mut collected)?;
                self.collect_fields(link, inherited, &mut collected)?;

                if !inherited {
                    for nested in self.nested_rids(link.rid) {
                        collected.nested.push(Member::NestedType(self.type_def(*nested)?));
                    }
                }
            }

            let Collected {
                mut methods,
                constructors,
                properties,
                events,
                fields,
                nested,
            } = collected;

            methods.reserve(
                constructors.len() + properties.len() + events.len() + fields.len() + nested.len(),
            );
            methods.extend(constructors);
            methods.extend(properties);
            methods.extend(events);
            methods.extend(fields);
            methods.extend(nested);
            Ok(methods)
        };

        collect().map_err(|error| error.into_resolution(&ty.full_name))
    }

    /// `ty` followed by its base types defined in this module, nearest first
    fn inheritance_chain(&self, ty: &CilType, max_depth: usize) -> Result<Vec<ChainLink>> {
        let mut chain = vec![ChainLink {
            rid: ty.token.row(),
            ty: ty.clone(),
        }];

        loop {
            let Some(current) = chain.last() else {
                break;
            };
            let Some(base) = self.base_type(current)? else {
                break;
            };

            if chain.len() > max_depth {
                return Err(resolution_error!(
                    ty.full_name,
                    "inheritance chain is deeper than {} types",
                    max_depth
                ));
            }

            chain.push(base);
        }

        Ok(chain)
    }

    /// The base type of `link`, as long as it is defined in this module
    fn base_type(&self, link: &ChainLink) -> Result<Option<ChainLink>> {
        let extends: CodedIndex = self.type_def_row(link.rid)?.extends;
        if extends.is_null() {
            return Ok(None);
        }

        let base = match extends.tag {
            TableId::TypeDef => self.type_def(extends.row)?,
            TableId::TypeSpec => {
                let context = GenericContext::new(&link.ty.generic_args, &[]);
                TypeResolver::new(self, context).resolve_type_token(extends.token, false)?
            }
            // External base types end the walk
            _ => return Ok(None),
        };

        if base.token.table() != TableId::TypeDef as u8 {
            return Ok(None);
        }

        Ok(Some(ChainLink {
            rid: base.token.row(),
            ty: base,
        }))
    }

    fn collect_methods(
        &self,
        link: &ChainLink,
        inherited: bool,
        hidden: &mut HashSet<(String, Vec<String>)>,
        collected: &mut Collected,
    ) -> Result<()> {
        for rid in self.method_rids(link.rid) {
            let row = self.method(rid)?;
            let flags = MethodAttributes::from_bits_retain(row.flags);
            let constructor = is_constructor(&row.name, flags);

            if inherited
                && (constructor
                    || flags.contains(MethodAttributes::STATIC)
                    || flags.is_private())
            {
                continue;
            }

            let method = self
                .method_member(link, rid)
                .map_err(|error| error.into_resolution(&member_context(&link.ty, &row.name)))?;

            if constructor {
                collected.constructors.push(Member::Constructor(method));
                continue;
            }

            let key = (
                method.name.clone(),
                method.params.iter().map(CilType::signature_key).collect(),
            );
            if !hidden.insert(key) && inherited {
                continue;
            }

            collected.methods.push(Member::Method(method));
        }

        Ok(())
    }

    fn method_member(&self, link: &ChainLink, rid: u32) -> Result<MethodMember> {
        let row = self.method(rid)?;
        let token = Token::from_parts(TableId::MethodDef, rid);
        let signature = parse_method_signature(&row.signature)?;

        let generic_args =
            self.generic_parameters(token, link.ty.namespace.as_deref(), true)?;
        let context = GenericContext::new(&link.ty.generic_args, &generic_args);
        let resolver = TypeResolver::new(self, context);

        let return_type = resolver.resolve_parameter(&signature.return_type)?;
        let params = signature
            .params
            .iter()
            .map(|param| resolver.resolve_parameter(param))
            .collect::<Result<Vec<_>>>()?;

        Ok(MethodMember {
            token,
            name: row.name.clone(),
            flags: MethodAttributes::from_bits_retain(row.flags),
            return_type,
            params,
            generic_args,
            declaring_type: link.ty.full_name.clone(),
        })
    }

    fn collect_properties(
        &self,
        link: &ChainLink,
        inherited: bool,
        hidden: &mut HashSet<String>,
        collected: &mut Collected,
    ) -> Result<()> {
        for rid in self.property_rids(link.rid) {
            let row = self.property(rid)?;
            let token = Token::from_parts(TableId::Property, rid);

            let describe = || -> Result<PropertyMember> {
                let signature = parse_property_signature(&row.signature)?;
                let context = GenericContext::new(&link.ty.generic_args, &[]);
                let property_type = TypeResolver::new(self, context).resolve(&signature.base)?;

                let mut accessors = self.accessors(token)?;
                accessors.sort_by_key(|accessor| accessor_rank(accessor.semantics));

                Ok(PropertyMember {
                    token,
                    name: row.name.clone(),
                    property_type,
                    accessors,
                })
            };

            let property = describe()
                .map_err(|error| error.into_resolution(&member_context(&link.ty, &row.name)))?;

            if inherited && !property.accessors.iter().any(Accessor::is_inheritable) {
                continue;
            }
            if !hidden.insert(property.name.clone()) && inherited {
                continue;
            }

            collected.properties.push(Member::Property(property));
        }

        Ok(())
    }

    fn collect_events(
        &self,
        link: &ChainLink,
        inherited: bool,
        hidden: &mut HashSet<String>,
        collected: &mut Collected,
    ) -> Result<()> {
        for rid in self.event_rids(link.rid) {
            let row = self.event(rid)?;
            let token = Token::from_parts(TableId::Event, rid);

            let describe = || -> Result<EventMember> {
                let context = GenericContext::new(&link.ty.generic_args, &[]);
                let event_type = TypeResolver::new(self, context)
                    .resolve_type_token(row.event_type.token, false)?;

                let mut add = None;
                let mut remove = None;
                for accessor in self.accessors(token)? {
                    if accessor.semantics.contains(MethodSemanticsAttributes::ADD_ON) {
                        add = Some(accessor);
                    } else if accessor.semantics.contains(MethodSemanticsAttributes::REMOVE_ON) {
                        remove = Some(accessor);
                    }
                }

                Ok(EventMember {
                    token,
                    name: row.name.clone(),
                    event_type,
                    add,
                    remove,
                })
            };

            let event = describe()
                .map_err(|error| error.into_resolution(&member_context(&link.ty, &row.name)))?;

            if inherited {
                let inheritable = event
                    .add
                    .iter()
                    .chain(event.remove.iter())
                    .any(Accessor::is_inheritable);
                if !inheritable {
                    continue;
                }
            }
            if !hidden.insert(event.name.clone()) && inherited {
                continue;
            }

            collected.events.push(Member::Event(event));
        }

        Ok(())
    }

    fn collect_fields(
        &self,
        link: &ChainLink,
        inherited: bool,
        collected: &mut Collected,
    ) -> Result<()> {
        for rid in self.field_rids(link.rid) {
            let row = self.field(rid)?;
            let flags = FieldAttributes::from_bits_retain(row.flags);

            if inherited && (flags.contains(FieldAttributes::STATIC) || flags.is_private()) {
                continue;
            }

            let describe = || -> Result<CilType> {
                let signature = parse_field_signature(&row.signature)?;
                let context = GenericContext::new(&link.ty.generic_args, &[]);
                TypeResolver::new(self, context).resolve(&signature.base)
            };

            let field_type = describe()
                .map_err(|error| error.into_resolution(&member_context(&link.ty, &row.name)))?;

            collected.fields.push(Member::Field(FieldMember {
                token: Token::from_parts(TableId::Field, rid),
                name: row.name.clone(),
                flags,
                field_type,
                declaring_type: link.ty.full_name.clone(),
            }));
        }

        Ok(())
    }

    /// Accessor methods of the property or event `association`, in table order
    fn accessors(&self, association: Token) -> Result<Vec<Accessor>> {
        self.semantics_of(association)
            .iter()
            .map(|semantics: &MethodSemanticsRow| {
                let method = self.method(semantics.method)?;
                Ok(Accessor {
                    token: Token::from_parts(TableId::MethodDef, semantics.method),
                    name: method.name.clone(),
                    flags: MethodAttributes::from_bits_retain(method.flags),
                    semantics: MethodSemanticsAttributes::from_bits_retain(semantics.semantics),
                })
            })
            .collect()
    }
}

fn is_constructor(name: &str, flags: MethodAttributes) -> bool {
    flags.contains(MethodAttributes::RT_SPECIAL_NAME)
        && (name == CONSTRUCTOR_NAME || name == TYPE_INITIALIZER_NAME)
}

fn accessor_rank(semantics: MethodSemanticsAttributes) -> u8 {
    if semantics.contains(MethodSemanticsAttributes::GETTER) {
        0
    } else if semantics.contains(MethodSemanticsAttributes::SETTER) {
        1
    } else {
        2
    }
}

fn member_context(owner: &CilType, member: &str) -> String {
    format!("{}::{}", owner.full_name, member)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{fixture_inheritance, fixture_scenario};

    fn type_named(module: &CilModule, full_name: &str) -> CilType {
        module
            .types()
            .unwrap()
            .into_iter()
            .find(|ty| ty.full_name == full_name)
            .unwrap()
    }

    fn names(members: &[Member]) -> Vec<&str> {
        members.iter().map(Member::name).collect()
    }

    #[test]
    fn declared_members_in_reflection_order() {
        let module = fixture_scenario();
        let ty = type_named(&module, "N.C");

        let members = module.members(&ty, &BrowserConfig::default()).unwrap();
        assert_eq!(names(&members), ["M", ".ctor", "F"]);

        let Member::Field(field) = &members[2] else {
            panic!("expected a field");
        };
        assert_eq!(field.field_type.full_name, "System.Int32");
        assert_eq!(field.declaring_type, "N.C");

        let Member::Method(method) = &members[0] else {
            panic!("expected a method");
        };
        assert!(method.flags.is_private());
        assert!(method.params.is_empty());
        assert_eq!(method.return_type.full_name, "System.Void");
    }

    #[test]
    fn inherited_members() {
        let module = fixture_inheritance();
        let derived = type_named(&module, "Zoo.Dog");

        let members = module.members(&derived, &BrowserConfig::default()).unwrap();
        assert_eq!(
            names(&members),
            [
                // own method, then the base's non-hidden instance methods
                "Speak",
                "Eat",
                "get_Name",
                "add_Fed",
                "remove_Fed",
                ".ctor",
                "Name",
                "Fed",
                "Tricks",
                "Age",
            ]
        );

        let declared = module
            .members(&derived, &BrowserConfig::declared_only())
            .unwrap();
        assert_eq!(names(&declared), ["Speak", ".ctor", "Tricks"]);
    }

    #[test]
    fn generic_base_arguments_are_substituted() {
        let module = fixture_inheritance();
        let derived = type_named(&module, "Zoo.Kennel");

        let members = module.members(&derived, &BrowserConfig::default()).unwrap();
        let field = members
            .iter()
            .find_map(|member| match member {
                Member::Field(field) if field.name == "Items" => Some(field),
                _ => None,
            })
            .unwrap();

        assert_eq!(field.field_type.full_name, "Zoo.Dog[]");
        assert_eq!(field.declaring_type, "Zoo.Box`1");
    }

    #[test]
    fn external_types_have_no_members() {
        let module = fixture_scenario();
        let object = crate::metadata::typesystem::well_known_by_name("Object").unwrap();
        assert!(module
            .members(&object, &BrowserConfig::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn depth_limit() {
        let module = fixture_inheritance();
        let derived = type_named(&module, "Zoo.Dog");

        let config = BrowserConfig {
            max_inheritance_depth: 0,
            ..BrowserConfig::default()
        };
        let error = module.members(&derived, &config).unwrap_err();
        assert!(error.is_metadata_resolution());
    }
}

//! The namespace tree returned by a traversal.
//!
//! Three node kinds form the tree: [`NamespaceNode`] holds [`TypeNode`]s, which hold
//! [`MemberNode`]s. All three expose a name and a full name through [`TypeMember`]; only the
//! first two have children, expressed by [`Container`].
//!
//! Nodes are plain owned values. A tree is built fresh by every traversal and not touched
//! afterwards, the display layer only reads the fields.

use strum::Display;

/// Anything in the tree with a name
pub trait TypeMember {
    /// Short name
    fn name(&self) -> &str;

    /// Qualified name, or the full declaration for members
    fn full_name(&self) -> &str;
}

/// A node that has child members
pub trait Container: TypeMember {
    /// The kind of child this container holds
    type Child: TypeMember;

    /// The children, in traversal order
    fn members(&self) -> &[Self::Child];
}

/// The kind of a [`MemberNode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MemberKind {
    /// A property
    Property,
    /// A field
    Field,
    /// An event
    Event,
    /// A constructor or type initializer
    Constructor,
    /// A method
    Method,
    /// A nested type
    NestedType,
}

/// One namespace and the types declared in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceNode {
    /// The namespace, or the global sentinel for types without one
    pub name: String,
    /// Same as `name`, namespaces do not nest
    pub full_name: String,
    /// Types in module order
    pub members: Vec<TypeNode>,
}

impl NamespaceNode {
    /// An empty namespace called `name`
    #[must_use]
    pub fn new(name: &str) -> Self {
        NamespaceNode {
            name: name.to_string(),
            full_name: name.to_string(),
            members: Vec::new(),
        }
    }

    /// The type with the simple name `name`
    #[must_use]
    pub fn find_type(&self, name: &str) -> Option<&TypeNode> {
        self.members.iter().find(|ty| ty.name == name)
    }

    /// Number of types in this namespace
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.members.len()
    }
}

/// One type and its members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    /// Simple name, with the generic arity suffix (``List`1``)
    pub name: String,
    /// Qualified name, `Ns.Outer+Inner` for nested types
    pub full_name: String,
    /// Rendered modifiers, e.g. `public sealed class `
    pub access_modifier: String,
    /// Members in reflection order
    pub members: Vec<MemberNode>,
}

impl TypeNode {
    /// The first member called `name`
    #[must_use]
    pub fn find_member(&self, name: &str) -> Option<&MemberNode> {
        self.members.iter().find(|member| member.name == name)
    }

    /// All members of one kind
    pub fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = &MemberNode> {
        self.members.iter().filter(move |member| member.kind == kind)
    }
}

/// One member of a type, with its rendered declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberNode {
    /// What kind of member this is
    pub kind: MemberKind,
    /// Member name; constructors carry their full declaration here
    pub name: String,
    /// The full declaration
    pub full_name: String,
    /// Rendered value or return type, the owning type's full name for constructors
    pub type_name: String,
    /// Parameter or accessor list, depending on the kind
    pub declaration_info: String,
    /// Rendered modifiers
    pub access_modifier: String,
}

impl TypeMember for NamespaceNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl TypeMember for TypeNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl TypeMember for MemberNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl Container for NamespaceNode {
    type Child = TypeNode;

    fn members(&self) -> &[TypeNode] {
        &self.members
    }
}

impl Container for TypeNode {
    type Child = MemberNode;

    fn members(&self) -> &[MemberNode] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(kind: MemberKind, name: &str) -> MemberNode {
        MemberNode {
            kind,
            name: name.to_string(),
            full_name: name.to_string(),
            type_name: String::new(),
            declaration_info: String::new(),
            access_modifier: String::new(),
        }
    }

    fn count_leaves<C: Container>(container: &C) -> usize {
        container.members().len()
    }

    #[test]
    fn queries() {
        let mut namespace = NamespaceNode::new("N");
        assert_eq!(namespace.full_name, "N");
        assert_eq!(namespace.type_count(), 0);

        namespace.members.push(TypeNode {
            name: "C".to_string(),
            full_name: "N.C".to_string(),
            access_modifier: "public class ".to_string(),
            members: vec![
                member(MemberKind::Method, "M"),
                member(MemberKind::Field, "F"),
                member(MemberKind::Method, "G"),
            ],
        });

        let ty = namespace.find_type("C").unwrap();
        assert_eq!(TypeMember::full_name(ty), "N.C");
        assert_eq!(ty.find_member("F").unwrap().kind, MemberKind::Field);
        assert_eq!(ty.members_of(MemberKind::Method).count(), 2);
        assert!(namespace.find_type("D").is_none());

        assert_eq!(count_leaves(&namespace), 1);
        assert_eq!(count_leaves(ty), 3);
    }

    #[test]
    fn kind_names() {
        assert_eq!(MemberKind::NestedType.to_string(), "NestedType");
        assert_eq!(MemberKind::Constructor.to_string(), "Constructor");
    }
}

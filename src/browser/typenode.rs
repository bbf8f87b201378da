//! Builds the [`TypeNode`] of one type.

use crate::{
    browser::{classify::classify_member, format::type_modifiers, nodes::TypeNode, BrowserConfig},
    metadata::{cilmodule::CilModule, typesystem::CilType},
    Result,
};

/// Describe `ty` and every member [`CilModule::members`] returns for it
///
/// # Errors
/// Returns [`crate::Error::MetadataResolution`] if the type or one of its members can not be
/// described.
pub fn build_type_node(module: &CilModule, ty: &CilType, config: &BrowserConfig) -> Result<TypeNode> {
    let members = module
        .members(ty, config)?
        .iter()
        .map(|member| classify_member(member, ty))
        .collect::<Result<Vec<_>>>()?;

    log::trace!("{} - {} members", ty.full_name, members.len());

    Ok(TypeNode {
        name: ty.name.clone(),
        full_name: ty.full_name.clone(),
        access_modifier: type_modifiers(ty),
        members,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{browser::nodes::MemberKind, test::fixture_scenario};

    #[test]
    fn scenario_type() {
        let module = fixture_scenario();
        let ty = module
            .types()
            .unwrap()
            .into_iter()
            .find(|ty| ty.name == "C")
            .unwrap();

        let node = build_type_node(&module, &ty, &BrowserConfig::default()).unwrap();
        assert_eq!(node.name, "C");
        assert_eq!(node.full_name, "N.C");
        assert_eq!(node.access_modifier, "public class ");

        let kinds: Vec<MemberKind> = node.members.iter().map(|member| member.kind).collect();
        assert_eq!(
            kinds,
            [MemberKind::Method, MemberKind::Constructor, MemberKind::Field]
        );

        let field = node.find_member("F").unwrap();
        assert!(field.access_modifier.contains("public "));
        assert!(field.type_name.ends_with("Int32"));

        let method = node.find_member("M").unwrap();
        assert!(method.access_modifier.contains("private "));
        assert_eq!(method.full_name, "private  System.Void M ()");
    }
}

//! Coded indices (ECMA-335 II.24.2.6).
//!
//! A coded index packs a reference into one of several tables into a single column: the low
//! bits carry a tag naming the table, the remaining bits the row.

use strum::{EnumCount, EnumIter};

use crate::metadata::{tables::TableId, token::Token};

/// The coded index kinds of ECMA-335 II.24.2.6
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum CodedIndexType {
    TypeDefOrRef,
    HasConstant,
    HasCustomAttribute,
    HasFieldMarshal,
    HasDeclSecurity,
    MemberRefParent,
    HasSemantics,
    MethodDefOrRef,
    MemberForwarded,
    Implementation,
    CustomAttributeType,
    ResolutionScope,
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// The tables addressed by each tag value. `None` marks tags the standard leaves unused.
    #[must_use]
    pub fn tables(&self) -> &'static [Option<TableId>] {
        use TableId as T;

        match self {
            CodedIndexType::TypeDefOrRef => &[Some(T::TypeDef), Some(T::TypeRef), Some(T::TypeSpec)],
            CodedIndexType::HasConstant => &[Some(T::Field), Some(T::Param), Some(T::Property)],
            CodedIndexType::HasCustomAttribute => &[
                Some(T::MethodDef),
                Some(T::Field),
                Some(T::TypeRef),
                Some(T::TypeDef),
                Some(T::Param),
                Some(T::InterfaceImpl),
                Some(T::MemberRef),
                Some(T::Module),
                Some(T::DeclSecurity),
                Some(T::Property),
                Some(T::Event),
                Some(T::StandAloneSig),
                Some(T::ModuleRef),
                Some(T::TypeSpec),
                Some(T::Assembly),
                Some(T::AssemblyRef),
                Some(T::File),
                Some(T::ExportedType),
                Some(T::ManifestResource),
                Some(T::GenericParam),
                Some(T::GenericParamConstraint),
                Some(T::MethodSpec),
            ],
            CodedIndexType::HasFieldMarshal => &[Some(T::Field), Some(T::Param)],
            CodedIndexType::HasDeclSecurity => {
                &[Some(T::TypeDef), Some(T::MethodDef), Some(T::Assembly)]
            }
            CodedIndexType::MemberRefParent => &[
                Some(T::TypeDef),
                Some(T::TypeRef),
                Some(T::ModuleRef),
                Some(T::MethodDef),
                Some(T::TypeSpec),
            ],
            CodedIndexType::HasSemantics => &[Some(T::Event), Some(T::Property)],
            CodedIndexType::MethodDefOrRef => &[Some(T::MethodDef), Some(T::MemberRef)],
            CodedIndexType::MemberForwarded => &[Some(T::Field), Some(T::MethodDef)],
            CodedIndexType::Implementation => {
                &[Some(T::File), Some(T::AssemblyRef), Some(T::ExportedType)]
            }
            CodedIndexType::CustomAttributeType => {
                &[None, None, Some(T::MethodDef), Some(T::MemberRef), None]
            }
            CodedIndexType::ResolutionScope => &[
                Some(T::Module),
                Some(T::ModuleRef),
                Some(T::AssemblyRef),
                Some(T::TypeRef),
            ],
            CodedIndexType::TypeOrMethodDef => &[Some(T::TypeDef), Some(T::MethodDef)],
        }
    }

    /// Number of low bits used for the tag
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        let count = self.tables().len();
        (usize::BITS - (count - 1).leading_zeros()) as u8
    }
}

/// A decoded coded index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodedIndex {
    /// The referenced table
    pub tag: TableId,
    /// 1-based row, 0 for a null reference
    pub row: u32,
    /// The equivalent metadata token
    pub token: Token,
}

impl CodedIndex {
    /// Create a coded index for `row` in `tag`
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: Token::from_parts(tag, row),
        }
    }

    /// True if the reference points nowhere
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.row == 0
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn tag_bits() {
        let expected = [
            (CodedIndexType::TypeDefOrRef, 2),
            (CodedIndexType::HasConstant, 2),
            (CodedIndexType::HasCustomAttribute, 5),
            (CodedIndexType::HasFieldMarshal, 1),
            (CodedIndexType::HasDeclSecurity, 2),
            (CodedIndexType::MemberRefParent, 3),
            (CodedIndexType::HasSemantics, 1),
            (CodedIndexType::MethodDefOrRef, 1),
            (CodedIndexType::MemberForwarded, 1),
            (CodedIndexType::Implementation, 2),
            (CodedIndexType::CustomAttributeType, 3),
            (CodedIndexType::ResolutionScope, 2),
            (CodedIndexType::TypeOrMethodDef, 1),
        ];

        assert_eq!(expected.len(), CodedIndexType::COUNT);
        for (kind, bits) in expected {
            assert_eq!(kind.tag_bits(), bits, "{kind:?}");
        }
        assert!(CodedIndexType::iter().all(|kind| !kind.tables().is_empty()));
    }

    #[test]
    fn token() {
        let index = CodedIndex::new(TableId::TypeRef, 7);
        assert_eq!(index.token.value(), 0x0100_0007);
        assert!(!index.is_null());
        assert!(CodedIndex::new(TableId::TypeDef, 0).is_null());
    }
}

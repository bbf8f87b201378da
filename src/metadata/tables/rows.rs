//! Owned, typed rows of the tables the browser works with.
//!
//! Rows are decoded from the raw column values of [`TablesHeader`]: heap indices are resolved
//! to owned strings and blob bytes, coded indices to [`CodedIndex`]. Blobs are not interpreted
//! here, signatures are decoded lazily when a member is described.

use crate::{
    metadata::{
        streams::{Blob, Guid, Strings},
        tables::{CodedIndex, CodedIndexType, TableId, TableInfo, TablesHeader},
    },
    Result,
};

/// Heaps and sizes needed to turn raw column values into typed rows
pub struct RowContext<'a> {
    /// The `#Strings` heap
    pub strings: Strings<'a>,
    /// The `#Blob` heap
    pub blob: Blob<'a>,
    /// The `#GUID` heap
    pub guid: Guid<'a>,
    /// Sizes of the tables stream
    pub info: &'a TableInfo,
}

impl RowContext<'_> {
    fn string(&self, index: u32) -> Result<String> {
        Ok(self.strings.get(index as usize)?.to_string())
    }

    fn blob(&self, index: u32) -> Result<Vec<u8>> {
        Ok(self.blob.get(index as usize)?.to_vec())
    }

    fn guid(&self, index: u32) -> Result<Option<uguid::Guid>> {
        if index == 0 {
            return Ok(None);
        }

        Ok(Some(self.guid.get(index as usize)?))
    }

    fn coded(&self, value: u32, coded: CodedIndexType) -> Result<CodedIndex> {
        self.info.decode_coded_index(value, coded)
    }
}

/// A typed row which can be decoded from its raw column values
pub trait RowReadable: Sized {
    /// The table this row lives in
    const TABLE: TableId;

    /// Decode the row `rid` from `values`
    ///
    /// # Errors
    /// Returns an error if a heap index or coded index is invalid.
    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self>;
}

/// Decode all rows of `T::TABLE`
///
/// # Errors
/// Returns the first row decoding error.
pub fn read_rows<T: RowReadable>(tables: &TablesHeader, ctx: &RowContext) -> Result<Vec<T>> {
    let table = tables.table(T::TABLE);
    (1..=table.len())
        .map(|rid| match table.row(rid) {
            Some(values) => T::read(rid, values, ctx),
            None => Err(malformed_error!("Missing row {} in {}", rid, T::TABLE)),
        })
        .collect()
}

/// Row of the `Module` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRow {
    /// Module name, usually the file name
    pub name: String,
    /// Module version id
    pub mvid: Option<uguid::Guid>,
}

impl RowReadable for ModuleRow {
    const TABLE: TableId = TableId::Module;

    fn read(_rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(ModuleRow {
            name: ctx.string(values[1])?,
            mvid: ctx.guid(values[2])?,
        })
    }
}

/// Row of the `Assembly` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRow {
    /// Simple assembly name
    pub name: String,
    /// Version as major, minor, build, revision
    pub version: [u16; 4],
}

impl RowReadable for AssemblyRow {
    const TABLE: TableId = TableId::Assembly;

    fn read(_rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(AssemblyRow {
            name: ctx.string(values[7])?,
            version: [
                values[1] as u16,
                values[2] as u16,
                values[3] as u16,
                values[4] as u16,
            ],
        })
    }
}

/// Row of the `TypeRef` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRefRow {
    /// Row id
    pub rid: u32,
    /// Module, assembly or enclosing type reference
    pub resolution_scope: CodedIndex,
    /// Simple name
    pub name: String,
    /// Namespace, empty for nested references
    pub namespace: String,
}

impl RowReadable for TypeRefRow {
    const TABLE: TableId = TableId::TypeRef;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(TypeRefRow {
            rid,
            resolution_scope: ctx.coded(values[0], CodedIndexType::ResolutionScope)?,
            name: ctx.string(values[1])?,
            namespace: ctx.string(values[2])?,
        })
    }
}

/// Row of the `TypeDef` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefRow {
    /// Row id
    pub rid: u32,
    /// `TypeAttributes`
    pub flags: u32,
    /// Simple name, including a generic arity suffix
    pub name: String,
    /// Namespace, empty for nested and global types
    pub namespace: String,
    /// Base type, null for interfaces and `System.Object`
    pub extends: CodedIndex,
    /// First row of the field list
    pub field_list: u32,
    /// First row of the method list
    pub method_list: u32,
}

impl RowReadable for TypeDefRow {
    const TABLE: TableId = TableId::TypeDef;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(TypeDefRow {
            rid,
            flags: values[0],
            name: ctx.string(values[1])?,
            namespace: ctx.string(values[2])?,
            extends: ctx.coded(values[3], CodedIndexType::TypeDefOrRef)?,
            field_list: values[4],
            method_list: values[5],
        })
    }
}

/// Row of the `Field` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    /// Row id
    pub rid: u32,
    /// `FieldAttributes`
    pub flags: u16,
    /// Field name
    pub name: String,
    /// Raw field signature
    pub signature: Vec<u8>,
}

impl RowReadable for FieldRow {
    const TABLE: TableId = TableId::Field;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(FieldRow {
            rid,
            flags: values[0] as u16,
            name: ctx.string(values[1])?,
            signature: ctx.blob(values[2])?,
        })
    }
}

/// Row of the `MethodDef` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefRow {
    /// Row id
    pub rid: u32,
    /// RVA of the method body, 0 for abstract and extern methods
    pub rva: u32,
    /// `MethodImplAttributes`
    pub impl_flags: u16,
    /// `MethodAttributes`
    pub flags: u16,
    /// Method name
    pub name: String,
    /// Raw method signature
    pub signature: Vec<u8>,
    /// First row of the parameter list
    pub param_list: u32,
}

impl RowReadable for MethodDefRow {
    const TABLE: TableId = TableId::MethodDef;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(MethodDefRow {
            rid,
            rva: values[0],
            impl_flags: values[1] as u16,
            flags: values[2] as u16,
            name: ctx.string(values[3])?,
            signature: ctx.blob(values[4])?,
            param_list: values[5],
        })
    }
}

/// Row of the `Property` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRow {
    /// Row id
    pub rid: u32,
    /// `PropertyAttributes`
    pub flags: u16,
    /// Property name
    pub name: String,
    /// Raw property signature
    pub signature: Vec<u8>,
}

impl RowReadable for PropertyRow {
    const TABLE: TableId = TableId::Property;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(PropertyRow {
            rid,
            flags: values[0] as u16,
            name: ctx.string(values[1])?,
            signature: ctx.blob(values[2])?,
        })
    }
}

/// Row of the `Event` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    /// Row id
    pub rid: u32,
    /// `EventAttributes`
    pub flags: u16,
    /// Event name
    pub name: String,
    /// Delegate type of the event
    pub event_type: CodedIndex,
}

impl RowReadable for EventRow {
    const TABLE: TableId = TableId::Event;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(EventRow {
            rid,
            flags: values[0] as u16,
            name: ctx.string(values[1])?,
            event_type: ctx.coded(values[2], CodedIndexType::TypeDefOrRef)?,
        })
    }
}

/// Row of the `PropertyMap` or `EventMap` table: a type owning a run of properties or events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberMapRow {
    /// The owning `TypeDef` row
    pub parent: u32,
    /// First row of the owned run
    pub list: u32,
}

/// Row of the `PropertyMap` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMapRow(pub MemberMapRow);

impl RowReadable for PropertyMapRow {
    const TABLE: TableId = TableId::PropertyMap;

    fn read(_rid: u32, values: &[u32], _ctx: &RowContext) -> Result<Self> {
        Ok(PropertyMapRow(MemberMapRow {
            parent: values[0],
            list: values[1],
        }))
    }
}

/// Row of the `EventMap` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMapRow(pub MemberMapRow);

impl RowReadable for EventMapRow {
    const TABLE: TableId = TableId::EventMap;

    fn read(_rid: u32, values: &[u32], _ctx: &RowContext) -> Result<Self> {
        Ok(EventMapRow(MemberMapRow {
            parent: values[0],
            list: values[1],
        }))
    }
}

/// Row of the `MethodSemantics` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSemanticsRow {
    /// `MethodSemanticsAttributes`
    pub semantics: u16,
    /// The accessor `MethodDef` row
    pub method: u32,
    /// The property or event the accessor belongs to
    pub association: CodedIndex,
}

impl RowReadable for MethodSemanticsRow {
    const TABLE: TableId = TableId::MethodSemantics;

    fn read(_rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(MethodSemanticsRow {
            semantics: values[0] as u16,
            method: values[1],
            association: ctx.coded(values[2], CodedIndexType::HasSemantics)?,
        })
    }
}

/// Row of the `TypeSpec` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpecRow {
    /// Row id
    pub rid: u32,
    /// Raw type signature
    pub signature: Vec<u8>,
}

impl RowReadable for TypeSpecRow {
    const TABLE: TableId = TableId::TypeSpec;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(TypeSpecRow {
            rid,
            signature: ctx.blob(values[0])?,
        })
    }
}

/// Row of the `NestedClass` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedClassRow {
    /// The nested `TypeDef` row
    pub nested: u32,
    /// The enclosing `TypeDef` row
    pub enclosing: u32,
}

impl RowReadable for NestedClassRow {
    const TABLE: TableId = TableId::NestedClass;

    fn read(_rid: u32, values: &[u32], _ctx: &RowContext) -> Result<Self> {
        Ok(NestedClassRow {
            nested: values[0],
            enclosing: values[1],
        })
    }
}

/// Row of the `GenericParam` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParamRow {
    /// Row id
    pub rid: u32,
    /// Zero based position in the owner's parameter list
    pub number: u16,
    /// `GenericParamAttributes`
    pub flags: u16,
    /// Owning type or method
    pub owner: CodedIndex,
    /// Parameter name, e.g. `T`
    pub name: String,
}

impl RowReadable for GenericParamRow {
    const TABLE: TableId = TableId::GenericParam;

    fn read(rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(GenericParamRow {
            rid,
            number: values[0] as u16,
            flags: values[1] as u16,
            owner: ctx.coded(values[2], CodedIndexType::TypeOrMethodDef)?,
            name: ctx.string(values[3])?,
        })
    }
}

/// Row of the `GenericParamConstraint` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenericParamConstraintRow {
    /// The constrained `GenericParam` row
    pub owner: u32,
    /// The required base type or interface
    pub constraint: CodedIndex,
}

impl RowReadable for GenericParamConstraintRow {
    const TABLE: TableId = TableId::GenericParamConstraint;

    fn read(_rid: u32, values: &[u32], ctx: &RowContext) -> Result<Self> {
        Ok(GenericParamConstraintRow {
            owner: values[0],
            constraint: ctx.coded(values[1], CodedIndexType::TypeDefOrRef)?,
        })
    }
}

/// Row of one of the `*Ptr` indirection tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtrRow {
    /// The row in the target table
    pub target: u32,
}

macro_rules! ptr_row {
    ($name:ident, $table:expr) => {
        /// Row of an indirection table
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub PtrRow);

        impl RowReadable for $name {
            const TABLE: TableId = $table;

            fn read(_rid: u32, values: &[u32], _ctx: &RowContext) -> Result<Self> {
                Ok($name(PtrRow { target: values[0] }))
            }
        }
    };
}

ptr_row!(FieldPtrRow, TableId::FieldPtr);
ptr_row!(MethodPtrRow, TableId::MethodPtr);
ptr_row!(PropertyPtrRow, TableId::PropertyPtr);
ptr_row!(EventPtrRow, TableId::EventPtr);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typedef_row() {
        let strings = Strings::from(b"\0Widget\0Acme.Tools\0").unwrap();
        let info = TableInfo::new(0, &[(TableId::TypeDef, 1)]);
        let ctx = RowContext {
            strings,
            blob: Blob::empty(),
            guid: Guid::empty(),
            info: &info,
        };

        // extends TypeRef row 3: (3 << 2) | 1
        let row = TypeDefRow::read(1, &[0x0010_0001, 1, 8, 0x0D, 1, 2], &ctx).unwrap();
        assert_eq!(row.name, "Widget");
        assert_eq!(row.namespace, "Acme.Tools");
        assert_eq!(row.extends.tag, TableId::TypeRef);
        assert_eq!(row.extends.row, 3);
        assert_eq!(row.method_list, 2);

        assert!(TypeDefRow::read(1, &[0, 100, 0, 0, 1, 1], &ctx).is_err());
        assert!(TypeDefRow::read(1, &[0, 1, 8, 0x03, 1, 1], &ctx).is_err());
    }

    #[test]
    fn field_row_copies_signature() {
        let blob = Blob::from(&[0x00, 0x02, 0x06, 0x08]).unwrap();
        let strings = Strings::from(b"\0count\0").unwrap();
        let info = TableInfo::new(0, &[]);
        let ctx = RowContext {
            strings,
            blob,
            guid: Guid::empty(),
            info: &info,
        };

        let row = FieldRow::read(4, &[0x0006, 1, 1], &ctx).unwrap();
        assert_eq!(row.rid, 4);
        assert_eq!(row.flags, 0x0006);
        assert_eq!(row.name, "count");
        assert_eq!(row.signature, vec![0x06, 0x08]);
    }
}

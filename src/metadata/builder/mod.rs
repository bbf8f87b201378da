//! Declarative construction of .NET metadata.
//!
//! [`MetadataBuilder`] collects table rows the way a compiler would emit them (types followed by
//! their fields and methods, properties and events through their maps) and serializes them into
//! a metadata root with `#~`, `#Strings`, `#Blob` and `#GUID` streams. Rows are written through
//! the same column schema the reader uses, so anything the builder emits can be loaded back
//! with [`CilModule::from_metadata`].
//!
//! It is used to craft fixture modules for tests and benchmarks.
//!
//! # Examples
//!
//! ```rust
//! use dotbrowse::metadata::builder::MetadataBuilder;
//! use dotbrowse::metadata::signatures::{SignatureField, TypeSignature};
//! use dotbrowse::metadata::typesystem::{FieldAttributes, TypeAttributes};
//!
//! let mut builder = MetadataBuilder::new("Sample.dll");
//! let object = builder.type_ref("System", "Object");
//! builder.type_def(TypeAttributes::PUBLIC, "N", "C", Some(object));
//! builder.field(
//!     FieldAttributes::PUBLIC,
//!     "F",
//!     &SignatureField { modifiers: vec![], base: TypeSignature::I4 },
//! )?;
//!
//! let module = builder.build_module()?;
//! assert_eq!(module.types()?[0].full_name, "N.C");
//! # Ok::<(), dotbrowse::Error>(())
//! ```

mod heaps;
mod pe;

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::{
    file::io::{write_le, write_le_dyn},
    metadata::{
        cilmodule::CilModule,
        root::CIL_HEADER_MAGIC,
        signatures::{
            encode_field_signature, encode_method_signature, encode_property_signature,
            encode_typespec_signature, SignatureField, SignatureMethod, SignatureProperty,
            SignatureTypeSpec,
        },
        tables::{
            columns, CodedIndex, Column, TableId, TableInfo, HEAP_LARGE_BLOB, HEAP_LARGE_GUID,
            HEAP_LARGE_STRINGS,
        },
        token::Token,
        typesystem::{FieldAttributes, MethodAttributes, MethodSemanticsAttributes, TypeAttributes},
    },
    Result,
};

use heaps::{align4, BlobHeap, GuidHeap, StringHeap};

/// Runtime version written into the metadata root
pub const RUNTIME_VERSION: &str = "v4.0.30319";

/// Resolution scope used for all type references
pub const CORLIB_NAME: &str = "mscorlib";

/// One column value of a row under construction
#[derive(Debug, Clone, Copy)]
enum Cell {
    /// Constant, heap offset or simple table index
    Value(u32),
    /// Coded index, packed once the table sizes are known
    Coded(CodedIndex),
}

/// Builds a metadata root from declarative rows
pub struct MetadataBuilder {
    module_name: String,
    strings: StringHeap,
    blobs: BlobHeap,
    guids: GuidHeap,
    tables: HashMap<TableId, Vec<Vec<Cell>>>,
    type_refs: HashMap<(Option<Token>, String, String), Token>,
    corlib: Option<u32>,
}

impl MetadataBuilder {
    /// Start a module called `module_name`, with its `<Module>` pseudo type already defined
    #[must_use]
    pub fn new(module_name: &str) -> Self {
        let mut builder = MetadataBuilder {
            module_name: module_name.to_string(),
            strings: StringHeap::new(),
            blobs: BlobHeap::new(),
            guids: GuidHeap::new(),
            tables: HashMap::new(),
            type_refs: HashMap::new(),
            corlib: None,
        };

        let name = builder.strings.intern(module_name);
        let mvid = builder.guids.push(module_version_id(module_name));
        builder.push(
            TableId::Module,
            vec![
                Cell::Value(0),
                Cell::Value(name),
                Cell::Value(mvid),
                Cell::Value(0),
                Cell::Value(0),
            ],
        );
        builder.type_def(TypeAttributes::empty(), "", "<Module>", None);

        builder
    }

    fn push(&mut self, table: TableId, row: Vec<Cell>) -> u32 {
        let rows = self.tables.entry(table).or_default();
        rows.push(row);
        rows.len() as u32
    }

    fn row_count(&self, table: TableId) -> u32 {
        self.tables.get(&table).map_or(0, |rows| rows.len() as u32)
    }

    fn last_row(&self, table: TableId) -> Option<&Vec<Cell>> {
        self.tables.get(&table).and_then(|rows| rows.last())
    }

    /// Add the `Assembly` row
    pub fn assembly(&mut self, name: &str, version: [u16; 4]) -> &mut Self {
        let name = self.strings.intern(name);
        self.push(
            TableId::Assembly,
            vec![
                Cell::Value(0x8004), // SHA1
                Cell::Value(u32::from(version[0])),
                Cell::Value(u32::from(version[1])),
                Cell::Value(u32::from(version[2])),
                Cell::Value(u32::from(version[3])),
                Cell::Value(0),
                Cell::Value(0),
                Cell::Value(name),
                Cell::Value(0),
            ],
        );
        self
    }

    fn corlib_scope(&mut self) -> CodedIndex {
        let rid = match self.corlib {
            Some(rid) => rid,
            None => {
                let name = self.strings.intern(CORLIB_NAME);
                let rid = self.push(
                    TableId::AssemblyRef,
                    vec![
                        Cell::Value(4),
                        Cell::Value(0),
                        Cell::Value(0),
                        Cell::Value(0),
                        Cell::Value(0),
                        Cell::Value(0),
                        Cell::Value(name),
                        Cell::Value(0),
                        Cell::Value(0),
                    ],
                );
                self.corlib = Some(rid);
                rid
            }
        };

        CodedIndex::new(TableId::AssemblyRef, rid)
    }

    /// Reference `namespace.name` in the core library, equal references share one row
    pub fn type_ref(&mut self, namespace: &str, name: &str) -> Token {
        let key = (None, namespace.to_string(), name.to_string());
        if let Some(token) = self.type_refs.get(&key) {
            return *token;
        }

        let scope = self.corlib_scope();
        let token = self.push_type_ref(scope, namespace, name);
        self.type_refs.insert(key, token);
        token
    }

    /// Reference the type `name` nested into the referenced type `enclosing`
    pub fn nested_type_ref(&mut self, enclosing: Token, name: &str) -> Token {
        let key = (Some(enclosing), String::new(), name.to_string());
        if let Some(token) = self.type_refs.get(&key) {
            return *token;
        }

        let scope = CodedIndex::new(TableId::TypeRef, enclosing.row());
        let token = self.push_type_ref(scope, "", name);
        self.type_refs.insert(key, token);
        token
    }

    fn push_type_ref(&mut self, scope: CodedIndex, namespace: &str, name: &str) -> Token {
        let name = self.strings.intern(name);
        let namespace = self.strings.intern(namespace);
        let rid = self.push(
            TableId::TypeRef,
            vec![Cell::Coded(scope), Cell::Value(name), Cell::Value(namespace)],
        );

        Token::from_parts(TableId::TypeRef, rid)
    }

    /// Define a type; fields, methods, properties and events added next belong to it
    pub fn type_def(
        &mut self,
        flags: TypeAttributes,
        namespace: &str,
        name: &str,
        extends: Option<Token>,
    ) -> Token {
        let name = self.strings.intern(name);
        let namespace = self.strings.intern(namespace);
        let extends = match extends {
            Some(token) => coded(token),
            None => CodedIndex::new(TableId::TypeDef, 0),
        };
        let field_list = self.row_count(TableId::Field) + 1;
        let method_list = self.row_count(TableId::MethodDef) + 1;

        let rid = self.push(
            TableId::TypeDef,
            vec![
                Cell::Value(flags.bits()),
                Cell::Value(name),
                Cell::Value(namespace),
                Cell::Coded(extends),
                Cell::Value(field_list),
                Cell::Value(method_list),
            ],
        );

        Token::from_parts(TableId::TypeDef, rid)
    }

    fn current_type(&self) -> u32 {
        self.row_count(TableId::TypeDef)
    }

    /// Add a field to the current type
    ///
    /// # Errors
    /// Returns an error if the signature can not be encoded.
    pub fn field(
        &mut self,
        flags: FieldAttributes,
        name: &str,
        signature: &SignatureField,
    ) -> Result<Token> {
        let signature = self.blobs.intern(&encode_field_signature(signature)?)?;
        let name = self.strings.intern(name);
        let rid = self.push(
            TableId::Field,
            vec![
                Cell::Value(u32::from(flags.bits())),
                Cell::Value(name),
                Cell::Value(signature),
            ],
        );

        Ok(Token::from_parts(TableId::Field, rid))
    }

    /// Add a method without body to the current type
    ///
    /// # Errors
    /// Returns an error if the signature can not be encoded.
    pub fn method(
        &mut self,
        flags: MethodAttributes,
        name: &str,
        signature: &SignatureMethod,
    ) -> Result<Token> {
        let signature = self.blobs.intern(&encode_method_signature(signature)?)?;
        let name = self.strings.intern(name);
        let param_list = self.row_count(TableId::Param) + 1;
        let rid = self.push(
            TableId::MethodDef,
            vec![
                Cell::Value(0),
                Cell::Value(0),
                Cell::Value(u32::from(flags.bits())),
                Cell::Value(name),
                Cell::Value(signature),
                Cell::Value(param_list),
            ],
        );

        Ok(Token::from_parts(TableId::MethodDef, rid))
    }

    /// Add a property to the current type, accessors are bound with [`Self::semantics`]
    ///
    /// # Errors
    /// Returns an error if the signature can not be encoded.
    pub fn property(&mut self, name: &str, signature: &SignatureProperty) -> Result<Token> {
        let signature = self.blobs.intern(&encode_property_signature(signature)?)?;
        let name = self.strings.intern(name);
        self.member_map(TableId::PropertyMap, TableId::Property);
        let rid = self.push(
            TableId::Property,
            vec![Cell::Value(0), Cell::Value(name), Cell::Value(signature)],
        );

        Ok(Token::from_parts(TableId::Property, rid))
    }

    /// Add an event of delegate type `event_type` to the current type
    pub fn event(&mut self, name: &str, event_type: Token) -> Token {
        let name = self.strings.intern(name);
        self.member_map(TableId::EventMap, TableId::Event);
        let rid = self.push(
            TableId::Event,
            vec![Cell::Value(0), Cell::Value(name), Cell::Coded(coded(event_type))],
        );

        Token::from_parts(TableId::Event, rid)
    }

    /// Open a map row for the current type unless the last one already belongs to it
    fn member_map(&mut self, map: TableId, members: TableId) {
        let parent = self.current_type();
        let mapped = matches!(
            self.last_row(map).and_then(|row| row.first()),
            Some(Cell::Value(owner)) if *owner == parent
        );

        if !mapped {
            let list = self.row_count(members) + 1;
            self.push(map, vec![Cell::Value(parent), Cell::Value(list)]);
        }
    }

    /// Bind `method` as accessor of the property or event `association`
    pub fn semantics(
        &mut self,
        semantics: MethodSemanticsAttributes,
        method: Token,
        association: Token,
    ) -> &mut Self {
        self.push(
            TableId::MethodSemantics,
            vec![
                Cell::Value(u32::from(semantics.bits())),
                Cell::Value(method.row()),
                Cell::Coded(coded(association)),
            ],
        );
        self
    }

    /// Declare `nested` as nested into `enclosing`
    pub fn nest(&mut self, nested: Token, enclosing: Token) -> &mut Self {
        self.push(
            TableId::NestedClass,
            vec![Cell::Value(nested.row()), Cell::Value(enclosing.row())],
        );
        self
    }

    /// Declare generic parameter `number` of the type or method `owner`
    pub fn generic_param(&mut self, owner: Token, number: u16, name: &str) -> Token {
        let name = self.strings.intern(name);
        let rid = self.push(
            TableId::GenericParam,
            vec![
                Cell::Value(u32::from(number)),
                Cell::Value(0),
                Cell::Coded(coded(owner)),
                Cell::Value(name),
            ],
        );

        Token::from_parts(TableId::GenericParam, rid)
    }

    /// Constrain the generic parameter `param` to `constraint`
    pub fn generic_param_constraint(&mut self, param: Token, constraint: Token) -> &mut Self {
        self.push(
            TableId::GenericParamConstraint,
            vec![Cell::Value(param.row()), Cell::Coded(coded(constraint))],
        );
        self
    }

    /// Add a `TypeSpec`, e.g. an instantiated generic type
    ///
    /// # Errors
    /// Returns an error if the signature can not be encoded.
    pub fn type_spec(&mut self, signature: &SignatureTypeSpec) -> Result<Token> {
        let signature = self.blobs.intern(&encode_typespec_signature(signature)?)?;
        let rid = self.push(TableId::TypeSpec, vec![Cell::Value(signature)]);

        Ok(Token::from_parts(TableId::TypeSpec, rid))
    }

    /// Serialize everything into a metadata root
    ///
    /// # Errors
    /// Returns an error if a coded index can not address its target.
    pub fn build(&self) -> Result<Vec<u8>> {
        let tables = self.tables_stream()?;
        let strings = self.strings.bytes();
        let blobs = self.blobs.bytes();
        let guids = self.guids.bytes();

        let streams: [(&str, &[u8]); 4] = [
            ("#~", &tables),
            ("#Strings", &strings),
            ("#GUID", &guids),
            ("#Blob", &blobs),
        ];

        let version_len = align4(RUNTIME_VERSION.len() + 1);
        let directory_size: usize = streams
            .iter()
            .map(|(name, _)| 8 + align4(name.len() + 1))
            .sum();
        let header_size = 16 + version_len + 4 + directory_size;

        let mut out = Vec::new();
        write_le::<u32>(&mut out, CIL_HEADER_MAGIC);
        write_le::<u16>(&mut out, 1);
        write_le::<u16>(&mut out, 1);
        write_le::<u32>(&mut out, 0);
        write_le::<u32>(&mut out, version_len as u32);
        out.extend_from_slice(RUNTIME_VERSION.as_bytes());
        out.resize(16 + version_len, 0);
        write_le::<u16>(&mut out, 0);
        write_le::<u16>(&mut out, streams.len() as u16);

        let mut offset = header_size;
        for (name, data) in &streams {
            write_le::<u32>(&mut out, offset as u32);
            write_le::<u32>(&mut out, data.len() as u32);
            let name_start = out.len();
            out.extend_from_slice(name.as_bytes());
            out.resize(name_start + align4(name.len() + 1), 0);
            offset += data.len();
        }

        for (_, data) in &streams {
            out.extend_from_slice(data);
        }

        Ok(out)
    }

    /// Serialize into a PE image that carries the metadata
    ///
    /// # Errors
    /// Returns an error if the metadata can not be serialized.
    pub fn build_pe(&self) -> Result<Vec<u8>> {
        pe::wrap_metadata(&self.build()?)
    }

    /// Serialize and load the result
    ///
    /// # Errors
    /// Returns [`crate::Error::ModuleLoad`] if the emitted metadata does not load.
    pub fn build_module(&self) -> Result<CilModule> {
        CilModule::from_metadata(&self.module_name, &self.build()?)
    }

    fn tables_stream(&self) -> Result<Vec<u8>> {
        let mut heap_sizes = 0;
        if self.strings.len() > usize::from(u16::MAX) {
            heap_sizes |= HEAP_LARGE_STRINGS;
        }
        if self.guids.len() > usize::from(u16::MAX) {
            heap_sizes |= HEAP_LARGE_GUID;
        }
        if self.blobs.len() > usize::from(u16::MAX) {
            heap_sizes |= HEAP_LARGE_BLOB;
        }

        let row_counts: Vec<(TableId, u32)> = TableId::iter()
            .map(|table| (table, self.row_count(table)))
            .filter(|(_, count)| *count > 0)
            .collect();
        let info = TableInfo::new(heap_sizes, &row_counts);

        let valid = row_counts
            .iter()
            .fold(0_u64, |valid, (table, _)| valid | (1 << *table as u8));

        let mut out = Vec::new();
        write_le::<u32>(&mut out, 0);
        write_le::<u8>(&mut out, 2);
        write_le::<u8>(&mut out, 0);
        write_le::<u8>(&mut out, heap_sizes);
        write_le::<u8>(&mut out, 1);
        write_le::<u64>(&mut out, valid);
        write_le::<u64>(&mut out, 0);
        for (_, count) in &row_counts {
            write_le::<u32>(&mut out, *count);
        }

        for (table, _) in &row_counts {
            let layout = columns(*table);
            for row in self.tables.get(table).into_iter().flatten() {
                if row.len() != layout.len() {
                    return Err(malformed_error!(
                        "Row of {} has {} columns, expected {}",
                        table,
                        row.len(),
                        layout.len()
                    ));
                }

                for (cell, column) in row.iter().zip(layout) {
                    let value = match (cell, column) {
                        (Cell::Coded(index), Column::Coded(kind)) => {
                            info.encode_coded_index(*index, *kind)?
                        }
                        (Cell::Value(value), _) => *value,
                        (Cell::Coded(index), other) => {
                            return Err(malformed_error!(
                                "Coded index {} in {:?} column of {}",
                                index.token,
                                other,
                                table
                            ))
                        }
                    };

                    write_le_dyn(&mut out, value, info.column_size(*column) == 4)?;
                }
            }
        }

        out.resize(align4(out.len()), 0);
        Ok(out)
    }
}

/// Token of a `TypeDefOrRef`-style reference as a coded index
fn coded(token: Token) -> CodedIndex {
    match TableId::from_u8(token.table()) {
        Some(table) => CodedIndex::new(table, token.row()),
        // Unknown tables are rejected when the row is packed
        None => CodedIndex::new(TableId::Module, token.row()),
    }
}

/// A stable module version id derived from the module name
fn module_version_id(name: &str) -> uguid::Guid {
    // FNV-1a, spread over 16 bytes
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let mut bytes = [0u8; 16];
    for (index, byte) in name.bytes().chain(0..16).enumerate() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
        bytes[index % 16] ^= (hash >> 32) as u8;
    }

    uguid::Guid::from_bytes(bytes)
}

//! A loaded .NET module.
//!
//! [`CilModule`] reads the metadata of a module once, into owned rows, and then answers the
//! questions the browser asks: which types are defined, what they look like, and which members
//! they expose (see [`crate::metadata::members`]). Signatures are decoded on demand, so a
//! broken member only surfaces when that member is described.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotbrowse::CilModule;
//! use std::path::Path;
//!
//! let module = CilModule::from_file(Path::new("MyLibrary.dll"))?;
//! for ty in module.types()? {
//!     println!("{}", ty.full_name);
//! }
//! # Ok::<(), dotbrowse::Error>(())
//! ```

use std::{
    collections::HashMap,
    ops::Range,
    path::{Path, PathBuf},
};

use crate::{
    file::File,
    metadata::{
        cor20header::Cor20Header,
        root::Root,
        signatures::parse_type_spec_signature,
        streams::{Blob, Guid, StreamHeader, Strings},
        tables::{
            read_rows, AssemblyRow, CodedIndex, EventMapRow, EventPtrRow, EventRow, FieldPtrRow,
            FieldRow, GenericParamConstraintRow, GenericParamRow, MemberMapRow, MethodDefRow,
            MethodPtrRow, MethodSemanticsRow, ModuleRow, NestedClassRow, PropertyMapRow,
            PropertyPtrRow, PropertyRow, RowContext, TableId, TablesHeader, TypeDefRow,
            TypeRefRow, TypeSpecRow,
        },
        token::Token,
        typesystem::{
            well_known_by_name, CilFlavor, CilPrimitiveKind, CilType, TypeAttributes,
            SYSTEM_NAMESPACE,
        },
    },
    Error::{OutOfBounds, TypeNotFound},
    Result,
};

/// Name of the pseudo type holding global fields and methods
pub const MODULE_TYPE_NAME: &str = "<Module>";

/// Namespace and full name of a `TypeDef` or `TypeRef`, computed once per row
#[derive(Debug, Clone)]
struct TypeName {
    namespace: Option<String>,
    full_name: String,
}

/// A .NET module with its metadata decoded
pub struct CilModule {
    path: PathBuf,
    runtime_version: String,
    module: ModuleRow,
    assembly: Option<AssemblyRow>,
    table_count: usize,
    type_refs: Vec<TypeRefRow>,
    type_ref_names: Vec<TypeName>,
    type_defs: Vec<TypeDefRow>,
    type_def_names: Vec<TypeName>,
    fields: Vec<FieldRow>,
    methods: Vec<MethodDefRow>,
    properties: Vec<PropertyRow>,
    events: Vec<EventRow>,
    type_specs: Vec<TypeSpecRow>,
    property_maps: Vec<MemberMapRow>,
    event_maps: Vec<MemberMapRow>,
    field_ptrs: Vec<u32>,
    method_ptrs: Vec<u32>,
    property_ptrs: Vec<u32>,
    event_ptrs: Vec<u32>,
    semantics: HashMap<Token, Vec<MethodSemanticsRow>>,
    generic_params: HashMap<Token, Vec<GenericParamRow>>,
    constraints: HashMap<u32, Vec<CodedIndex>>,
    nested_types: HashMap<u32, Vec<u32>>,
    is_corlib: bool,
}

impl CilModule {
    /// Load a module from a PE file on disk
    ///
    /// # Errors
    /// Returns [`crate::Error::ModuleLoad`] if the file can not be read or is not a valid .NET
    /// module.
    pub fn from_file(path: &Path) -> Result<CilModule> {
        let load = || -> Result<CilModule> {
            let file = File::from_file(path)?;
            Self::from_pe(path, &file)
        };

        load().map_err(|error| error.into_module_load(path))
    }

    /// Load a module from a PE image in memory
    ///
    /// # Errors
    /// Returns [`crate::Error::ModuleLoad`] if the buffer is not a valid .NET module.
    pub fn from_mem(data: Vec<u8>) -> Result<CilModule> {
        let path = Path::new("<memory>");
        let load = || -> Result<CilModule> {
            let file = File::from_mem(data)?;
            Self::from_pe(path, &file)
        };

        load().map_err(|error| error.into_module_load(path))
    }

    /// Load a module from a bare metadata root (the `BSJB` blob the CLI header points to)
    ///
    /// `name` labels the module in errors and log output.
    ///
    /// # Errors
    /// Returns [`crate::Error::ModuleLoad`] if the metadata is malformed.
    pub fn from_metadata(name: &str, data: &[u8]) -> Result<CilModule> {
        Self::load(Path::new(name), data).map_err(|error| error.into_module_load(name))
    }

    fn from_pe(path: &Path, file: &File) -> Result<CilModule> {
        let (clr_rva, clr_size) = file.clr()?;
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20 = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

        let meta_offset = file.rva_to_offset(cor20.meta_data_rva as usize)?;
        let meta = file.data_slice(meta_offset, cor20.meta_data_size as usize)?;

        Self::load(path, meta)
    }

    fn load(path: &Path, data: &[u8]) -> Result<CilModule> {
        let root = Root::read(data)?;

        let Some(tables_header) = root.stream("#~").or_else(|| root.stream("#-")) else {
            return Err(malformed_error!("No tables stream present"));
        };
        let tables = TablesHeader::from(stream_data(data, tables_header)?)?;

        let strings = match root.stream("#Strings") {
            Some(header) => Strings::from(stream_data(data, header)?)?,
            None => Strings::empty(),
        };
        let blob = match root.stream("#Blob") {
            Some(header) => Blob::from(stream_data(data, header)?)?,
            None => Blob::empty(),
        };
        let guid = match root.stream("#GUID") {
            Some(header) => Guid::from(stream_data(data, header)?)?,
            None => Guid::empty(),
        };

        let ctx = RowContext {
            strings,
            blob,
            guid,
            info: tables.info(),
        };

        let Some(module) = read_rows::<ModuleRow>(&tables, &ctx)?.into_iter().next() else {
            return Err(malformed_error!("Module table is empty"));
        };
        let assembly = read_rows::<AssemblyRow>(&tables, &ctx)?.into_iter().next();

        let type_refs = read_rows::<TypeRefRow>(&tables, &ctx)?;
        let type_defs = read_rows::<TypeDefRow>(&tables, &ctx)?;

        let mut semantics: HashMap<Token, Vec<MethodSemanticsRow>> = HashMap::new();
        for row in read_rows::<MethodSemanticsRow>(&tables, &ctx)? {
            semantics.entry(row.association.token).or_default().push(row);
        }

        let mut generic_params: HashMap<Token, Vec<GenericParamRow>> = HashMap::new();
        for row in read_rows::<GenericParamRow>(&tables, &ctx)? {
            generic_params.entry(row.owner.token).or_default().push(row);
        }
        for params in generic_params.values_mut() {
            params.sort_by_key(|param| param.number);
        }

        let mut constraints: HashMap<u32, Vec<CodedIndex>> = HashMap::new();
        for row in read_rows::<GenericParamConstraintRow>(&tables, &ctx)? {
            constraints.entry(row.owner).or_default().push(row.constraint);
        }

        let mut enclosing = HashMap::new();
        let mut nested_types: HashMap<u32, Vec<u32>> = HashMap::new();
        for row in read_rows::<NestedClassRow>(&tables, &ctx)? {
            let known = 1..=type_defs.len() as u32;
            if !known.contains(&row.nested) || !known.contains(&row.enclosing) {
                return Err(malformed_error!(
                    "NestedClass references TypeDef {} / {} out of {}",
                    row.nested,
                    row.enclosing,
                    type_defs.len()
                ));
            }

            enclosing.insert(row.nested, row.enclosing);
            nested_types.entry(row.enclosing).or_default().push(row.nested);
        }
        for nested in nested_types.values_mut() {
            nested.sort_unstable();
        }

        let type_def_names = type_def_names(&type_defs, &enclosing)?;
        let type_ref_names = type_ref_names(&type_refs)?;

        let is_corlib = type_def_names
            .iter()
            .any(|name| name.full_name == "System.Object");

        let cil_module = CilModule {
            path: path.to_path_buf(),
            runtime_version: root.version.clone(),
            module,
            assembly,
            table_count: tables.table_count(),
            type_refs,
            type_ref_names,
            type_defs,
            type_def_names,
            fields: read_rows::<FieldRow>(&tables, &ctx)?,
            methods: read_rows::<MethodDefRow>(&tables, &ctx)?,
            properties: read_rows::<PropertyRow>(&tables, &ctx)?,
            events: read_rows::<EventRow>(&tables, &ctx)?,
            type_specs: read_rows::<TypeSpecRow>(&tables, &ctx)?,
            property_maps: read_rows::<PropertyMapRow>(&tables, &ctx)?
                .into_iter()
                .map(|row| row.0)
                .collect(),
            event_maps: read_rows::<EventMapRow>(&tables, &ctx)?
                .into_iter()
                .map(|row| row.0)
                .collect(),
            field_ptrs: read_rows::<FieldPtrRow>(&tables, &ctx)?
                .into_iter()
                .map(|row| row.0.target)
                .collect(),
            method_ptrs: read_rows::<MethodPtrRow>(&tables, &ctx)?
                .into_iter()
                .map(|row| row.0.target)
                .collect(),
            property_ptrs: read_rows::<PropertyPtrRow>(&tables, &ctx)?
                .into_iter()
                .map(|row| row.0.target)
                .collect(),
            event_ptrs: read_rows::<EventPtrRow>(&tables, &ctx)?
                .into_iter()
                .map(|row| row.0.target)
                .collect(),
            semantics,
            generic_params,
            constraints,
            nested_types,
            is_corlib,
        };

        log::debug!(
            "Loaded module '{}' ({}) - {} streams, {} tables, {} types, {} methods",
            cil_module.module.name,
            path.display(),
            root.stream_headers.len(),
            cil_module.table_count,
            cil_module.type_defs.len(),
            cil_module.methods.len()
        );

        Ok(cil_module)
    }

    /// Path (or label) the module was loaded from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name stored in the `Module` table
    #[must_use]
    pub fn name(&self) -> &str {
        &self.module.name
    }

    /// Module version id
    #[must_use]
    pub fn mvid(&self) -> Option<uguid::Guid> {
        self.module.mvid
    }

    /// Runtime version string of the metadata root, e.g. `v4.0.30319`
    #[must_use]
    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    /// The `Assembly` row, absent for netmodules
    #[must_use]
    pub fn assembly(&self) -> Option<&AssemblyRow> {
        self.assembly.as_ref()
    }

    /// Number of tables present in the tables stream
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.table_count
    }

    /// True if this module defines `System.Object`, i.e. it is the core library
    #[must_use]
    pub fn is_corlib(&self) -> bool {
        self.is_corlib
    }

    /// Raw `TypeDef` rows, in table order
    #[must_use]
    pub fn type_defs(&self) -> &[TypeDefRow] {
        &self.type_defs
    }

    /// All types defined in the module except the `<Module>` pseudo type, in table order
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataResolution`] if a type can not be described.
    pub fn types(&self) -> Result<Vec<CilType>> {
        self.collect_types(false)
    }

    /// All types defined in the module, including the `<Module>` pseudo type
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataResolution`] if a type can not be described.
    pub fn all_types(&self) -> Result<Vec<CilType>> {
        self.collect_types(true)
    }

    fn collect_types(&self, include_module_type: bool) -> Result<Vec<CilType>> {
        self.type_defs
            .iter()
            .filter(|row| include_module_type || !is_module_type(row))
            .map(|row| self.type_def(row.rid))
            .collect()
    }

    /// Describe the `TypeDef` row `rid`
    ///
    /// Type definitions carry their own generic parameters as generic arguments.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for an unknown row and
    /// [`crate::Error::MetadataResolution`] if the type can not be described.
    pub fn type_def(&self, rid: u32) -> Result<CilType> {
        let token = Token::from_parts(TableId::TypeDef, rid);
        let (Some(row), Some(name)) = (
            row_at(&self.type_defs, rid),
            row_at(&self.type_def_names, rid),
        ) else {
            return Err(TypeNotFound(token));
        };

        let build = || -> Result<CilType> {
            let flags = TypeAttributes::from_bits_retain(row.flags);
            let flavor = self.type_def_flavor(row, name, flags)?;
            let generic_args =
                self.generic_parameters(token, name.namespace.as_deref(), false)?;

            Ok(CilType {
                token,
                namespace: name.namespace.clone(),
                name: row.name.clone(),
                full_name: name.full_name.clone(),
                flags,
                flavor,
                generic_args,
                element: None,
            })
        };

        build().map_err(|error| error.into_resolution(&name.full_name))
    }

    fn type_def_flavor(
        &self,
        row: &TypeDefRow,
        name: &TypeName,
        flags: TypeAttributes,
    ) -> Result<CilFlavor> {
        if flags.contains(TypeAttributes::INTERFACE) {
            return Ok(CilFlavor::Interface);
        }

        let base = if row.extends.is_null() {
            None
        } else {
            match row.extends.tag {
                TableId::TypeDef => Some(self.type_def_name(row.extends.row)?),
                TableId::TypeRef => Some(self.type_ref_name(row.extends.row)?),
                // Instantiated generic bases are never System.Enum or System.ValueType
                _ => None,
            }
        };

        let flavor = match base.map(|base| base.full_name.as_str()) {
            Some("System.Enum") => CilFlavor::Enum,
            Some("System.ValueType") if name.full_name == "System.Enum" => CilFlavor::Class,
            Some("System.ValueType") => {
                match CilPrimitiveKind::from_name(&row.name) {
                    Some(kind)
                        if self.is_corlib
                            && name.namespace.as_deref() == Some(SYSTEM_NAMESPACE) =>
                    {
                        CilFlavor::Primitive(kind)
                    }
                    _ => CilFlavor::ValueType,
                }
            }
            _ => CilFlavor::Class,
        };

        Ok(flavor)
    }

    fn type_def_name(&self, rid: u32) -> Result<&TypeName> {
        row_at(&self.type_def_names, rid)
            .ok_or_else(|| TypeNotFound(Token::from_parts(TableId::TypeDef, rid)))
    }

    fn type_ref_name(&self, rid: u32) -> Result<&TypeName> {
        row_at(&self.type_ref_names, rid)
            .ok_or_else(|| TypeNotFound(Token::from_parts(TableId::TypeRef, rid)))
    }

    /// Describe the `TypeRef` row `rid`
    ///
    /// Referenced types are outside of this module, so only their name is known. They are
    /// taken as public, `value_type` tells whether the referencing signature used
    /// `VALUETYPE` or `CLASS`. Well-known `System` types are described as built in.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for an unknown row.
    pub fn type_ref(&self, rid: u32, value_type: bool) -> Result<CilType> {
        let token = Token::from_parts(TableId::TypeRef, rid);
        let (Some(row), Some(name)) = (
            row_at(&self.type_refs, rid),
            row_at(&self.type_ref_names, rid),
        ) else {
            return Err(TypeNotFound(token));
        };

        let nested = row.resolution_scope.tag == TableId::TypeRef && !row.resolution_scope.is_null();
        if !nested && name.namespace.as_deref() == Some(SYSTEM_NAMESPACE) {
            if let Some(mut known) = well_known_by_name(&row.name) {
                known.token = token;
                return Ok(known);
            }
        }

        let mut flags = if nested {
            TypeAttributes::NESTED_PUBLIC
        } else {
            TypeAttributes::PUBLIC
        };
        if value_type {
            flags |= TypeAttributes::SEALED;
        }

        Ok(CilType {
            token,
            namespace: name.namespace.clone(),
            name: row.name.clone(),
            full_name: name.full_name.clone(),
            flags,
            flavor: if value_type {
                CilFlavor::ValueType
            } else {
                CilFlavor::Class
            },
            generic_args: Vec::new(),
            element: None,
        })
    }

    /// Generic parameters owned by the type or method `owner`, ordered by position
    ///
    /// Constraints of each parameter must reference existing types.
    pub(crate) fn generic_parameters(
        &self,
        owner: Token,
        namespace: Option<&str>,
        method: bool,
    ) -> Result<Vec<CilType>> {
        let Some(params) = self.generic_params.get(&owner) else {
            return Ok(Vec::new());
        };

        params
            .iter()
            .map(|param| {
                for constraint in self.constraints.get(&param.rid).into_iter().flatten() {
                    self.check_type_reference(*constraint).map_err(|error| {
                        malformed_error!(
                            "Constraint {} of generic parameter {} can not be resolved - {}",
                            constraint.token,
                            param.name,
                            error
                        )
                    })?;
                }

                Ok(CilType::generic_parameter(
                    namespace,
                    &param.name,
                    u32::from(param.number),
                    method,
                ))
            })
            .collect()
    }

    fn check_type_reference(&self, reference: CodedIndex) -> Result<()> {
        let found = match reference.tag {
            TableId::TypeDef => row_at(&self.type_defs, reference.row).is_some(),
            TableId::TypeRef => row_at(&self.type_refs, reference.row).is_some(),
            TableId::TypeSpec => {
                let spec = self.type_spec(reference.row)?;
                parse_type_spec_signature(&spec.signature)?;
                true
            }
            _ => false,
        };

        if found {
            Ok(())
        } else {
            Err(TypeNotFound(reference.token))
        }
    }

    /// The `TypeSpec` row `rid`
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] for an unknown row.
    pub fn type_spec(&self, rid: u32) -> Result<&TypeSpecRow> {
        row_at(&self.type_specs, rid)
            .ok_or_else(|| TypeNotFound(Token::from_parts(TableId::TypeSpec, rid)))
    }

    pub(crate) fn field(&self, rid: u32) -> Result<&FieldRow> {
        row_at(&self.fields, rid).ok_or(OutOfBounds)
    }

    pub(crate) fn method(&self, rid: u32) -> Result<&MethodDefRow> {
        row_at(&self.methods, rid).ok_or(OutOfBounds)
    }

    pub(crate) fn property(&self, rid: u32) -> Result<&PropertyRow> {
        row_at(&self.properties, rid).ok_or(OutOfBounds)
    }

    pub(crate) fn event(&self, rid: u32) -> Result<&EventRow> {
        row_at(&self.events, rid).ok_or(OutOfBounds)
    }

    pub(crate) fn type_def_row(&self, rid: u32) -> Result<&TypeDefRow> {
        row_at(&self.type_defs, rid)
            .ok_or_else(|| TypeNotFound(Token::from_parts(TableId::TypeDef, rid)))
    }

    /// Accessor rows attached to a property or event
    pub(crate) fn semantics_of(&self, association: Token) -> &[MethodSemanticsRow] {
        self.semantics
            .get(&association)
            .map_or(&[], |rows| rows.as_slice())
    }

    /// Nested `TypeDef` rows declared by the type `rid`, in token order
    pub(crate) fn nested_rids(&self, rid: u32) -> &[u32] {
        self.nested_types
            .get(&rid)
            .map_or(&[], |rows| rows.as_slice())
    }

    /// `Field` rows owned by the type `rid`
    pub(crate) fn field_rids(&self, rid: u32) -> Vec<u32> {
        let Some(index) = rid.checked_sub(1).map(|i| i as usize) else {
            return Vec::new();
        };

        let next = self.type_defs.get(index + 1).map(|row| row.field_list);
        self.type_defs.get(index).map_or_else(Vec::new, |row| {
            indirect(
                list_range(row.field_list, next, self.fields.len(), self.field_ptrs.len()),
                &self.field_ptrs,
            )
        })
    }

    /// `MethodDef` rows owned by the type `rid`
    pub(crate) fn method_rids(&self, rid: u32) -> Vec<u32> {
        let Some(index) = rid.checked_sub(1).map(|i| i as usize) else {
            return Vec::new();
        };

        let next = self.type_defs.get(index + 1).map(|row| row.method_list);
        self.type_defs.get(index).map_or_else(Vec::new, |row| {
            indirect(
                list_range(row.method_list, next, self.methods.len(), self.method_ptrs.len()),
                &self.method_ptrs,
            )
        })
    }

    /// `Property` rows owned by the type `rid`
    pub(crate) fn property_rids(&self, rid: u32) -> Vec<u32> {
        map_rids(
            &self.property_maps,
            rid,
            self.properties.len(),
            &self.property_ptrs,
        )
    }

    /// `Event` rows owned by the type `rid`
    pub(crate) fn event_rids(&self, rid: u32) -> Vec<u32> {
        map_rids(&self.event_maps, rid, self.events.len(), &self.event_ptrs)
    }
}

fn is_module_type(row: &TypeDefRow) -> bool {
    row.rid == 1 && row.name == MODULE_TYPE_NAME
}

fn row_at<T>(rows: &[T], rid: u32) -> Option<&T> {
    rid.checked_sub(1).and_then(|index| rows.get(index as usize))
}

fn stream_data<'a>(data: &'a [u8], header: &StreamHeader) -> Result<&'a [u8]> {
    let start = header.offset as usize;
    let end = start
        .checked_add(header.size as usize)
        .ok_or(OutOfBounds)?;
    data.get(start..end).ok_or(OutOfBounds)
}

/// The rows `start..next` of a member list, clamped to the table size
///
/// Lists are indices into the `*Ptr` table when one is present.
fn list_range(start: u32, next: Option<u32>, rows: usize, ptr_rows: usize) -> Range<u32> {
    let len = if ptr_rows > 0 { ptr_rows } else { rows } as u32;
    let end = next.unwrap_or(len + 1).min(len + 1);
    let start = start.max(1);

    if start >= end {
        return 0..0;
    }

    start..end
}

fn indirect(range: Range<u32>, ptrs: &[u32]) -> Vec<u32> {
    if ptrs.is_empty() {
        return range.collect();
    }

    range
        .filter_map(|index| row_at(ptrs, index).copied())
        .collect()
}

fn map_rids(maps: &[MemberMapRow], parent: u32, rows: usize, ptrs: &[u32]) -> Vec<u32> {
    let Some(position) = maps.iter().position(|map| map.parent == parent) else {
        return Vec::new();
    };

    let next = maps.get(position + 1).map(|map| map.list);
    indirect(
        list_range(maps[position].list, next, rows, ptrs.len()),
        ptrs,
    )
}

fn type_def_names(rows: &[TypeDefRow], enclosing: &HashMap<u32, u32>) -> Result<Vec<TypeName>> {
    rows.iter()
        .map(|row| {
            let mut chain = vec![row];
            let mut current = row.rid;
            while let Some(outer) = enclosing.get(&current) {
                if chain.len() > rows.len() {
                    return Err(malformed_error!("Cyclic nesting of TypeDef {}", row.rid));
                }

                let Some(outer_row) = row_at(rows, *outer) else {
                    return Err(malformed_error!("Enclosing TypeDef {} not found", outer));
                };
                chain.push(outer_row);
                current = *outer;
            }

            Ok(qualified_name(chain.iter().rev().map(|row| (row.namespace.as_str(), row.name.as_str()))))
        })
        .collect()
}

fn type_ref_names(rows: &[TypeRefRow]) -> Result<Vec<TypeName>> {
    rows.iter()
        .map(|row| {
            let mut chain = vec![row];
            let mut scope = row.resolution_scope;
            while scope.tag == TableId::TypeRef && !scope.is_null() {
                if chain.len() > rows.len() {
                    return Err(malformed_error!("Cyclic resolution scope of TypeRef {}", row.rid));
                }

                let Some(outer_row) = row_at(rows, scope.row) else {
                    return Err(malformed_error!("Resolution scope TypeRef {} not found", scope.row));
                };
                chain.push(outer_row);
                scope = outer_row.resolution_scope;
            }

            Ok(qualified_name(chain.iter().rev().map(|row| (row.namespace.as_str(), row.name.as_str()))))
        })
        .collect()
}

/// Join an outermost-first chain of (namespace, name) pairs into `Ns.Outer+Inner`
fn qualified_name<'a>(mut chain: impl Iterator<Item = (&'a str, &'a str)>) -> TypeName {
    let Some((namespace, outer)) = chain.next() else {
        return TypeName {
            namespace: None,
            full_name: String::new(),
        };
    };

    let namespace = (!namespace.is_empty()).then(|| namespace.to_string());
    let mut full_name = match &namespace {
        Some(ns) => format!("{ns}.{outer}"),
        None => outer.to_string(),
    };
    for (_, inner) in chain {
        full_name.push('+');
        full_name.push_str(inner);
    }

    TypeName {
        namespace,
        full_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_ranges() {
        assert_eq!(list_range(1, Some(3), 5, 0), 1..3);
        assert_eq!(list_range(3, None, 5, 0), 3..6);
        // past the end of the table
        assert_eq!(list_range(7, None, 5, 0), 0..0);
        assert_eq!(list_range(2, Some(9), 5, 0), 2..6);
        // ptr table decides the length
        assert_eq!(list_range(1, None, 5, 2), 1..3);

        assert_eq!(indirect(2..4, &[]), vec![2, 3]);
        assert_eq!(indirect(1..3, &[5, 4, 3]), vec![5, 4]);
    }

    #[test]
    fn names() {
        let name = qualified_name([("Acme", "Outer"), ("", "Inner"), ("", "Deep")].into_iter());
        assert_eq!(name.namespace.as_deref(), Some("Acme"));
        assert_eq!(name.full_name, "Acme.Outer+Inner+Deep");

        let name = qualified_name([("", "Program")].into_iter());
        assert_eq!(name.namespace, None);
        assert_eq!(name.full_name, "Program");
    }

    #[test]
    fn invalid_metadata() {
        let result = CilModule::from_metadata("broken.dll", &[0x42, 0x53, 0x4A, 0x42, 0, 0]);
        match result {
            Err(crate::Error::ModuleLoad { path, .. }) => {
                assert_eq!(path, PathBuf::from("broken.dll"));
            }
            _ => panic!("expected a load failure"),
        }
    }

    #[test]
    fn invalid_pe() {
        let result = CilModule::from_mem(b"MZ but nothing else".to_vec());
        assert!(result.is_err_and(|error| error.is_module_load()));
    }
}

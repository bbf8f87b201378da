use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use dotbrowse::{MemberNode, NamespaceNode, TypeNode};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Serializable view of a [`NamespaceNode`].
#[derive(Debug, Serialize)]
pub struct NamespaceEntry {
    pub name: String,
    pub full_name: String,
    pub types: Vec<TypeEntry>,
}

/// Serializable view of a [`TypeNode`].
#[derive(Debug, Serialize)]
pub struct TypeEntry {
    pub name: String,
    pub full_name: String,
    pub access_modifier: String,
    pub members: Vec<MemberEntry>,
}

/// Serializable view of a [`MemberNode`].
#[derive(Debug, Serialize)]
pub struct MemberEntry {
    pub kind: String,
    pub name: String,
    pub full_name: String,
    pub type_name: String,
    pub declaration_info: String,
    pub access_modifier: String,
}

impl From<&NamespaceNode> for NamespaceEntry {
    fn from(node: &NamespaceNode) -> Self {
        NamespaceEntry {
            name: node.name.clone(),
            full_name: node.full_name.clone(),
            types: node.members.iter().map(TypeEntry::from).collect(),
        }
    }
}

impl From<&TypeNode> for TypeEntry {
    fn from(node: &TypeNode) -> Self {
        TypeEntry {
            name: node.name.clone(),
            full_name: node.full_name.clone(),
            access_modifier: node.access_modifier.clone(),
            members: node.members.iter().map(MemberEntry::from).collect(),
        }
    }
}

impl From<&MemberNode> for MemberEntry {
    fn from(node: &MemberNode) -> Self {
        MemberEntry {
            kind: node.kind.to_string(),
            name: node.name.clone(),
            full_name: node.full_name.clone(),
            type_name: node.type_name.clone(),
            declaration_info: node.declaration_info.clone(),
            access_modifier: node.access_modifier.clone(),
        }
    }
}

/// Column alignment for tabular output.
#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Tabular writer backed by `comfy-table`, columns are sized to the widest entry.
pub struct TabWriter {
    table: Table,
    indent: String,
}

impl TabWriter {
    /// Create a new `TabWriter` with `(header, alignment)` column definitions.
    pub fn new(columns: Vec<(&str, Align)>) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);

        let headers: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        table.set_header(headers);

        // Two spaces between columns, none at the outer edges
        let last = columns.len().saturating_sub(1);
        for (i, (_, align)) in columns.iter().enumerate() {
            let cell_align = match align {
                Align::Left => CellAlignment::Left,
                Align::Right => CellAlignment::Right,
            };
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(cell_align);
                let pad_left = if i == 0 { 0 } else { 1 };
                let pad_right = if i == last { 0 } else { 1 };
                col.set_padding((pad_left, pad_right));
            }
        }

        Self {
            table,
            indent: String::new(),
        }
    }

    /// Set the indent prefix for every line.
    pub fn indent(mut self, prefix: &str) -> Self {
        self.indent = prefix.to_string();
        self
    }

    /// Add a row. Values are given in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        let output = self.table.to_string();
        for line in output.lines() {
            println!("{}{}", self.indent, line.trim_end());
        }
    }
}

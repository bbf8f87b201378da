use std::path::Path;

use anyhow::bail;
use serde::Serialize;

use crate::{
    app::{BrowseOptions, GlobalOptions},
    commands::common::{browse_assembly, filter_namespace},
    output::{print_output, Align, NamespaceEntry, TabWriter},
};

#[derive(Debug, Serialize)]
struct TreeOutput {
    namespaces: Vec<NamespaceEntry>,
    type_count: usize,
}

pub fn run(
    path: &Path,
    namespace: Option<&str>,
    browse: &BrowseOptions,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let tree = filter_namespace(browse_assembly(path, browse)?, namespace);
    if let (Some(ns), true) = (namespace, tree.is_empty()) {
        bail!("namespace not found: {ns}");
    }

    let namespaces: Vec<NamespaceEntry> = tree.iter().map(NamespaceEntry::from).collect();
    let type_count = namespaces.iter().map(|ns| ns.types.len()).sum();
    let output = TreeOutput {
        namespaces,
        type_count,
    };

    print_output(&output, opts, |out| {
        for ns in &out.namespaces {
            println!("{}", ns.name);
            for ty in &ns.types {
                println!("  {}{}", ty.access_modifier, ty.full_name);
                if ty.members.is_empty() {
                    continue;
                }

                let mut tw = TabWriter::new(vec![
                    ("Kind", Align::Left),
                    ("Access", Align::Left),
                    ("Declaration", Align::Left),
                ])
                .indent("    ");
                for member in &ty.members {
                    tw.row(vec![
                        member.kind.clone(),
                        member.access_modifier.trim_end().to_string(),
                        member.full_name.clone(),
                    ]);
                }
                tw.print();
            }
            println!();
        }
        println!(
            "{} namespace(s), {} type(s).",
            out.namespaces.len(),
            out.type_count
        );
    })
}

use std::path::Path;

use serde::Serialize;

use crate::{
    app::{BrowseOptions, GlobalOptions},
    commands::common::{browse_assembly, filter_namespace},
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct TypeRow {
    namespace: String,
    access_modifier: String,
    full_name: String,
    member_count: usize,
}

#[derive(Debug, Serialize)]
struct TypesOutput {
    types: Vec<TypeRow>,
    count: usize,
}

pub fn run(
    path: &Path,
    namespace: Option<&str>,
    browse: &BrowseOptions,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let tree = filter_namespace(browse_assembly(path, browse)?, namespace);

    let types: Vec<TypeRow> = tree
        .iter()
        .flat_map(|ns| {
            ns.members.iter().map(|ty| TypeRow {
                namespace: ns.name.clone(),
                access_modifier: ty.access_modifier.trim_end().to_string(),
                full_name: ty.full_name.clone(),
                member_count: ty.members.len(),
            })
        })
        .collect();

    let count = types.len();
    let output = TypesOutput { types, count };

    print_output(&output, opts, |out| {
        let mut tw = TabWriter::new(vec![
            ("Namespace", Align::Left),
            ("Access", Align::Left),
            ("Name", Align::Left),
            ("Members", Align::Right),
        ]);
        for row in &out.types {
            tw.row(vec![
                row.namespace.clone(),
                row.access_modifier.clone(),
                row.full_name.clone(),
                row.member_count.to_string(),
            ]);
        }
        tw.print();
        println!("\n{} type(s) listed.", out.count);
    })
}

use std::path::Path;

use anyhow::Context;
use dotbrowse::{AssemblyBrowser, NamespaceNode};

use crate::app::BrowseOptions;

/// Load the module at `path` and build its namespace tree.
pub fn browse_assembly(path: &Path, options: &BrowseOptions) -> anyhow::Result<Vec<NamespaceNode>> {
    AssemblyBrowser::new(options.config())
        .browse_file(path)
        .with_context(|| format!("failed to browse assembly: {}", path.display()))
}

/// Keep only the namespace called `namespace`, if given.
pub fn filter_namespace(tree: Vec<NamespaceNode>, namespace: Option<&str>) -> Vec<NamespaceNode> {
    match namespace {
        Some(ns) => tree.into_iter().filter(|node| node.name == ns).collect(),
        None => tree,
    }
}

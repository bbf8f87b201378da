//! Groups the types of a module by namespace.

use std::{collections::HashMap, path::Path};

use crate::{
    browser::{nodes::NamespaceNode, typenode::build_type_node, BrowserConfig},
    metadata::cilmodule::CilModule,
    Result,
};

/// Builds namespace trees with a fixed [`BrowserConfig`]
///
/// # Examples
///
/// ```rust,no_run
/// use dotbrowse::{AssemblyBrowser, BrowserConfig};
/// use std::path::Path;
///
/// let browser = AssemblyBrowser::new(BrowserConfig::declared_only());
/// for namespace in browser.browse_file(Path::new("MyLibrary.dll"))? {
///     println!("{} ({} types)", namespace.name, namespace.type_count());
/// }
/// # Ok::<(), dotbrowse::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssemblyBrowser {
    config: BrowserConfig,
}

impl AssemblyBrowser {
    /// A browser using `config`
    #[must_use]
    pub fn new(config: BrowserConfig) -> Self {
        AssemblyBrowser { config }
    }

    /// The configuration of this browser
    #[must_use]
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Load the module at `path` and build its namespace tree
    ///
    /// # Errors
    /// Returns [`crate::Error::ModuleLoad`] if the file is not a valid module and
    /// [`crate::Error::MetadataResolution`] if a type or member can not be described.
    pub fn browse_file(&self, path: &Path) -> Result<Vec<NamespaceNode>> {
        let module = CilModule::from_file(path)?;
        self.browse(&module)
    }

    /// Build the namespace tree of `module`
    ///
    /// Namespaces appear in the order their first type is defined, types in table order. A
    /// failure on any type aborts the whole traversal.
    ///
    /// # Errors
    /// Returns [`crate::Error::MetadataResolution`] if a type or member can not be described.
    pub fn browse(&self, module: &CilModule) -> Result<Vec<NamespaceNode>> {
        let types = if self.config.include_module_type {
            module.all_types()?
        } else {
            module.types()?
        };

        let mut namespaces: Vec<NamespaceNode> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for ty in &types {
            let key = self.config.namespace_key(ty.namespace.as_deref());
            let position = match index.get(key) {
                Some(position) => *position,
                None => {
                    namespaces.push(NamespaceNode::new(key));
                    index.insert(key.to_string(), namespaces.len() - 1);
                    namespaces.len() - 1
                }
            };

            let node = build_type_node(module, ty, &self.config)?;
            namespaces[position].members.push(node);
        }

        log::debug!(
            "Browsed '{}' - {} namespaces, {} types",
            module.name(),
            namespaces.len(),
            types.len()
        );

        Ok(namespaces)
    }
}

/// Build the namespace tree of `module` with the default configuration
///
/// # Errors
/// Returns [`crate::Error::MetadataResolution`] if a type or member can not be described.
pub fn build_namespace_tree(module: &CilModule) -> Result<Vec<NamespaceNode>> {
    AssemblyBrowser::default().browse(module)
}

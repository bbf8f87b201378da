//! Configuration of a namespace tree traversal.
//!
//! [`BrowserConfig`] decides which types are listed, whether base type members are included,
//! and how types without a namespace are grouped. A handful of presets cover the common cases.

/// Namespace key used for types that have no namespace
pub const GLOBAL_NAMESPACE: &str = "<global>";

/// Configuration for [`crate::AssemblyBrowser`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct BrowserConfig {
    /// Namespace key for types declared outside of any namespace (default: `<global>`)
    pub global_namespace: String,

    /// Include the instance members inherited from base types defined in the same module
    pub include_inherited_members: bool,

    /// List the `<Module>` pseudo type that holds global fields and methods
    pub include_module_type: bool,

    /// Maximum number of base types followed for one type (default: 64)
    /// Longer chains, and cyclic ones, fail with a resolution error
    pub max_inheritance_depth: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            global_namespace: GLOBAL_NAMESPACE.to_string(),
            include_inherited_members: true,
            include_module_type: false,
            max_inheritance_depth: 64,
        }
    }
}

impl BrowserConfig {
    /// Only the members a type declares itself
    ///
    /// No base type is looked at, which also means broken base types go unnoticed.
    #[must_use]
    pub fn declared_only() -> Self {
        Self {
            include_inherited_members: false,
            ..Self::default()
        }
    }

    /// Everything, including the `<Module>` pseudo type
    #[must_use]
    pub fn complete() -> Self {
        Self {
            include_module_type: true,
            ..Self::default()
        }
    }

    /// The namespace key for `namespace`
    #[must_use]
    pub fn namespace_key<'a>(&'a self, namespace: Option<&'a str>) -> &'a str {
        match namespace {
            Some(namespace) if !namespace.is_empty() => namespace,
            _ => &self.global_namespace,
        }
    }
}

//! # dotbrowse Prelude
//!
//! The types needed to load a module and walk its namespace tree, in one glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotbrowse operations
pub use crate::Error;

/// The result type used throughout dotbrowse
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// A loaded .NET module
pub use crate::CilModule;

/// Builds the namespace tree with default settings
pub use crate::browser::build_namespace_tree;

/// Builds the namespace tree with a custom [`BrowserConfig`]
pub use crate::browser::{AssemblyBrowser, BrowserConfig};

// ================================================================================================
// Tree Nodes
// ================================================================================================

/// Nodes of the namespace tree
pub use crate::browser::{MemberKind, MemberNode, NamespaceNode, TypeNode};

/// Uniform access to the nodes
pub use crate::browser::{Container, TypeMember};

// ================================================================================================
// Metadata
// ================================================================================================

/// Resolved types and members
pub use crate::metadata::{
    members::Member,
    token::Token,
    typesystem::{CilFlavor, CilType},
};

/// Writes small modules, mostly useful for tests
pub use crate::metadata::builder::MetadataBuilder;

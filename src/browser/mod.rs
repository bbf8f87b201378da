//! The namespace browser.
//!
//! Turns a loaded [`crate::CilModule`] into a tree of namespaces, types and members with
//! rendered declarations. The work is split into four layers, each calling the next:
//!
//! - [`namespace`] - [`AssemblyBrowser`] enumerates the types and groups them by namespace
//! - [`typenode`] - describes one type and collects its members
//! - [`classify`] - normalizes one member into a [`MemberNode`]
//! - [`format`] - renders names, modifiers and declarations
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotbrowse::{build_namespace_tree, CilModule};
//! use std::path::Path;
//!
//! let module = CilModule::from_file(Path::new("MyLibrary.dll"))?;
//! for namespace in build_namespace_tree(&module)? {
//!     for ty in &namespace.members {
//!         println!("{}{}", ty.access_modifier, ty.full_name);
//!         for member in &ty.members {
//!             println!("    {}", member.full_name);
//!         }
//!     }
//! }
//! # Ok::<(), dotbrowse::Error>(())
//! ```

pub mod classify;
mod config;
pub mod format;
pub mod namespace;
pub mod nodes;
pub mod typenode;

pub use classify::classify_member;
pub use config::{BrowserConfig, GLOBAL_NAMESPACE};
pub use namespace::{build_namespace_tree, AssemblyBrowser};
pub use nodes::{Container, MemberKind, MemberNode, NamespaceNode, TypeMember, TypeNode};
pub use typenode::build_type_node;

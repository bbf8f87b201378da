// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0


#![doc(html_no_source)]
#![deny(missing_docs)]

//! # dotbrowse
//!
//! Namespace and declaration browser for .NET assemblies.
//!
//! `dotbrowse` reads the ECMA-335 metadata of a .NET module (no runtime, no Windows needed)
//! and turns it into a three level tree: namespaces contain types, types contain members. Every
//! node carries display strings in the style of a C# declaration, so the tree can be rendered
//! by a UI or a command line tool without further lookups.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotbrowse::prelude::*;
//! use std::path::Path;
//!
//! let module = CilModule::from_file(Path::new("MyLibrary.dll"))?;
//! for namespace in build_namespace_tree(&module)? {
//!     println!("{} ({} types)", namespace.name, namespace.type_count());
//!     for ty in &namespace.members {
//!         println!("  {}{}", ty.access_modifier, ty.name);
//!         for member in &ty.members {
//!             println!("    [{}] {}", member.kind, member.full_name);
//!         }
//!     }
//! }
//! # Ok::<(), dotbrowse::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`file`] - PE image access, memory mapped or from a buffer
//! - [`metadata`] - metadata root, streams, tables, signatures and the type system, plus
//!   [`metadata::builder`] which writes small modules from scratch
//! - [`browser`] - the namespace aggregator, type descriptor builder, member classifier
//!   and declaration formatter
//!
//! ## Error Handling
//!
//! Loading failures surface as [`Error::ModuleLoad`], failures while describing a type or
//! member as [`Error::MetadataResolution`]. The traversal is all or nothing: a single
//! unresolvable member aborts [`build_namespace_tree`].

#[macro_use]
pub(crate) mod error;

/// Shared fixtures for unit tests
#[cfg(test)]
pub(crate) mod test;

/// PE file access
pub mod file;

/// Convenient re-exports of the most commonly used types.
///
/// ```rust,no_run
/// use dotbrowse::prelude::*;
///
/// let browser = AssemblyBrowser::new(BrowserConfig::declared_only());
/// let tree = browser.browse_file(std::path::Path::new("MyLibrary.dll"))?;
/// # Ok::<(), dotbrowse::Error>(())
/// ```
pub mod prelude;

/// Reading (and writing) ECMA-335 metadata
///
/// # Key Components
///
/// - [`CilModule`] - a loaded module with its decoded tables
/// - [`metadata::typesystem`] - [`metadata::typesystem::CilType`] and signature resolution
/// - [`metadata::members`] - member enumeration in reflection order
/// - [`metadata::signatures`] - signature blob decoding and encoding
/// - [`metadata::tables`] - the `#~` stream and its rows
pub mod metadata;

/// The namespace tree and its display strings
pub mod browser;

/// `dotbrowse` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotbrowse` Error type
///
/// ```rust,no_run
/// use dotbrowse::{CilModule, Error};
///
/// match CilModule::from_file(std::path::Path::new("Broken.dll")) {
///     Ok(module) => println!("Loaded {}", module.name()),
///     Err(Error::ModuleLoad { path, source }) => println!("{}: {}", path.display(), source),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// A loaded .NET module, see [`metadata::cilmodule::CilModule`]
pub use metadata::cilmodule::CilModule;

/// Low-level file access and parsing
pub use file::{parser::Parser, File};

pub use browser::{
    build_namespace_tree, AssemblyBrowser, BrowserConfig, MemberKind, MemberNode, NamespaceNode,
    TypeNode, GLOBAL_NAMESPACE,
};

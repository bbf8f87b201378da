//! Metadata parsing and representation for .NET modules.
//!
//! This module contains everything between the raw bytes of a module and the resolved view the
//! browser renders: the CLI header, the metadata root and its streams, the tables, signatures,
//! the type model and the member enumeration.
//!
//! # Key Components
//!
//! - [`cilmodule::CilModule`] - a loaded module, the entry point for type and member queries
//! - [`members`] - the reflection style member surface of a type
//! - [`typesystem`] - resolved type descriptions ([`typesystem::CilType`])
//! - [`signatures`] - method, field, property and type spec signature decoding
//! - [`tables`] and [`streams`] - the `#~` tables and the heaps
//! - [`token`] - metadata table row references
//! - [`builder`] - construction of synthetic metadata, for tests and benchmarks
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotbrowse::CilModule;
//!
//! let module = CilModule::from_file("tests/samples/Library.dll".as_ref())?;
//! println!("Module: {} ({})", module.name(), module.runtime_version());
//! println!("Types: {}", module.types()?.len());
//! # Ok::<(), dotbrowse::Error>(())
//! ```

/// Construction of metadata roots and PE images from declarative rows
pub mod builder;
/// A loaded module and its type queries
pub mod cilmodule;
/// Implementation of the Header of CIL
pub mod cor20header;
/// Member enumeration of type definitions
pub mod members;
/// Implementation of the metadata root and stream directory
pub mod root;
/// Implementation of method, field and type signatures
pub mod signatures;
/// Implementation of the heaps
pub mod streams;
/// Implementation of the metadata tables
pub mod tables;
/// Commonly used metadata token type
pub mod token;
/// Resolved types and their flags
pub mod typesystem;

use std::path::PathBuf;

use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! resolution_error {
    ($context:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        crate::Error::MetadataResolution {
            context: $context.to_string(),
            reason: format!($fmt $(, $arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Two variants form the taxonomy callers are expected to match on:
///
/// - [`Error::ModuleLoad`] - the input could not be loaded as a .NET module at all. Every
///   structural failure found while loading (bad PE, bad metadata root, truncated tables, ...)
///   is wrapped in this variant, the underlying cause is kept as `source`.
/// - [`Error::MetadataResolution`] - the module loaded, but a type or member inside it could not
///   be fully described while building the namespace tree. The whole traversal is aborted.
///
/// The remaining variants are the low-level causes produced by the parsers.
///
/// # Examples
///
/// ```rust,no_run
/// use dotbrowse::{build_namespace_tree, CilModule, Error};
/// use std::path::Path;
///
/// match CilModule::from_file(Path::new("assembly.dll")) {
///     Ok(module) => match build_namespace_tree(&module) {
///         Ok(tree) => println!("{} namespaces", tree.len()),
///         Err(Error::MetadataResolution { context, reason }) => {
///             eprintln!("Could not describe {}: {}", context, reason);
///         }
///         Err(e) => eprintln!("Other error: {}", e),
///     },
///     Err(Error::ModuleLoad { path, source }) => {
///         eprintln!("Failed to load {}: {}", path.display(), source);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    // File parsing Errors
    /// The file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This file type is not supported.
    ///
    /// Indicates that the input file is not a .NET PE executable, e.g. a native image
    /// without a CLR runtime header.
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// A token points at a row that does not exist.
    ///
    /// The associated [`Token`] identifies the reference which could not be followed.
    #[error("Failed to find type - {0}")]
    TypeNotFound(Token),

    /// Recursion limit reached.
    ///
    /// Signature decoding and base type walks are bounded, this error indicates that the
    /// limit was exceeded. The associated value shows the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    // Taxonomy
    /// The module at `path` could not be loaded.
    ///
    /// Surfaced before any traversal starts, no partial result exists.
    #[error("Failed to load module '{}' - {source}", path.display())]
    ModuleLoad {
        /// The path (or in-memory label) of the module
        path: PathBuf,
        /// The structural failure that stopped loading
        source: Box<Error>,
    },

    /// A type or member of an otherwise valid module could not be fully described.
    #[error("Failed to resolve metadata of '{context}' - {reason}")]
    MetadataResolution {
        /// The type or member that was being described
        context: String,
        /// What could not be resolved
        reason: String,
    },
}

impl Error {
    /// Wrap a structural failure into [`Error::ModuleLoad`], leaving existing load errors as is.
    pub(crate) fn into_module_load(self, path: impl Into<PathBuf>) -> Error {
        match self {
            Error::ModuleLoad { .. } => self,
            other => Error::ModuleLoad {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Turn any failure into [`Error::MetadataResolution`] for the given `context`.
    pub(crate) fn into_resolution(self, context: &str) -> Error {
        match self {
            Error::MetadataResolution { .. } => self,
            other => Error::MetadataResolution {
                context: context.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// True for [`Error::ModuleLoad`]
    #[must_use]
    pub fn is_module_load(&self) -> bool {
        matches!(self, Error::ModuleLoad { .. })
    }

    /// True for [`Error::MetadataResolution`]
    #[must_use]
    pub fn is_metadata_resolution(&self) -> bool {
        matches!(self, Error::MetadataResolution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_load_wraps_once() {
        let err = Error::OutOfBounds
            .into_module_load("a.dll")
            .into_module_load("b.dll");

        match err {
            Error::ModuleLoad { path, source } => {
                assert_eq!(path, PathBuf::from("a.dll"));
                assert!(matches!(*source, Error::OutOfBounds));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn resolution_keeps_innermost_context() {
        let err = resolution_error!("N.C::M", "bad generic index {}", 3).into_resolution("N.C");
        match err {
            Error::MetadataResolution { context, reason } => {
                assert_eq!(context, "N.C::M");
                assert_eq!(reason, "bad generic index 3");
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = Error::TypeNotFound(Token::new(0x0100_0009)).into_resolution("N.C");
        assert!(err.is_metadata_resolution());
        assert!(err.to_string().contains("0x01000009"));
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dotbrowse::BrowserConfig;

/// dotbrowse - browse the namespaces, types and members of .NET assemblies
#[derive(Debug, Parser)]
#[command(name = "dotbrowse", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// How the namespace tree is built.
#[derive(Debug, Args)]
pub struct BrowseOptions {
    /// Only list members declared by each type, skip inherited ones.
    #[arg(long)]
    pub declared_only: bool,

    /// Include the `<Module>` pseudo type.
    #[arg(long)]
    pub module_type: bool,

    /// Name of the namespace that collects types without one.
    #[arg(long, value_name = "NAME")]
    pub global_namespace: Option<String>,
}

impl BrowseOptions {
    pub fn config(&self) -> BrowserConfig {
        let mut config = if self.declared_only {
            BrowserConfig::declared_only()
        } else {
            BrowserConfig::default()
        };
        config.include_module_type = self.module_type;
        if let Some(name) = &self.global_namespace {
            config.global_namespace.clone_from(name);
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print namespaces, their types and every member declaration.
    Tree {
        /// Path to the .NET assembly file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show only this namespace.
        #[arg(short, long)]
        namespace: Option<String>,

        #[command(flatten)]
        browse: BrowseOptions,
    },

    /// List types with namespace and access modifiers.
    Types {
        /// Path to the .NET assembly file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show only this namespace.
        #[arg(short, long)]
        namespace: Option<String>,

        #[command(flatten)]
        browse: BrowseOptions,
    },
}

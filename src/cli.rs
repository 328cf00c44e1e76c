//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::plan::PlanFormat;

/// Top-level CLI parser for `modplan`.
#[derive(Debug, Parser)]
#[command(name = "modplan", version, about = "Resolve module descriptors into build plans")]
pub struct Cli {
    /// Directory containing `*.module.yaml` / `*.module.json` descriptors.
    #[arg(long, global = true, value_name = "DIR")]
    pub descriptors: Option<PathBuf>,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve root modules into an ordered build plan.
    Plan {
        /// Root modules to build.
        #[arg(required = true, value_name = "ROOT")]
        roots: Vec<String>,
        /// Output format (defaults to `MODPLAN_FORMAT`, then text).
        #[arg(long, value_enum)]
        format: Option<PlanFormat>,
        /// Write the plan to a file instead of stdout.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Verify that roots (or every module) resolve without errors.
    Check {
        /// Root modules to check; all registered modules when omitted.
        #[arg(value_name = "ROOT")]
        roots: Vec<String>,
    },
    /// List registered modules.
    List,
    /// Show one module descriptor.
    Show {
        /// Module name.
        name: String,
    },
    /// Print the dependency edges reachable from a root.
    Deps {
        /// Root module.
        root: String,
    },
}

//! Command-line interface built on clap.
//!
//! Defines [`Cli`] with its [`Command`] subcommands and the global flags
//! (--config, --no-seed, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use billflow::workflow::{Role, Stage};

/// billflow: maker-checker-approver workflow for bill payments.
#[derive(Debug, Parser)]
#[command(name = "billflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file (default: ./billflow.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Start with an empty registry instead of the sample bills.
    #[arg(long, global = true, default_value_t = false)]
    pub no_seed: bool,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Role accepted on the command line, mapped onto [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Maker,
    Checker,
    Approver,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Maker => Role::Maker,
            RoleArg::Checker => Role::Checker,
            RoleArg::Approver => Role::Approver,
        }
    }
}

/// Stage accepted on the command line, mapped onto [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    Maker,
    Checker,
    Approver,
    Completed,
    Rejected,
}

impl From<StageArg> for Stage {
    fn from(arg: StageArg) -> Self {
        match arg {
            StageArg::Maker => Stage::Maker,
            StageArg::Checker => Stage::Checker,
            StageArg::Approver => Stage::Approver,
            StageArg::Completed => Stage::Completed,
            StageArg::Rejected => Stage::Rejected,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walks one bill from creation to payment and prints its audit trail.
    Demo,

    /// Applies a batch file of create/transition operations.
    Run {
        /// TOML or JSON file with an `ops` list.
        file: PathBuf,

        /// Write the resulting bills as CSV to this path.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Shows the work queue for a role.
    Queue {
        #[arg(long, value_enum)]
        role: RoleArg,

        #[arg(long)]
        branch: Option<String>,
    },

    /// Lists bills, optionally filtered.
    Bills {
        #[arg(long, value_enum)]
        stage: Option<StageArg>,

        #[arg(long)]
        branch: Option<String>,
    },

    /// Shows the amount per branch across all stages.
    Totals,

    /// Shows the audit trail.
    Audit {
        /// Only entries for this bill (e.g. TXN1001).
        #[arg(long)]
        bill: Option<String>,
    },

    /// Writes bills as CSV.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, value_enum)]
        stage: Option<StageArg>,

        #[arg(long)]
        branch: Option<String>,
    },

    /// Lists the biller catalog.
    Billers,
}

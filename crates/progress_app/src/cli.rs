//! Command-line interface for `progress-watch`.
//!
//! ```bash
//! # Dashboard with the default config file
//! progress-watch
//!
//! # Paginated list against another config
//! progress-watch --config staging.ron list
//!
//! # One record
//! PROGRESS_TOKEN=... progress-watch detail sales-data.csv
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// Live view of file-processing progress reported by the progress service.
#[derive(Parser, Debug, Clone)]
#[command(name = "progress-watch", version, about)]
pub struct Cli {
    /// RON config file; a missing file means built-in defaults
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Bearer token; takes precedence over the config file
    #[arg(long, env = "PROGRESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// View to open (defaults to the dashboard)
    #[command(subcommand)]
    pub view: Option<ViewArg>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ViewArg {
    /// Totals and the most recent records
    Dashboard,
    /// Searchable, filterable, paginated table of all records
    List,
    /// One record with its error and warning tables
    Detail {
        /// Filename of the record
        filename: String,
    },
}

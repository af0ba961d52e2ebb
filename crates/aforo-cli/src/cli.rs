//! CLI definition using clap

use std::path::PathBuf;

use aforo_types::{OutputFormat, SourceEncoding};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aforo")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Reshape and summarize toll-booth vehicle counts")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Source CSV encoding (utf8, latin1). Uses config value if not specified.
    #[arg(long, short = 'e', global = true)]
    pub encoding: Option<SourceEncoding>,

    /// Field catalogue TOML. Uses config value or the built-in catalogue if not specified.
    #[arg(long, global = true)]
    pub catalogue: Option<PathBuf>,

    /// Output format (table, json, csv). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reshape a wide CSV into tidy rows (entity_id, period, category, count)
    Reshape {
        /// Wide CSV export. Uses config data_path if not specified.
        input: Option<PathBuf>,

        /// Output CSV file (stdout if not specified)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Only keep observations of this year
        #[arg(long, short = 'y')]
        year: Option<i32>,
    },

    /// Show which column was picked for each field
    Columns {
        /// Wide CSV export. Uses config data_path if not specified.
        input: Option<PathBuf>,
    },

    /// Totals by vehicle type, with the busiest and quietest type
    Summary {
        /// Wide CSV export. Uses config data_path if not specified.
        input: Option<PathBuf>,

        /// Restrict to one year
        #[arg(long, short = 'y')]
        year: Option<i32>,
    },

    /// Forecast total monthly traffic
    Forecast {
        /// Wide CSV export. Uses config data_path if not specified.
        input: Option<PathBuf>,

        /// Restrict the history to one year
        #[arg(long, short = 'y')]
        year: Option<i32>,

        /// Months to forecast. Uses config value if not specified.
        #[arg(long, short = 'n')]
        horizon: Option<usize>,
    },

    /// Export summary and tidy rows to Excel
    Export {
        /// Wide CSV export. Uses config data_path if not specified.
        input: Option<PathBuf>,

        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Restrict to one year
        #[arg(long, short = 'y')]
        year: Option<i32>,
    },

    /// Print the field catalogue as TOML (a starting point for --catalogue)
    Catalogue {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default data file
        #[arg(long)]
        set_data: Option<PathBuf>,

        /// Set source encoding
        #[arg(long)]
        set_encoding: Option<SourceEncoding>,

        /// Set field catalogue file
        #[arg(long)]
        set_catalogue: Option<PathBuf>,

        /// Set forecast horizon in months
        #[arg(long)]
        set_horizon: Option<usize>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set dashboard listen address
        #[arg(long)]
        set_bind: Option<String>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

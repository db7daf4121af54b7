use clap::{Parser, Subcommand, ValueEnum};

use iex_data::client::DEFAULT_NEWS_COUNT;
use iex_data::config::IEX_BASE_URL;
use iex_data::fetch::ChartRange;

#[derive(Parser)]
#[command(name = "iex-data")]
#[command(about = "Fetch reference symbols, quotes, trades and company data from the IEX API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API root every endpoint path is joined onto
    #[arg(long, global = true, default_value = IEX_BASE_URL)]
    pub base_url: String,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the table to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep only the symbols present in the IEX reference list
    Valid {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Latest quote and trade snapshot (tops)
    Quotes {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Latest trade only (tops/last)
    Trades {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Latest news items per symbol
    News {
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(short, long, default_value_t = DEFAULT_NEWS_COUNT)]
        count: usize,
    },

    /// Financial statements per symbol
    Financials {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Earnings per symbol
    Earnings {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Bucketed price bars per symbol
    Chart {
        #[arg(required = true)]
        symbols: Vec<String>,

        /// One of 1m, 3m, 6m, 1y, ytd, 2y, 5y
        #[arg(short, long, default_value = "1m")]
        range: ChartRange,
    },

    /// Fetch any endpoint path and print it as an untyped table
    Raw {
        /// Path relative to the base URL, e.g. `ref-data/symbols`
        path: String,

        /// Read the array stored under this key
        #[arg(long)]
        nest: Option<String>,
    },
}

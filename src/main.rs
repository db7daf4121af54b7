mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

use iex_data::client::{IexClient, Screened, INVALID_SYMBOLS_NOTICE};
use iex_data::config::ClientConfig;
use iex_data::output::Grid;
use iex_data::records::TableRecord;
use iex_data::table::SymbolTable;

use cli::{Cli, Commands, OutputFormat};

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    let config = ClientConfig::with_base_url(&cli.base_url)?;
    let client = IexClient::with_config(config).context("Failed to build IEX client")?;

    let grid = match cli.command {
        Commands::Valid { ref symbols } => {
            let valid = client.valid_securities(symbols)?;
            Some(Grid::from_symbols(&valid))
        }
        Commands::Quotes { ref symbols } => screened_grid(client.latest_quote_and_trade(symbols)?),
        Commands::Trades { ref symbols } => screened_grid(client.latest_trade(symbols)?),
        Commands::News {
            ref symbols,
            count,
        } => screened_grid(client.latest_news(symbols, count)?),
        Commands::Financials { ref symbols } => screened_grid(client.financials(symbols)?),
        Commands::Earnings { ref symbols } => screened_grid(client.earnings(symbols)?),
        Commands::Chart { ref symbols, range } => {
            screened_grid(client.trade_bars(symbols, range)?)
        }
        Commands::Raw { ref path, ref nest } => {
            let url = client.config().endpoint(path);
            let table = match nest {
                Some(key) => client.fetch_nested_table(&url, key)?,
                None => client.fetch_table(&url)?,
            };
            Some(Grid::from_raw_table(&table))
        }
    };

    if let Some(grid) = grid {
        emit(&cli, &grid)?;
    }

    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}

fn screened_grid<T: TableRecord>(result: Screened<SymbolTable<T>>) -> Option<Grid> {
    match result.map(|table| Grid::from_symbol_table(&table)) {
        Screened::Empty { rejected } => {
            eprintln!("{} ({})", INVALID_SYMBOLS_NOTICE, rejected.join(", "));
            None
        }
        Screened::Partial { table, rejected } => {
            eprintln!("Skipped unknown symbol(s): {}", rejected.join(", "));
            Some(table)
        }
        Screened::Complete(table) => Some(table),
    }
}

fn emit(cli: &Cli, grid: &Grid) -> Result<()> {
    match (&cli.output, cli.format) {
        (Some(path), OutputFormat::Csv) => {
            grid.save_csv(path)?;
            println!("Data saved to {}", path);
        }
        (Some(path), OutputFormat::Text) => {
            std::fs::write(path, grid.render_text())
                .with_context(|| format!("Failed to write {}", path))?;
            println!("Data saved to {}", path);
        }
        (None, OutputFormat::Csv) => grid.write_csv(io::stdout().lock())?,
        (None, OutputFormat::Text) => {
            let mut out = io::stdout().lock();
            out.write_all(grid.render_text().as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}

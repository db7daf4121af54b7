//! Blocking client for the IEX market-data API.
//!
//! ```no_run
//! use iex_data::IexClient;
//!
//! let client = IexClient::new()?;
//! if let Some(quotes) = client.latest_quote_and_trade(&["AAPL", "IBM"])?.table() {
//!     for (symbol, quote) in quotes.iter() {
//!         println!("{symbol}: {:?}", quote.last_sale_price);
//!     }
//! }
//! # Ok::<(), iex_data::AppError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;
pub mod records;
pub mod table;
pub mod utils;

pub use client::{IexClient, Screened, Screening};
pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use fetch::{ChartRange, HttpTransport, Transport};
pub use table::{RawTable, SymbolTable};

//! beanbudget - envelope budgeting on top of a plain-text ledger
//!
//! The ledger file is the single source of truth. beanbudget reads it to
//! report what is assigned, spent and left per envelope, and appends new
//! entries through a guided dialogue that only commits text the ledger
//! accepts.
//!
//! # Architecture
//!
//! - `config`: Data directory and user settings
//! - `error`: Custom error types
//! - `models`: Amounts, account paths, postings and entries
//! - `ledger`: Ledger parsing and the budget posting plugin
//! - `storage`: Ledger stores and atomic file writes
//! - `reports`: Budget and position reports
//! - `intake`: The intake state machine and sessions
//! - `services`: Business logic layer
//! - `audit`: Log of finished intake sessions
//! - `display`: Text rendering of reports and prompts
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use beanbudget::config::{BeanbudgetPaths, Settings};
//!
//! let paths = BeanbudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

use std::sync::Once;

pub mod audit;
pub mod cli;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod intake;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber once; output goes to stderr
///
/// `RUST_LOG` overrides the default `beanbudget=info` filter.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("beanbudget=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

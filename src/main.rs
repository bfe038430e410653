use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use beanbudget::cli::{
    handle_accounts_command, handle_add_command, handle_budget_command, handle_history_command,
    CliContext,
};
use beanbudget::config::{BeanbudgetPaths, Settings};
use beanbudget::models::UserId;
use beanbudget::storage::initialize_storage;

#[derive(Parser)]
#[command(
    name = "beanbudget",
    version,
    about = "Zero-based budget reports and guided entry intake for a beancount ledger",
    long_about = "beanbudget keeps a zero-based budget inside a plain-text ledger. \
                  It reports what is assigned, spent and left per envelope, and \
                  adds new entries through a short guided dialogue."
)]
struct Cli {
    /// Act as this user id
    #[arg(long, global = true, env = "BEANBUDGET_USER")]
    user: Option<UserId>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the budget report: [MONTHS] [full]
    Budget {
        /// Months ahead to include, then `full` to show every envelope
        /// (any other second word is rejected)
        #[arg(num_args = 0..=2, allow_negative_numbers = true)]
        args: Vec<String>,
        /// Also write the report to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show the balance of every asset and liability account
    #[command(alias = "positions")]
    Accounts,

    /// Add a ledger entry through a guided dialogue
    Add,

    /// Show recently finished intake sessions
    History {
        /// Number of sessions to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Create the settings file and a starter ledger
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> ExitCode {
    beanbudget::init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // ledger and validation messages already lead with "Error"
            let message = format!("{:#}", e);
            if message.starts_with("Error") {
                eprintln!("{}", message);
            } else {
                eprintln!("Error: {}", message);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = BeanbudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let ctx = CliContext::new(paths.clone(), settings, cli.user);

    match cli.command {
        Some(Commands::Budget { args, csv }) => {
            handle_budget_command(&ctx, &args, csv)?;
        }
        Some(Commands::Accounts) => {
            handle_accounts_command(&ctx)?;
        }
        Some(Commands::Add) => {
            handle_add_command(&ctx)?;
        }
        Some(Commands::History { count }) => {
            handle_history_command(&ctx, count)?;
        }
        Some(Commands::Init) => {
            println!("Initializing beanbudget at: {}", paths.base_dir().display());
            let settings = initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Settings: {}", paths.settings_file().display());
            println!("Ledger:   {}", settings.ledger_path(&paths).display());
            println!();
            println!("Run 'beanbudget add' to record your first entry.");
        }
        Some(Commands::Config) => {
            println!("beanbudget Configuration");
            println!("========================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Ledger file:    {}", ctx.settings.ledger_path(&paths).display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("{}", serde_json::to_string_pretty(&ctx.settings)?);
        }
        None => {
            println!("beanbudget - zero-based budgeting on a beancount ledger");
            println!();
            println!("Run 'beanbudget --help' for usage information.");
            if !paths.is_initialized() {
                println!("Run 'beanbudget init' to create a starter ledger.");
            }
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::{Parser, Subcommand};

use coinlog::cli::{
    handle_export_command, handle_history_command, handle_import_command,
    handle_transaction_command, ExportArgs, ImportArgs, TransactionCommands,
};
use coinlog::config::{paths::CoinlogPaths, settings::Settings};
use coinlog::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "coinlog",
    version,
    about = "Crypto transaction ledger with a CSV import wizard",
    long_about = "coinlog keeps a ledger of crypto buys, sells, deposits and \
                  withdrawals across exchanges. Import any exchange's CSV export \
                  by choosing its header row and mapping its columns, then \
                  filter, search and export the result."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,

    #[command(flatten)]
    Transaction(TransactionCommands),

    /// Import transactions from a CSV file (or restore a JSON export)
    Import(ImportArgs),

    /// Export the filtered ledger to CSV or JSON
    Export(ExportArgs),

    /// Show recent audit log entries
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Create the data directory and settings
    Init {
        /// Also add the demo transactions
        #[arg(long)]
        sample: bool,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = CoinlogPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;

    match cli.command {
        Some(Commands::Tui) => {
            paths.ensure_directories()?;
            coinlog::tui::run_tui(&storage, &settings)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Import(args)) => {
            handle_import_command(&storage, &settings, args)?;
        }
        Some(Commands::Export(args)) => {
            handle_export_command(&storage, &settings, args)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        Some(Commands::Init { sample }) => {
            println!("Initializing coinlog at: {}", paths.data_dir().display());
            let report = initialize_storage(&storage, sample)?;
            if report.created_settings {
                println!("Created settings: {}", paths.settings_file().display());
            }
            if report.seeded > 0 {
                println!("Added {} sample transactions.", report.seeded);
            } else if sample {
                println!("Sample data was already added.");
            }
            println!("Initialization complete!");
            println!();
            println!("Run 'coinlog list' to see your transactions.");
        }
        Some(Commands::Config) => {
            println!("coinlog Configuration");
            println!("=====================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Data directory:    {}", paths.data_dir().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!("Audit log:         {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  Import date format: {}",
                settings.import_date_format.as_deref().unwrap_or("(auto)")
            );
            match settings.default_year {
                Some(year) => println!("  Default year:       {}", year),
                None => println!("  Default year:       (all years)"),
            }
            println!("  List limit:         {}", settings.list_limit);
        }
        None => {
            println!("coinlog - crypto transaction ledger");
            println!();
            println!("Run 'coinlog --help' for usage information.");
            println!("Run 'coinlog tui' to launch the interactive interface.");
        }
    }

    Ok(())
}

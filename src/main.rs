use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookkeeper::cli::{
    handle_budget_command, handle_category_command, handle_expense_command, handle_history_command,
};
use bookkeeper::config::{paths::BookkeeperPaths, settings::Settings};
use bookkeeper::storage::{seed_defaults, BackendKind, Storage};

#[derive(Parser)]
#[command(
    name = "bookkeeper",
    version,
    about = "Personal expense tracker with category trees and spending budgets",
    long_about = "Bookkeeper records expenses against a tree of categories and keeps \
                  daily, weekly and monthly budgets up to date with what you spend."
)]
struct Cli {
    /// Use this SQLite database instead of the one in the data directory
    #[arg(long, global = true, env = "BOOKKEEPER_DB")]
    db: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true, conflicts_with = "db")]
    memory: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default categories and budgets
    Init,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand)]
    Category(bookkeeper::cli::CategoryCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(bookkeeper::cli::ExpenseCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(bookkeeper::cli::BudgetCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let mut paths = BookkeeperPaths::new()?;
    if let Some(db) = cli.db {
        paths = paths.with_database_file(db);
    }
    let mut settings = Settings::load_or_create(&paths)?;
    if cli.memory {
        settings.backend = BackendKind::Memory;
    }

    init_tracing(&settings);

    // Initialize storage
    let storage = Storage::open(&paths, &settings)?;
    if storage.backend() == BackendKind::Memory {
        seed_defaults(&storage, &settings)?;
    }

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Bookkeeper at: {}", paths.base_dir().display());
            let created = seed_defaults(&storage, &settings)?;
            settings.save(&paths)?;
            println!("Initialization complete! Created {} records.", created);
            println!();
            println!("Run 'bookkeeper category list' to see all categories.");
            println!("Run 'bookkeeper budget list' to see your budgets.");
        }
        Some(Commands::Config) => {
            println!("Bookkeeper Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Database file:    {}", paths.database_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Backend:        {}", settings.backend);
            println!("  Log level:      {}", settings.log_level);
            println!("  Audit enabled:  {}", settings.audit_enabled);
            println!(
                "  Default limits: day {}, week {}, month {}",
                settings.default_budgets.day,
                settings.default_budgets.week,
                settings.default_budgets.month
            );
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, cmd)?;
        }
        Some(Commands::History { limit }) => {
            handle_history_command(&storage, limit)?;
        }
        None => {
            println!("Bookkeeper - expense tracking with budgets");
            println!();
            println!("Run 'bookkeeper --help' for usage information.");
            println!("Run 'bookkeeper init' to create default categories and budgets.");
        }
    }

    Ok(())
}

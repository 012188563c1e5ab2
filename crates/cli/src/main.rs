//! CSE Motors CLI - database migrations, seeding and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! motors-cli migrate
//!
//! # Load demo classifications and vehicles
//! motors-cli seed
//!
//! # Create an employee account
//! MOTORS_ACCOUNT_PASSWORD='...' motors-cli account create \
//!     -e employee@example.com -f Happy -l Employee -r employee
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert demo data (idempotent)
//! - `account create` - Create an account with any role

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "motors-cli")]
#[command(author, version, about = "CSE Motors CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo inventory
    Seed,
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a new account
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Account role (`client`, `employee`, `admin`)
        #[arg(short, long, default_value = "client")]
        role: String,

        /// Password; prefer the environment variable over the flag
        #[arg(long, env = "MOTORS_ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => {
            commands::seed::run().await?;
        }
        Commands::Account { action } => match action {
            AccountAction::Create {
                email,
                first_name,
                last_name,
                role,
                password,
            } => {
                let password = SecretString::from(password);
                commands::account::create(&email, &first_name, &last_name, &role, &password)
                    .await?;
            }
        },
    }
    Ok(())
}

//! Foodgram CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! fg-cli migrate
//!
//! # Load reference data
//! fg-cli load ingredients --file data/ingredients.csv
//! fg-cli load tags
//!
//! # Create a user and issue an API token
//! fg-cli user create -e anna@example.com -u anna -f Anna -l Ivanova
//! fg-cli user token -u anna
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `load` - Load ingredients and tags
//! - `user` - Create users and issue API tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fg-cli")]
#[command(author, version, about = "Foodgram CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load reference data
    Load {
        #[command(subcommand)]
        target: LoadTarget,
    },
    /// Manage users and API tokens
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum LoadTarget {
    /// Load ingredients from a `name,measurement_unit` CSV file
    Ingredients {
        /// Path to the CSV file (no header row)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Create or refresh the default tags
    Tags,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Unique username
        #[arg(short, long)]
        username: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,
    },
    /// Issue an API token for a user
    Token {
        /// Username to issue the token for
        #[arg(short, long)]
        username: String,

        /// Revoke the user's existing tokens first
        #[arg(long)]
        revoke: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Load { target } => match target {
            LoadTarget::Ingredients { file } => {
                commands::load::ingredients(&file).await?;
            }
            LoadTarget::Tags => commands::load::tags().await?,
        },
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                username,
                first_name,
                last_name,
            } => {
                commands::user::create(&email, &username, &first_name, &last_name).await?;
            }
            UserAction::Token { username, revoke } => {
                commands::user::issue_token(&username, revoke).await?;
            }
        },
    }
    Ok(())
}

//! FreshWash CLI - operator tools for the portal.
//!
//! # Usage
//!
//! ```bash
//! # Print the route guard table
//! fw-cli routes
//!
//! # Ask what a role sees at a path (exit code 2 on redirect)
//! fw-cli check --role WORKER --path /employee/orders/delivery
//! fw-cli check --path /user/orders            # anonymous visitor
//!
//! # Check the laundry API answers
//! fw-cli ping --api-url http://localhost:8000/api
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use freshwash_core::Role;

mod commands;

#[derive(Parser)]
#[command(name = "fw-cli")]
#[command(author, version, about = "FreshWash portal operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every guarded route pattern with its roles and redirect
    Routes,
    /// Evaluate the guard table for a role and path
    Check {
        /// Role of the visitor; omit for an anonymous visitor
        #[arg(short, long)]
        role: Option<Role>,

        /// Request path, e.g. `/admin/orders/abc`
        #[arg(short, long)]
        path: String,
    },
    /// Check that the laundry API is reachable
    Ping {
        /// API base URL; defaults to `API_BASE_URL`
        #[arg(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, commands::CommandError> {
    match cli.command {
        Commands::Routes => {
            commands::routes::print_table()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { role, path } => commands::routes::check(role, &path),
        Commands::Ping { api_url } => {
            commands::ping::run(api_url.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

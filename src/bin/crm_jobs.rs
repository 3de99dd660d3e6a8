use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use crm_graphql_api::{
    config::JobConfig,
    jobs::{GraphQlClient, heartbeat, reminders, report, restock},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "crm-jobs", version, about = "Scheduled CRM maintenance jobs")]
struct Cli {
    /// GraphQL endpoint (overrides CRM_GRAPHQL_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Directory for the job log files (overrides CRM_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log a heartbeat line and probe the endpoint
    Heartbeat,
    /// Restock every product with fewer than 10 units
    Restock {
        /// Units added to each low-stock product (overrides CRM_RESTOCK_INCREMENT)
        #[arg(long)]
        increment: Option<i32>,
    },
    /// Log reminders for orders placed in the last 7 days
    OrderReminders,
    /// Log customer, order and revenue totals
    Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crm_graphql_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = JobConfig::from_env();
    if let Some(endpoint) = cli.endpoint {
        config.graphql_endpoint = endpoint;
    }
    if let Some(log_dir) = cli.log_dir {
        config.log_dir = log_dir;
    }

    let client = GraphQlClient::new(&config.graphql_endpoint)?;
    let now = Local::now();

    match cli.command {
        Command::Heartbeat => match heartbeat::run(&client, &config.log_dir, now).await {
            Ok(true) => println!("Heartbeat logged"),
            Ok(false) => println!("Heartbeat logged; GraphQL endpoint unreachable"),
            Err(err) => tracing::error!(error = %err, "heartbeat failed"),
        },
        Command::Restock { increment } => {
            let increment = increment.unwrap_or(config.restock_increment);
            match restock::run(&client, &config.log_dir, now, increment).await {
                Ok(count) => println!("Restocked {count} products"),
                Err(err) => tracing::error!(error = %err, "restock failed"),
            }
        }
        // The only job whose failure is reported through the exit status.
        Command::OrderReminders => {
            reminders::run(&client, &config.log_dir, now).await?;
            println!("Order reminders processed!");
        }
        Command::Report => match report::run(&client, &config.log_dir, now).await {
            Ok(_) => println!("CRM report generated successfully!"),
            Err(err) => tracing::error!(error = %err, "report failed"),
        },
    }

    Ok(())
}

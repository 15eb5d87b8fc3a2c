use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use chronicle_core::config::Config;
use chronicle_core::db;
use chronicle_core::store::postgres::{PgExecutionStore, PgWorkflowDirectory};
use chronicle_core::{ExecutionQueryService, ExecutionRange, RangeQuery};

#[derive(Parser)]
#[command(name = "chronicle")]
#[command(about = "Workflow execution history CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,

    /// Show the n most recent finished executions
    Latest {
        #[arg(default_value_t = 10)]
        n: i64,
    },

    /// Show all currently active executions
    Active,

    /// Query a filtered range of executions with a total count
    List {
        /// Workflow ids the caller may see (repeatable, required)
        #[arg(long = "accessible", required = true)]
        accessible: Vec<String>,

        /// Restrict to these statuses (repeatable)
        #[arg(long)]
        status: Vec<String>,

        /// Restrict to one workflow
        #[arg(long)]
        workflow_id: Option<String>,

        /// Only executions started at or before this date
        #[arg(long)]
        started_before: Option<String>,

        /// Only executions started at or after this date
        #[arg(long)]
        started_after: Option<String>,

        #[arg(long, default_value_t = 20)]
        limit: i64,

        /// Exclusive upper cursor: only rows with id below this
        #[arg(long)]
        last_id: Option<i64>,

        /// Exclusive lower cursor: only rows with id above this
        #[arg(long)]
        first_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;

    if let Commands::Migrate = cli.command {
        println!("Running migrations...");
        db::migrate(&pool).await?;
        println!("Migrations complete!");
        return Ok(());
    }

    let service = ExecutionQueryService::new(
        Arc::new(PgExecutionStore::new(pool.clone())),
        Arc::new(PgWorkflowDirectory::new(pool)),
    );

    match cli.command {
        Commands::Migrate => unreachable!(),
        Commands::Latest { n } => {
            let executions = service.find_latest_finished(n).await?;
            println!("{}", serde_json::to_string_pretty(&executions)?);
        }
        Commands::Active => {
            let executions = service.find_all_active().await?;
            println!("{}", serde_json::to_string_pretty(&executions)?);
        }
        Commands::List {
            accessible,
            status,
            workflow_id,
            started_before,
            started_after,
            limit,
            last_id,
            first_id,
        } => {
            let query = RangeQuery {
                status: if status.is_empty() { None } else { Some(status) },
                workflow_id,
                accessible_workflow_ids: accessible,
                started_before,
                started_after,
                range: ExecutionRange {
                    limit,
                    last_id,
                    first_id,
                },
            };
            let result = service.find_range_with_count(&query).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

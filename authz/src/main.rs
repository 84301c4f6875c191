use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use taskhub_authz::config::AppConfig;
use taskhub_authz::{Authorizer, Database, Principal};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "taskhub-authz")]
#[command(about = "Inspect and maintain the taskhub permission store")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Print the effective permission of a user or link share on a project
    Resolve {
        #[arg(long, conflicts_with = "share", required_unless_present = "share")]
        user: Option<i64>,

        /// Link share hash
        #[arg(long)]
        share: Option<String>,

        #[arg(long)]
        project: i64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database = Arc::new(
        Database::new(&config.database.path)
            .with_context(|| format!("Failed to open database at {:?}", config.database.path))?,
    );
    tracing::debug!("Database ready at {:?}", config.database.path);

    match cli.command {
        Commands::Migrate => {
            // Opening the database applies pending migrations
            println!("Database schema is up to date");
        }
        Commands::Resolve {
            user,
            share,
            project,
        } => {
            let authorizer = Authorizer::new(database, config.resolution.max_hierarchy_depth);
            let principal = match (user, share) {
                (Some(id), _) => Principal::user(id),
                (None, Some(hash)) => {
                    authorizer.link_share_principal(&hash, chrono::Utc::now().timestamp())?
                }
                (None, None) => anyhow::bail!("Either --user or --share is required"),
            };

            let resolved = authorizer.resolve(&principal, project)?;
            match resolved.permission {
                Some(permission) => println!("{permission}"),
                None => println!("none"),
            }
        }
    }

    Ok(())
}

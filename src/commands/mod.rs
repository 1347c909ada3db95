//! CLI command definitions and dispatch.

pub mod file;
pub mod folder;
pub mod list;
pub mod migrate;
pub mod root;
pub mod stats;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use docstore_core::config::AppConfig;
use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::types::{FacilityId, UserId};
use docstore_database::{DatabasePool, PgFileRepository, PgFolderRepository};
use docstore_service::{Actor, DocumentService, DocumentServices, DomainDocumentService};
use docstore_storage::build_provider;

use crate::output::OutputFormat;

/// Facility document store administration
#[derive(Debug, Parser)]
#[command(name = "docstore", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay (`config/{env}`)
    #[arg(long, env = "DOCSTORE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Document partition the command works on
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Facility, domain, and acting user.
#[derive(Debug, Clone, Args)]
pub struct ScopeArgs {
    /// Facility ID
    #[arg(long, global = true)]
    pub facility: Option<FacilityId>,

    /// Document domain: main, lifeline, maintenance, contracts
    #[arg(long, global = true, default_value = "main")]
    pub domain: String,

    /// Category subtype within the domain (e.g. `electrical`)
    #[arg(long, global = true)]
    pub subtype: Option<String>,

    /// Acting user ID, recorded as creator/uploader
    #[arg(long, global = true)]
    pub user: Option<UserId>,
}

impl ScopeArgs {
    /// The facility, required by every document command.
    pub fn facility(&self) -> AppResult<FacilityId> {
        self.facility
            .ok_or_else(|| AppError::validation("facility", "--facility is required"))
    }

    /// The acting user, required by mutating commands.
    pub fn actor(&self) -> AppResult<Actor> {
        self.user
            .map(Actor::new)
            .ok_or_else(|| AppError::validation("user", "--user is required"))
    }

    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate,
    /// Show (creating if needed) the category root folder
    Root,
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
    /// List a folder's contents or search the category
    List(list::ListArgs),
    /// Folder and file counts
    Stats(stats::StatsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        if let Commands::Migrate = self.command {
            return migrate::execute(&config).await;
        }

        let ctx = CommandContext::connect(&config).await?;
        let result = match &self.command {
            Commands::Migrate => Ok(()),
            Commands::Root => root::execute(&ctx, &self.scope, self.format).await,
            Commands::Folder(args) => folder::execute(args, &ctx, &self.scope, self.format).await,
            Commands::File(args) => file::execute(args, &ctx, &self.scope, self.format).await,
            Commands::List(args) => list::execute(args, &ctx, &self.scope, self.format).await,
            Commands::Stats(args) => stats::execute(args, &ctx, &self.scope, self.format).await,
        };
        ctx.close().await;
        result
    }
}

/// Database pool plus the document services wired on top of it.
#[derive(Debug)]
pub struct CommandContext {
    pool: DatabasePool,
    services: DocumentServices,
}

impl CommandContext {
    /// Connect to the database and storage described by `config`.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let pool = DatabasePool::connect(&config.database).await?;
        let storage = build_provider(&config.storage).await?;

        let engine = DocumentService::new(
            Arc::new(PgFolderRepository::new(pool.pool().clone())),
            Arc::new(PgFileRepository::new(pool.pool().clone())),
            storage,
            config.documents.clone(),
        );

        Ok(Self {
            pool,
            services: DocumentServices::new(Arc::new(engine)),
        })
    }

    /// The domain service selected by `--domain`.
    pub fn domain(&self, scope: &ScopeArgs) -> AppResult<&DomainDocumentService> {
        self.services.by_name(&scope.domain)
    }

    /// Release database connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

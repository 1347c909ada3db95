//! Folder management commands.

use clap::{Args, Subcommand};

use docstore_core::result::AppResult;
use docstore_core::types::FolderId;

use super::{CommandContext, ScopeArgs};
use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit to create under the category root)
        #[arg(short, long)]
        parent: Option<FolderId>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        #[arg(long)]
        id: FolderId,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete an empty folder
    Delete {
        /// Folder ID
        #[arg(long)]
        id: FolderId,
    },
    /// Show the category folder tree
    Tree,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    ctx: &CommandContext,
    scope: &ScopeArgs,
    format: OutputFormat,
) -> AppResult<()> {
    let service = ctx.domain(scope)?;
    let facility = scope.facility()?;
    let subtype = scope.subtype();

    match &args.command {
        FolderCommand::Create { name, parent } => {
            let actor = scope.actor()?;
            let response = service
                .create_folder(facility, subtype, *parent, name, &actor)
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => output::print_success(&format!(
                    "{} (id: {})",
                    response.message, response.folder.id
                )),
            }
        }
        FolderCommand::Rename { id, name } => {
            let actor = scope.actor()?;
            let response = service
                .rename_folder(facility, subtype, *id, name, &actor)
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => output::print_success(&response.message),
            }
        }
        FolderCommand::Delete { id } => {
            let actor = scope.actor()?;
            let response = service.delete_folder(facility, subtype, *id, &actor).await?;
            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => output::print_success(&response.message),
            }
        }
        FolderCommand::Tree => {
            let tree = service.folder_tree(facility, subtype).await?;
            match format {
                OutputFormat::Json => output::print_json(&tree),
                OutputFormat::Table => {
                    if tree.roots.is_empty() {
                        println!("No folders yet.");
                    } else {
                        output::print_tree(&tree.roots);
                        println!("{} folder(s)", tree.total_folders);
                    }
                }
            }
        }
    }

    Ok(())
}

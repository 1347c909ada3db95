//! Folder listing and search command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use docstore_core::result::AppResult;
use docstore_core::types::FolderId;
use docstore_entity::listing::{FileEntry, FolderEntry};
use docstore_service::DocumentFilter;

use super::{CommandContext, ScopeArgs};
use crate::output::{self, OutputFormat};

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Folder to list (defaults to the category root)
    #[arg(long)]
    pub folder: Option<FolderId>,
    /// Search the whole category by name instead
    #[arg(short, long)]
    pub search: Option<String>,
}

/// One row of the combined listing table
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Folder or file
    kind: &'static str,
    /// Entry ID
    id: String,
    /// Name
    name: String,
    /// File count (folders) or size in bytes (files)
    size: String,
    /// MIME type
    mime_type: String,
    /// Creator or uploader
    owner: String,
    /// Created at
    created_at: String,
}

impl From<&FolderEntry> for EntryRow {
    fn from(folder: &FolderEntry) -> Self {
        Self {
            kind: "folder",
            id: folder.id.to_string(),
            name: folder.name.clone(),
            size: format!("{} files", folder.file_count),
            mime_type: String::new(),
            owner: folder.creator.to_string(),
            created_at: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

impl From<&FileEntry> for EntryRow {
    fn from(file: &FileEntry) -> Self {
        Self {
            kind: "file",
            id: file.id.to_string(),
            name: file.original_name.clone(),
            size: file.file_size.to_string(),
            mime_type: file.mime_type.clone(),
            owner: file.uploader.to_string(),
            created_at: file.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute the list command
pub async fn execute(
    args: &ListArgs,
    ctx: &CommandContext,
    scope: &ScopeArgs,
    format: OutputFormat,
) -> AppResult<()> {
    let service = ctx.domain(scope)?;
    let facility = scope.facility()?;

    let filter = DocumentFilter {
        folder_id: args.folder,
        search: args.search.clone(),
    };
    let listing = service.documents(facility, scope.subtype(), &filter).await?;

    if format == OutputFormat::Json {
        output::print_json(&listing);
        return Ok(());
    }

    if !listing.breadcrumbs.is_empty() {
        let path: Vec<&str> = listing.breadcrumbs.iter().map(|b| b.name.as_str()).collect();
        println!("/{}", path.join("/"));
    }
    let rows: Vec<EntryRow> = listing
        .folders
        .iter()
        .map(EntryRow::from)
        .chain(listing.files.iter().map(EntryRow::from))
        .collect();
    output::print_list(&rows, format);
    Ok(())
}

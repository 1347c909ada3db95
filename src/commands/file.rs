//! File management commands.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Args, Subcommand};

use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::types::{FileId, FolderId};
use docstore_service::{FileContent, UploadBlob};

use super::{CommandContext, ScopeArgs};
use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload a local file
    Upload {
        /// Local file to upload
        #[arg(short, long)]
        path: PathBuf,
        /// Target folder ID (omit to upload into the category root)
        #[arg(long)]
        folder: Option<FolderId>,
        /// Name to store the file under (defaults to the local file name)
        #[arg(short, long)]
        name: Option<String>,
        /// Declared MIME type
        #[arg(long)]
        mime: Option<String>,
    },
    /// Rename a file
    Rename {
        /// File ID
        #[arg(long)]
        id: FileId,
        /// New name
        #[arg(short, long)]
        name: String,
    },
    /// Delete a file and its content
    Delete {
        /// File ID
        #[arg(long)]
        id: FileId,
    },
    /// Download a file's content
    Download {
        /// File ID
        #[arg(long)]
        id: FileId,
        /// Destination path
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Fetch a previewable file's content
    Preview {
        /// File ID
        #[arg(long)]
        id: FileId,
        /// Destination path
        #[arg(short, long)]
        out: PathBuf,
    },
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    ctx: &CommandContext,
    scope: &ScopeArgs,
    format: OutputFormat,
) -> AppResult<()> {
    let service = ctx.domain(scope)?;
    let facility = scope.facility()?;
    let subtype = scope.subtype();

    match &args.command {
        FileCommand::Upload {
            path,
            folder,
            name,
            mime,
        } => {
            let actor = scope.actor()?;
            let original_name = match name {
                Some(name) => name.clone(),
                None => local_file_name(path)?,
            };
            let data = tokio::fs::read(path).await.map_err(|e| {
                AppError::validation("path", format!("Cannot read '{}': {e}", path.display()))
            })?;

            let mut blob = UploadBlob::new(original_name, Bytes::from(data));
            if let Some(mime) = mime {
                blob = blob.with_mime_type(mime.clone());
            }

            let response = service
                .upload_file(facility, subtype, *folder, blob, &actor)
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => output::print_success(&format!(
                    "{} (id: {}, size: {} bytes)",
                    response.message, response.file.id, response.file.file_size
                )),
            }
        }
        FileCommand::Rename { id, name } => {
            let actor = scope.actor()?;
            let response = service
                .rename_file(facility, subtype, *id, name, &actor)
                .await?;
            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => output::print_success(&response.message),
            }
        }
        FileCommand::Delete { id } => {
            let actor = scope.actor()?;
            let response = service.delete_file(facility, subtype, *id, &actor).await?;
            match format {
                OutputFormat::Json => output::print_json(&response),
                OutputFormat::Table => output::print_success(&response.message),
            }
        }
        FileCommand::Download { id, out } => {
            let content = service.download(facility, subtype, *id).await?;
            write_content(&content, out, format).await?;
        }
        FileCommand::Preview { id, out } => {
            let content = service.preview(facility, subtype, *id).await?;
            write_content(&content, out, format).await?;
        }
    }

    Ok(())
}

fn local_file_name(path: &Path) -> AppResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::validation("path", format!("'{}' has no file name", path.display()))
        })
}

async fn write_content(content: &FileContent, out: &Path, format: OutputFormat) -> AppResult<()> {
    tokio::fs::write(out, &content.data).await?;

    match format {
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "file": content.file,
            "content_type": content.content_type,
            "content_disposition": content.content_disposition,
            "written_to": out.display().to_string(),
        })),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Wrote {} bytes to {}",
                content.data.len(),
                out.display()
            ));
            output::print_kv("Content-Type", &content.content_type);
            if let Some(disposition) = &content.content_disposition {
                output::print_kv("Content-Disposition", disposition);
            }
        }
    }
    Ok(())
}

//! Category statistics command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use docstore_core::result::AppResult;

use super::{CommandContext, ScopeArgs};
use crate::output::{self, OutputFormat};

/// Arguments for the stats command
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Report every category of the domain instead of one
    #[arg(long)]
    pub all_subtypes: bool,
}

/// Stats display row
#[derive(Debug, Serialize, Tabled)]
struct StatsRow {
    /// Category tag
    category: String,
    /// Folder count
    folders: u64,
    /// File count
    files: u64,
}

/// Execute the stats command
pub async fn execute(
    args: &StatsArgs,
    ctx: &CommandContext,
    scope: &ScopeArgs,
    format: OutputFormat,
) -> AppResult<()> {
    let service = ctx.domain(scope)?;
    let facility = scope.facility()?;

    let rows = if args.all_subtypes {
        service
            .domain_stats(facility)
            .await?
            .into_iter()
            .map(|s| StatsRow {
                category: s.category.to_string(),
                folders: s.stats.folder_count,
                files: s.stats.file_count,
            })
            .collect()
    } else {
        let category = service.category(scope.subtype())?;
        let stats = service.stats(facility, scope.subtype()).await?;
        vec![StatsRow {
            category: category.map_or_else(|| "(main)".to_string(), |c| c.to_string()),
            folders: stats.folder_count,
            files: stats.file_count,
        }]
    };

    output::print_list(&rows, format);
    Ok(())
}

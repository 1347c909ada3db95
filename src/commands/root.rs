//! Category root folder command.

use docstore_core::result::AppResult;

use super::{CommandContext, ScopeArgs};
use crate::output::{self, OutputFormat};

/// Show the category root, creating it with its default subfolders if needed.
pub async fn execute(ctx: &CommandContext, scope: &ScopeArgs, format: OutputFormat) -> AppResult<()> {
    let service = ctx.domain(scope)?;
    let facility = scope.facility()?;
    let actor = scope.actor()?;

    let root = service.root(facility, scope.subtype(), &actor).await?;

    match format {
        OutputFormat::Json => output::print_json(&root),
        OutputFormat::Table => {
            println!("Category root:");
            output::print_kv("ID", &root.id.to_string());
            output::print_kv("Name", &root.name);
            output::print_kv(
                "Category",
                &root
                    .category
                    .as_ref()
                    .map_or_else(|| "(main)".to_string(), ToString::to_string),
            );
            output::print_kv("Created", &root.created_at.format("%Y-%m-%d %H:%M").to_string());
        }
    }
    Ok(())
}

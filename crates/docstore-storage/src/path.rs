//! Storage path and stored-name resolution.
//!
//! A blob lives at
//! `documents/{facility}/{category | root}/{folder id}/.../{stored name}`.
//! The directory part depends only on the facility, category, and folder
//! chain, so resolving it twice gives the same answer. The stored name
//! carries a nanosecond timestamp and a random token, so two uploads of the
//! same original name never share a path.

use chrono::Utc;
use rand::RngExt;

use docstore_core::error::AppError;
use docstore_core::result::AppResult;
use docstore_core::types::FacilityId;
use docstore_entity::category::CategoryTag;
use docstore_entity::folder::Folder;

/// Top-level directory under which every document blob is stored.
pub const DOCUMENTS_PREFIX: &str = "documents";

/// Longest sanitized stem kept in a stored name.
const MAX_STEM_CHARS: usize = 64;

/// Result of resolving where a new file is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Generated physical file name.
    pub stored_name: String,
    /// Full relative path, ending in `stored_name`.
    pub relative_path: String,
}

/// Computes storage directories and collision-resistant stored names.
#[derive(Debug, Clone)]
pub struct StoragePathResolver {
    prefix: String,
}

impl Default for StoragePathResolver {
    fn default() -> Self {
        Self {
            prefix: DOCUMENTS_PREFIX.to_string(),
        }
    }
}

impl StoragePathResolver {
    /// A resolver using the default `documents` prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory for files placed at the end of `chain`.
    ///
    /// `chain` runs from the partition root down to the target folder; an
    /// empty chain means the partition itself. Every folder must belong to
    /// the facility and category, otherwise the result is
    /// `FolderOwnershipMismatch`.
    pub fn directory_for(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        chain: &[Folder],
    ) -> AppResult<String> {
        check_chain(facility_id, category, chain)?;

        let mut segments = vec![
            self.prefix.clone(),
            facility_id.to_string(),
            CategoryTag::path_segment(category),
        ];
        segments.extend(chain.iter().map(|f| f.id.to_string()));
        Ok(segments.join("/"))
    }

    /// Stored name and full path for a new file.
    pub fn resolve(
        &self,
        facility_id: FacilityId,
        category: Option<&CategoryTag>,
        chain: &[Folder],
        original_name: &str,
    ) -> AppResult<ResolvedPath> {
        let directory = self.directory_for(facility_id, category, chain)?;
        let stored_name = stored_name(original_name);
        Ok(ResolvedPath {
            relative_path: format!("{directory}/{stored_name}"),
            stored_name,
        })
    }
}

fn check_chain(
    facility_id: FacilityId,
    category: Option<&CategoryTag>,
    chain: &[Folder],
) -> AppResult<()> {
    for folder in chain {
        if !folder.belongs_to(facility_id, category) {
            return Err(AppError::ownership_mismatch(format!(
                "Folder {} does not belong to facility {facility_id} / category {}",
                folder.id,
                CategoryTag::path_segment(category)
            )));
        }
    }

    if let Some(first) = chain.first() {
        if !first.is_root() {
            return Err(AppError::internal(format!(
                "Folder chain starts at {} which is not a root",
                first.id
            )));
        }
    }
    for pair in chain.windows(2) {
        if pair[1].parent_id != Some(pair[0].id) {
            return Err(AppError::internal(format!(
                "Folder {} is not a child of {}",
                pair[1].id, pair[0].id
            )));
        }
    }
    Ok(())
}

/// Split a file name into stem and extension at the last dot.
///
/// A leading dot (`.env`) or trailing dot (`report.`) yields no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Generate a physical name for `original_name`.
///
/// The stem is reduced to ASCII letters, digits, `-`, and `_`; the
/// extension is kept exactly as supplied.
pub fn stored_name(original_name: &str) -> String {
    let (stem, extension) = split_extension(original_name);

    let mut safe: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect();
    if safe.chars().all(|c| c == '_') {
        safe = "file".to_string();
    }

    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let token = rand::rng().random::<u32>();
    let base = format!("{safe}_{nanos}_{token:08x}");

    match extension {
        Some(ext) if ext.chars().all(|c| c.is_ascii_alphanumeric()) => format!("{base}.{ext}"),
        _ => base,
    }
}

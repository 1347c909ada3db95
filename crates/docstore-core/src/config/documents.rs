//! Document domain configuration: allow-lists, size limits, and the
//! per-domain profiles that parameterize the generic document engine.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 10 MiB, the ceiling for generic documents.
const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
/// 50 MiB, the ceiling for contract documents.
const CONTRACT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Settings shared by every document domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Maximum folder and file name length, in characters.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Extensions and MIME types accepted on upload.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<AllowedFileType>,
    /// MIME types that may be served inline as a preview.
    #[serde(default = "default_preview_mime_types")]
    pub preview_mime_types: Vec<String>,
    /// One profile per document domain.
    #[serde(default)]
    pub domains: DomainsConfig,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            allowed_types: default_allowed_types(),
            preview_mime_types: default_preview_mime_types(),
            domains: DomainsConfig::default(),
        }
    }
}

impl DocumentsConfig {
    /// Look up the allow-list entry for an extension (case-insensitive).
    pub fn allowed_type(&self, extension: &str) -> Option<&AllowedFileType> {
        self.allowed_types
            .iter()
            .find(|t| t.extension.eq_ignore_ascii_case(extension))
    }

    /// Whether an allow-list entry pairs `extension` with `mime_type`.
    pub fn accepts(&self, extension: &str, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| {
            t.extension.eq_ignore_ascii_case(extension) && t.mime_type.eq_ignore_ascii_case(mime_type)
        })
    }

    /// Reject configurations that would merge document partitions.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_name_length == 0 {
            return Err(AppError::configuration(
                "documents.max_name_length must be positive",
            ));
        }
        self.domains.validate()
    }

    /// Whether a MIME type can be previewed inline.
    pub fn is_previewable(&self, mime_type: &str) -> bool {
        self.preview_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime_type))
    }
}

/// An accepted upload type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedFileType {
    /// Lowercase extension without the dot.
    pub extension: String,
    /// Canonical MIME type for the extension.
    pub mime_type: String,
}

impl AllowedFileType {
    fn new(extension: &str, mime_type: &str) -> Self {
        Self {
            extension: extension.to_string(),
            mime_type: mime_type.to_string(),
        }
    }
}

/// Profiles for the four document domains.
///
/// Each table under `[documents.domains]` overrides individual fields of
/// that domain's built-in profile. Prefixes are fixed per domain and cannot
/// be configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "DomainOverrides")]
pub struct DomainsConfig {
    /// Main (uncategorized) document space.
    pub main: DomainProfile,
    /// Lifeline equipment documents.
    pub lifeline: DomainProfile,
    /// Maintenance history documents.
    pub maintenance: DomainProfile,
    /// Contract documents.
    pub contracts: DomainProfile,
}

impl Default for DomainsConfig {
    fn default() -> Self {
        Self {
            main: default_main(),
            lifeline: default_lifeline(),
            maintenance: default_maintenance(),
            contracts: default_contracts(),
        }
    }
}

/// Partial domain tables as written in configuration files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainOverrides {
    #[serde(default)]
    main: DomainOverride,
    #[serde(default)]
    lifeline: DomainOverride,
    #[serde(default)]
    maintenance: DomainOverride,
    #[serde(default)]
    contracts: DomainOverride,
}

impl From<DomainOverrides> for DomainsConfig {
    fn from(raw: DomainOverrides) -> Self {
        Self {
            main: raw.main.apply(default_main()),
            lifeline: raw.lifeline.apply(default_lifeline()),
            maintenance: raw.maintenance.apply(default_maintenance()),
            contracts: raw.contracts.apply(default_contracts()),
        }
    }
}

/// Fields of a [`DomainProfile`] an operator may change.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainOverride {
    subtypes: Option<Vec<String>>,
    default_subfolders: Option<Vec<String>>,
    max_file_size_bytes: Option<u64>,
    root_folder_name: Option<String>,
}

impl DomainOverride {
    fn apply(self, mut profile: DomainProfile) -> DomainProfile {
        if let Some(subtypes) = self.subtypes {
            profile.subtypes = subtypes;
        }
        if let Some(subfolders) = self.default_subfolders {
            profile.default_subfolders = subfolders;
        }
        if let Some(max) = self.max_file_size_bytes {
            profile.max_file_size_bytes = max;
        }
        if let Some(name) = self.root_folder_name {
            profile.root_folder_name = name;
        }
        profile
    }
}

impl DomainsConfig {
    /// All profiles, main first.
    pub fn all(&self) -> [&DomainProfile; 4] {
        [&self.main, &self.lifeline, &self.maintenance, &self.contracts]
    }

    /// Find the profile owning a domain prefix (`None` = main space).
    pub fn by_prefix(&self, prefix: Option<&str>) -> Option<&DomainProfile> {
        self.all()
            .into_iter()
            .find(|p| p.prefix.as_deref() == prefix)
    }

    /// Check that every domain keeps its own partition.
    ///
    /// Only `main` may lack a prefix, prefixes must be distinct, and
    /// subtype names must not be blank.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.main.is_main() {
            return Err(AppError::configuration("main domain must not have a prefix"));
        }
        let mut seen: Vec<&str> = Vec::new();
        for profile in [&self.lifeline, &self.maintenance, &self.contracts] {
            let Some(prefix) = profile.prefix.as_deref() else {
                return Err(AppError::configuration(
                    "only the main domain may use the uncategorized space",
                ));
            };
            if seen.contains(&prefix) {
                return Err(AppError::configuration(format!(
                    "domain prefix '{prefix}' is used twice"
                )));
            }
            seen.push(prefix);
            if let Some(bad) = profile.subtypes.iter().find(|s| s.trim().is_empty()) {
                return Err(AppError::configuration(format!(
                    "domain '{prefix}' has an invalid subtype '{bad}'"
                )));
            }
        }
        if !self.main.subtypes.is_empty() {
            return Err(AppError::configuration("main domain cannot have subtypes"));
        }
        Ok(())
    }
}

/// Configuration of one document domain.
///
/// A domain without subtypes uses its prefix as a flat category tag
/// (`contracts`); a domain with subtypes requires one (`lifeline_gas`).
/// The main profile has no prefix and stores a null category.
#[derive(Debug, Clone, Serialize)]
pub struct DomainProfile {
    /// Category domain prefix; `None` for the main space.
    pub prefix: Option<String>,
    /// Accepted subtypes. Empty means the domain is a flat tag.
    pub subtypes: Vec<String>,
    /// Subfolders created together with the category root.
    pub default_subfolders: Vec<String>,
    /// Upload size ceiling in bytes.
    pub max_file_size_bytes: u64,
    /// Name given to an auto-created category root folder.
    pub root_folder_name: String,
}

impl DomainProfile {
    /// Whether this profile is the main (null category) space.
    pub fn is_main(&self) -> bool {
        self.prefix.is_none()
    }

    /// Whether the domain uses a single flat tag with no subtype.
    pub fn is_flat(&self) -> bool {
        self.prefix.is_some() && self.subtypes.is_empty()
    }

    /// Whether `subtype` is one of the configured subtypes.
    pub fn accepts_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s == subtype)
    }
}

fn default_max_name_length() -> usize {
    255
}

fn default_allowed_types() -> Vec<AllowedFileType> {
    vec![
        AllowedFileType::new("pdf", "application/pdf"),
        AllowedFileType::new("doc", "application/msword"),
        AllowedFileType::new(
            "docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        AllowedFileType::new("xls", "application/vnd.ms-excel"),
        AllowedFileType::new(
            "xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
        AllowedFileType::new("ppt", "application/vnd.ms-powerpoint"),
        AllowedFileType::new(
            "pptx",
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ),
        AllowedFileType::new("jpg", "image/jpeg"),
        AllowedFileType::new("jpeg", "image/jpeg"),
        AllowedFileType::new("png", "image/png"),
        AllowedFileType::new("gif", "image/gif"),
        AllowedFileType::new("txt", "text/plain"),
        AllowedFileType::new("csv", "text/csv"),
    ]
}

fn default_preview_mime_types() -> Vec<String> {
    [
        "application/pdf",
        "image/jpeg",
        "image/png",
        "image/gif",
        "text/plain",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_main() -> DomainProfile {
    DomainProfile {
        prefix: None,
        subtypes: Vec::new(),
        default_subfolders: Vec::new(),
        max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
        root_folder_name: "ドキュメント".to_string(),
    }
}

fn default_lifeline() -> DomainProfile {
    DomainProfile {
        prefix: Some("lifeline".to_string()),
        subtypes: ["electrical", "gas", "water", "elevator", "hvac_lighting"]
            .into_iter()
            .map(String::from)
            .collect(),
        default_subfolders: Vec::new(),
        max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
        root_folder_name: "ライフライン設備".to_string(),
    }
}

fn default_maintenance() -> DomainProfile {
    DomainProfile {
        prefix: Some("maintenance".to_string()),
        subtypes: ["exterior", "interior", "summer_condensation", "other"]
            .into_iter()
            .map(String::from)
            .collect(),
        default_subfolders: Vec::new(),
        max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
        root_folder_name: "修繕履歴".to_string(),
    }
}

fn default_contracts() -> DomainProfile {
    DomainProfile {
        prefix: Some("contracts".to_string()),
        subtypes: Vec::new(),
        default_subfolders: ["契約書", "見積書", "請求書", "その他"]
            .into_iter()
            .map(String::from)
            .collect(),
        max_file_size_bytes: CONTRACT_MAX_FILE_SIZE,
        root_folder_name: "契約書類".to_string(),
    }
}

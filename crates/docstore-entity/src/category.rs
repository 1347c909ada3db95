//! Structured category tag.
//!
//! At the boundary a category is one string (`contracts`,
//! `lifeline_electrical`, `maintenance_summer_condensation`). Internally it
//! is split into a domain and an optional subtype so that selecting a whole
//! domain never relies on string prefixes. Domain names cannot contain `_`,
//! which makes the split at the first `_` unambiguous.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use docstore_core::error::AppError;
use docstore_core::result::AppResult;

/// A non-null category partition key.
///
/// The main document space is represented as `Option::<CategoryTag>::None`
/// everywhere, never as a tag value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryTag {
    domain: String,
    subtype: Option<String>,
}

impl CategoryTag {
    /// Build a tag from its parts, validating both.
    pub fn new(domain: impl Into<String>, subtype: Option<String>) -> AppResult<Self> {
        let domain = domain.into();
        if domain.is_empty()
            || !domain
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(AppError::validation(
                "category",
                format!("Invalid category domain '{domain}'"),
            ));
        }

        if let Some(subtype) = &subtype {
            let valid = !subtype.is_empty()
                && !subtype.starts_with('_')
                && !subtype.ends_with('_')
                && subtype
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return Err(AppError::validation(
                    "category",
                    format!("Invalid category subtype '{subtype}'"),
                ));
            }
        }

        Ok(Self { domain, subtype })
    }

    /// A flat tag such as `contracts`.
    pub fn flat(domain: impl Into<String>) -> AppResult<Self> {
        Self::new(domain, None)
    }

    /// A two-part tag such as `lifeline_gas`.
    pub fn with_subtype(domain: impl Into<String>, subtype: impl Into<String>) -> AppResult<Self> {
        Self::new(domain, Some(subtype.into()))
    }

    /// Parse the joined boundary form.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.split_once('_') {
            Some((domain, subtype)) => Self::new(domain, Some(subtype.to_string())),
            None => Self::new(value, None),
        }
    }

    /// Parse an optional boundary value; empty strings mean the main space.
    pub fn parse_optional(value: Option<&str>) -> AppResult<Option<Self>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => Self::parse(v).map(Some),
        }
    }

    /// The domain part (`lifeline`).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The subtype part (`electrical`), if any.
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Rebuild a tag from its two database columns.
    pub fn from_columns(
        domain: Option<String>,
        subtype: Option<String>,
    ) -> AppResult<Option<Self>> {
        match (domain, subtype) {
            (None, None) => Ok(None),
            (Some(domain), subtype) => Self::new(domain, subtype).map(Some),
            (None, Some(subtype)) => Err(AppError::internal(format!(
                "Category subtype '{subtype}' stored without a domain"
            ))),
        }
    }

    /// Split an optional tag into its two database columns.
    pub fn to_columns(category: Option<&Self>) -> (Option<&str>, Option<&str>) {
        match category {
            Some(tag) => (Some(tag.domain()), tag.subtype()),
            None => (None, None),
        }
    }

    /// Joined form used as a storage path segment; `root` for the main space.
    pub fn path_segment(category: Option<&Self>) -> String {
        category.map_or_else(|| "root".to_string(), ToString::to_string)
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subtype {
            Some(subtype) => write!(f, "{}_{}", self.domain, subtype),
            None => write!(f, "{}", self.domain),
        }
    }
}

impl FromStr for CategoryTag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CategoryTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CategoryTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

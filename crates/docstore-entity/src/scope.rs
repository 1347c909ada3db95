//! Category scoping predicates.
//!
//! A [`DocumentScope`] confines a query to one facility and either one
//! exact category partition or every category of a single domain.
//! Repositories accept nothing else for listing, searching, or counting.

use serde::{Deserialize, Serialize};

use docstore_core::types::FacilityId;

use crate::category::CategoryTag;
use crate::file::File;
use crate::folder::Folder;

/// Which category rows a scope selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Exactly this category; `None` is the main space.
    Exact(Option<CategoryTag>),
    /// Every category whose domain equals this value.
    Domain(String),
}

/// A `(facility, category)` partition selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentScope {
    facility_id: FacilityId,
    filter: CategoryFilter,
}

impl DocumentScope {
    /// Select one exact category partition (`scopeFor`).
    pub fn for_category(facility_id: FacilityId, category: Option<CategoryTag>) -> Self {
        Self {
            facility_id,
            filter: CategoryFilter::Exact(category),
        }
    }

    /// Select every category of one domain (`scopeDomain`).
    ///
    /// Never matches the main space, and compares the structured domain
    /// part so `lifeline` cannot match `lifelines_x`.
    pub fn for_domain(facility_id: FacilityId, domain: impl Into<String>) -> Self {
        Self {
            facility_id,
            filter: CategoryFilter::Domain(domain.into()),
        }
    }

    /// The facility this scope is confined to.
    pub fn facility_id(&self) -> FacilityId {
        self.facility_id
    }

    /// The category filter.
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// The exact category, when this is a single-partition scope.
    pub fn exact_category(&self) -> Option<Option<&CategoryTag>> {
        match &self.filter {
            CategoryFilter::Exact(category) => Some(category.as_ref()),
            CategoryFilter::Domain(_) => None,
        }
    }

    /// Evaluate the predicate against a row's partition key.
    pub fn matches(&self, facility_id: FacilityId, category: Option<&CategoryTag>) -> bool {
        if facility_id != self.facility_id {
            return false;
        }
        match (&self.filter, category) {
            (CategoryFilter::Exact(expected), actual) => expected.as_ref() == actual,
            (CategoryFilter::Domain(domain), Some(tag)) => tag.domain() == domain,
            (CategoryFilter::Domain(_), None) => false,
        }
    }

    /// Whether a folder lies inside this scope.
    pub fn contains_folder(&self, folder: &Folder) -> bool {
        self.matches(folder.facility_id, folder.category.as_ref())
    }

    /// Whether a file lies inside this scope.
    pub fn contains_file(&self, file: &File) -> bool {
        self.matches(file.facility_id, file.category.as_ref())
    }
}

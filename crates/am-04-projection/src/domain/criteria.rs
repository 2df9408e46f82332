//! Marketplace listing filters.

use am_01_persistence::Filter;
use serde::{Deserialize, Serialize};
use shared_types::{fields, AuditRequest, AuditStatus, Complexity};

/// Optional narrowing of a listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingCriteria {
    pub status: Option<AuditStatus>,
    pub complexity: Option<Complexity>,
    pub tag: Option<String>,
    pub developer_wallet: Option<String>,
    /// Case-insensitive substring of project name or description.
    pub search: Option<String>,
}

impl ListingCriteria {
    /// The part of the criteria the store can evaluate.
    pub fn store_filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        if let Some(wallet) = non_blank(&self.developer_wallet) {
            filters.push(Filter::eq_ignore_case(fields::DEVELOPER_WALLET, wallet));
        }
        if let Some(tag) = non_blank(&self.tag) {
            filters.push(Filter::contains(fields::TAGS, tag));
        }
        filters
    }

    /// Status, complexity and text search, checked on parsed records so
    /// that legacy spellings still match.
    pub fn matches(&self, request: &AuditRequest) -> bool {
        if self.status.is_some_and(|s| s != request.status) {
            return false;
        }
        if self.complexity.is_some_and(|c| c != request.complexity) {
            return false;
        }
        match non_blank(&self.search) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                request.project_name.to_lowercase().contains(&needle)
                    || request.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

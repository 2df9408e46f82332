//! # Query Filters
//!
//! The filter language shared by every backend. A query returns documents
//! matching ALL supplied filters; an empty filter list matches everything.
//!
//! | Filter | Semantics |
//! |--------|-----------|
//! | `Eq` | field equals value exactly |
//! | `EqIgnoreCase` | string field equals value, ASCII case folded |
//! | `AnyOf` | field equals one of the values |
//! | `AnyOfIgnoreCase` | string field equals one of the values, case folded |
//! | `Contains` | array field contains the value (tag-set membership) |
//!
//! `matches` is the reference evaluation. SQL and formula translations in
//! the adapters must agree with it.

use serde_json::Value;

/// A single predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: Value },
    EqIgnoreCase { field: String, value: String },
    AnyOf { field: String, values: Vec<Value> },
    AnyOfIgnoreCase { field: String, values: Vec<String> },
    Contains { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn eq_ignore_case(field: &str, value: impl Into<String>) -> Self {
        Self::EqIgnoreCase {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn any_of<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self::AnyOf {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn any_of_ignore_case<V: Into<String>>(
        field: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::AnyOfIgnoreCase {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(field: &str, value: impl Into<Value>) -> Self {
        Self::Contains {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// The document field this filter inspects.
    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. }
            | Self::EqIgnoreCase { field, .. }
            | Self::AnyOf { field, .. }
            | Self::AnyOfIgnoreCase { field, .. }
            | Self::Contains { field, .. } => field,
        }
    }

    /// Evaluate against a document. Missing fields never match.
    pub fn matches(&self, doc: &Value) -> bool {
        let Some(actual) = doc.get(self.field()) else {
            return false;
        };

        match self {
            Self::Eq { value, .. } => actual == value,
            Self::EqIgnoreCase { value, .. } => actual
                .as_str()
                .is_some_and(|s| s.eq_ignore_ascii_case(value)),
            Self::AnyOf { values, .. } => values.iter().any(|v| v == actual),
            Self::AnyOfIgnoreCase { values, .. } => actual
                .as_str()
                .is_some_and(|s| values.iter().any(|v| s.eq_ignore_ascii_case(v))),
            Self::Contains { value, .. } => actual
                .as_array()
                .is_some_and(|items| items.iter().any(|item| item == value)),
        }
    }
}

/// True when the document satisfies every filter.
pub fn matches_all(filters: &[Filter], doc: &Value) -> bool {
    filters.iter().all(|f| f.matches(doc))
}

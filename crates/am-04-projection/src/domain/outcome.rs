use serde::{Deserialize, Serialize};

/// Result of a query that degrades instead of failing.
///
/// On a backend failure `data` is the empty value and `error` says why, so a
/// dashboard can still render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutcome<T> {
    pub data: T,
    pub error: Option<String>,
}

impl<T> QueryOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        QueryOutcome {
            data: f(self.data),
            error: self.error,
        }
    }
}

impl<T: Default> QueryOutcome<T> {
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            data: T::default(),
            error: Some(error.into()),
        }
    }

    /// Collapse a fallible query into an outcome.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::degraded(err.to_string()),
        }
    }
}

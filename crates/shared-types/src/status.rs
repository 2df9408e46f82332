//! # Value Vocabularies
//!
//! Closed enumerations for every status and classification field.
//!
//! ## Audit Request State Machine
//!
//! ```text
//! [Available] ──accept──→ [In Progress] ──submit results──→ [Completed]
//!      │                        │
//!      └──────cancel──────→ [Cancelled] ←──────cancel───────┘
//! ```
//!
//! `Completed` and `Cancelled` are terminal. Transitions never skip or reverse.

use crate::errors::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalise a stored label for tolerant comparison: lowercase, with spaces,
/// dashes and underscores removed.
fn squash(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// AUDIT REQUEST STATUS
// =============================================================================

/// Lifecycle status of an audit request.
///
/// Persists as `"Available"`, `"In Progress"`, `"Completed"`, `"Cancelled"`.
/// Parsing is case-insensitive because rows written by older clients use
/// mixed casing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AuditStatus {
    /// Open on the marketplace, no auditor yet.
    #[default]
    Available,
    /// Claimed by exactly one auditor.
    InProgress,
    /// Results submitted.
    Completed,
    /// Withdrawn administratively.
    Cancelled,
}

impl AuditStatus {
    /// All states, in lifecycle order.
    pub const ALL: [AuditStatus; 4] = [
        Self::Available,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The persisted label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Check if a transition is legal.
    pub fn can_transition_to(&self, next: AuditStatus) -> bool {
        matches!(
            (self, next),
            (Self::Available, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Available, Self::Cancelled)
                | (Self::InProgress, Self::Cancelled)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl FromStr for AuditStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "available" => Ok(Self::Available),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::new("audit status", s)),
        }
    }
}

impl TryFrom<String> for AuditStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AuditStatus> for String {
    fn from(status: AuditStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// AUDIT OWNER STATUS
// =============================================================================

/// Status of an auditor's acceptance record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerStatus {
    #[default]
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl OwnerStatus {
    /// An owner in a non-terminal state blocks any other acceptance.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Accepted | Self::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

// =============================================================================
// COMPLEXITY
// =============================================================================

/// Canonical complexity tier used by pricing, package and LOC derivations.
///
/// The cost estimator speaks a second vocabulary (Simple / Medium / Complex).
/// It maps at the boundary: Simple → Low, Medium → Medium, Complex → High.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Complexity {
    pub const ALL: [Complexity; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Multiplier applied to the per-contract-type line estimate.
    pub fn loc_multiplier(&self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 1.5,
            Self::Critical => 2.0,
        }
    }
}

impl FromStr for Complexity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "low" | "simple" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" | "complex" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseEnumError::new("complexity", s)),
        }
    }
}

impl TryFrom<String> for Complexity {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Complexity> for String {
    fn from(c: Complexity) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The estimator's three-level vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimatorComplexity {
    Simple,
    Medium,
    Complex,
}

impl From<EstimatorComplexity> for Complexity {
    fn from(value: EstimatorComplexity) -> Self {
        match value {
            EstimatorComplexity::Simple => Complexity::Low,
            EstimatorComplexity::Medium => Complexity::Medium,
            EstimatorComplexity::Complex => Complexity::High,
        }
    }
}

// =============================================================================
// SEVERITY
// =============================================================================

/// Finding severity. Persists lowercase and parses strictly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    /// Exact lowercase match only: `"Critical"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseEnumError::new("severity", s)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// FINDING / RESULT / NFT / IPFS CLASSIFIERS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    #[default]
    Open,
    Acknowledged,
    Resolved,
    Disputed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    #[default]
    Completed,
    Verified,
    Disputed,
}

/// What a minted token certifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NftKind {
    /// Minted at submission, proof of the request.
    Request,
    /// Minted at completion, the audit certificate.
    Result,
}

/// What a content-addressed upload holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpfsContentKind {
    RequestMetadata,
    EvidenceBundle,
    EvidenceFile,
    NftMetadata,
}

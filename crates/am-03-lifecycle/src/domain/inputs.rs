//! Operation inputs.
//!
//! Inputs deserialize leniently (missing fields default to empty) so that
//! every shape problem surfaces as a `Validation` error from `validate`.

use super::errors::LifecycleError;
use am_02_collaborators::EvidenceFile;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{Complexity, CostEstimate, FindingStatus, RepositoryStats, Severity};

/// Longest audit a submission or acceptance may schedule.
pub const MAX_DURATION_DAYS: u32 = 3650;

fn require(value: &str, field: &str) -> Result<(), LifecycleError> {
    if value.trim().is_empty() {
        return Err(LifecycleError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Optional on-chain contract details captured at submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractInput {
    pub name: String,
    pub contract_type: String,
    pub network: Option<String>,
    pub address: Option<String>,
}

/// A developer's audit submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitAuditInput {
    pub project_name: String,
    pub description: String,
    pub repository_url: String,
    pub complexity: Option<Complexity>,
    pub proposed_price: Option<Decimal>,
    pub estimated_duration_days: Option<u32>,
    pub auditor_count: Option<u32>,
    pub developer_wallet: String,
    pub tags: Vec<String>,
    pub contract: Option<ContractInput>,
    /// Analyzer output, consumed as opaque data.
    pub repository_stats: Option<RepositoryStats>,
    /// Estimator output, consumed as opaque data.
    pub estimate: Option<CostEstimate>,
}

/// A submission with every required value resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub complexity: Complexity,
    pub proposed_price: Decimal,
    pub estimated_duration_days: u32,
    pub auditor_count: u32,
}

impl SubmitAuditInput {
    /// Check required fields, falling back to the estimate for complexity,
    /// price and duration when the caller leaves them out.
    pub fn validate(&self) -> Result<ValidatedSubmission, LifecycleError> {
        require(&self.project_name, "projectName")?;
        require(&self.repository_url, "repositoryUrl")?;
        require(&self.developer_wallet, "developerWallet")?;

        let complexity = self
            .complexity
            .or_else(|| self.estimate.as_ref().map(|e| e.complexity.into()))
            .ok_or_else(|| LifecycleError::validation("complexity is required"))?;
        let proposed_price = self
            .proposed_price
            .or_else(|| self.estimate.as_ref().map(|e| e.price))
            .ok_or_else(|| LifecycleError::validation("proposedPrice is required"))?;
        let estimated_duration_days = self
            .estimated_duration_days
            .or_else(|| self.estimate.as_ref().map(|e| e.duration_days))
            .ok_or_else(|| LifecycleError::validation("estimatedDurationDays is required"))?;
        let auditor_count = self.auditor_count.unwrap_or(1);

        if proposed_price < Decimal::ZERO {
            return Err(LifecycleError::validation("proposedPrice must not be negative"));
        }
        if estimated_duration_days == 0 {
            return Err(LifecycleError::validation(
                "estimatedDurationDays must be at least 1",
            ));
        }
        if estimated_duration_days > MAX_DURATION_DAYS {
            return Err(LifecycleError::validation(format!(
                "estimatedDurationDays must be at most {MAX_DURATION_DAYS}"
            )));
        }
        if auditor_count == 0 {
            return Err(LifecycleError::validation("auditorCount must be at least 1"));
        }
        if let Some(contract) = &self.contract {
            require(&contract.name, "contract.name")?;
            require(&contract.contract_type, "contract.contractType")?;
        }

        Ok(ValidatedSubmission {
            complexity,
            proposed_price,
            estimated_duration_days,
            auditor_count,
        })
    }
}

/// An auditor claiming a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcceptAuditInput {
    pub auditor_wallet: String,
    pub auditor_name: String,
    pub accepted_price: Decimal,
    pub estimated_days: u32,
}

impl AcceptAuditInput {
    pub fn validate(&self) -> Result<(), LifecycleError> {
        require(&self.auditor_wallet, "auditorWallet")?;
        if self.accepted_price <= Decimal::ZERO {
            return Err(LifecycleError::validation("acceptedPrice must be positive"));
        }
        if self.estimated_days == 0 {
            return Err(LifecycleError::validation("estimatedDays must be at least 1"));
        }
        if self.estimated_days > MAX_DURATION_DAYS {
            return Err(LifecycleError::validation(format!(
                "estimatedDays must be at most {MAX_DURATION_DAYS}"
            )));
        }
        Ok(())
    }
}

/// Cancellation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CancelAuditInput {
    pub reason: Option<String>,
}

/// Completion payload.
///
/// Findings and vulnerabilities arrive as loose objects; only their
/// `severity` labels feed the breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitResultsInput {
    pub findings: Vec<serde_json::Value>,
    pub vulnerabilities: Vec<serde_json::Value>,
    pub notes: Option<String>,
    pub reports: Vec<serde_json::Value>,
    pub evidence_files: Vec<EvidenceFile>,
    pub contract_hash: Option<String>,
}

impl SubmitResultsInput {
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.findings.iter().any(|f| !f.is_object()) {
            return Err(LifecycleError::validation("every finding must be an object"));
        }
        if let Some(file) = self.evidence_files.iter().find(|f| f.name.trim().is_empty()) {
            return Err(LifecycleError::validation(format!(
                "evidence file of {} bytes has no name",
                file.bytes.len()
            )));
        }
        Ok(())
    }
}

/// A new finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindingInput {
    pub auditor_wallet: String,
    pub title: String,
    pub description: String,
    /// Strict: one of low, medium, high, critical.
    pub severity: String,
    pub category: String,
    pub file_path: Option<String>,
    pub line_number: Option<u32>,
    pub function_name: Option<String>,
    pub vulnerability_type: Option<String>,
    pub impact: Option<String>,
    pub recommendation: Option<String>,
    pub proof_of_concept: Option<String>,
    pub evidence_files: Vec<String>,
    pub code_snippets: Vec<String>,
    pub tags: Vec<String>,
    pub priority: u32,
    pub estimated_effort: Option<String>,
    pub references: Vec<String>,
}

impl FindingInput {
    /// Check required fields and parse the severity.
    pub fn validate(&self) -> Result<Severity, LifecycleError> {
        require(&self.auditor_wallet, "auditorWallet")?;
        require(&self.title, "title")?;
        require(&self.description, "description")?;
        require(&self.category, "category")?;
        parse_severity(&self.severity)
    }
}

/// Partial update of a finding. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub category: Option<String>,
    pub status: Option<FindingStatus>,
    pub impact: Option<String>,
    pub recommendation: Option<String>,
    pub proof_of_concept: Option<String>,
    pub priority: Option<u32>,
    pub estimated_effort: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl FindingUpdate {
    pub fn validate(&self) -> Result<Option<Severity>, LifecycleError> {
        for (value, field) in [
            (&self.title, "title"),
            (&self.description, "description"),
            (&self.category, "category"),
        ] {
            if let Some(value) = value {
                require(value, field)?;
            }
        }
        self.severity.as_deref().map(parse_severity).transpose()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_severity(label: &str) -> Result<Severity, LifecycleError> {
    label.parse().map_err(|_| {
        LifecycleError::validation(format!(
            "severity must be one of low, medium, high, critical (got '{label}')"
        ))
    })
}

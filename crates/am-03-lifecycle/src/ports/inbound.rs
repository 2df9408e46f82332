//! # Inbound Ports
//!
//! API trait defining what the Audit Lifecycle subsystem can do.
//! Mutations never degrade: every failure is returned to the caller.

use crate::domain::{
    AcceptAuditInput, CancelAuditInput, FindingInput, FindingUpdate, LifecycleError,
    SubmitAuditInput, SubmitResultsInput,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{
    AuditOwner, AuditRequest, AuditResult, Complexity, CostEstimate, Developer, Finding,
    RepositoryStats,
};

/// Analyzer and estimator output for a prospective submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEstimate {
    pub repository_stats: RepositoryStats,
    pub estimate: CostEstimate,
    /// The estimate's tier in the canonical vocabulary.
    pub complexity: Complexity,
}

/// Audit lifecycle API - inbound port.
#[async_trait]
pub trait AuditLifecycleApi: Send + Sync {
    /// Run the repository analyzer and cost estimator.
    async fn estimate_submission(
        &self,
        repository_url: &str,
        code_sample: &str,
    ) -> Result<SubmissionEstimate, LifecycleError>;

    /// Create an `Available` request, then charge, upload metadata and mint
    /// the request NFT.
    async fn submit_audit_request(
        &self,
        input: SubmitAuditInput,
    ) -> Result<AuditRequest, LifecycleError>;

    async fn get_audit_request(&self, request_id: &str) -> Result<AuditRequest, LifecycleError>;

    /// Claim an `Available` request. Exactly one concurrent claim wins.
    async fn accept_audit_request(
        &self,
        request_id: &str,
        input: AcceptAuditInput,
    ) -> Result<AuditOwner, LifecycleError>;

    /// Owner `Accepted` → `InProgress`.
    async fn start_audit(&self, owner_id: &str) -> Result<AuditOwner, LifecycleError>;

    /// Withdraw an `Available` or `In Progress` request.
    async fn cancel_audit_request(
        &self,
        request_id: &str,
        input: CancelAuditInput,
    ) -> Result<AuditRequest, LifecycleError>;

    /// Upload evidence, mint the certificate and complete the request.
    async fn submit_audit_results(
        &self,
        owner_id: &str,
        input: SubmitResultsInput,
    ) -> Result<AuditResult, LifecycleError>;

    async fn create_finding(
        &self,
        request_id: &str,
        input: FindingInput,
    ) -> Result<Finding, LifecycleError>;

    /// Edit a finding on an In Progress request. With `auditor_wallet`,
    /// only that auditor's finding.
    async fn update_finding(
        &self,
        finding_id: &str,
        auditor_wallet: Option<&str>,
        update: FindingUpdate,
    ) -> Result<Finding, LifecycleError>;

    /// Same gate as `update_finding`.
    async fn delete_finding(
        &self,
        finding_id: &str,
        auditor_wallet: Option<&str>,
    ) -> Result<(), LifecycleError>;

    /// Findings on a request, optionally only one auditor's.
    async fn list_findings(
        &self,
        request_id: &str,
        auditor_wallet: Option<&str>,
    ) -> Result<Vec<Finding>, LifecycleError>;

    /// Recompute and upsert the developer's aggregate profile.
    async fn refresh_developer_profile(&self, wallet: &str) -> Result<Developer, LifecycleError>;
}

//! AuditLifecycleApi implementation.

use super::AuditLifecycleService;
use crate::domain::{
    AcceptAuditInput, CancelAuditInput, FindingInput, FindingUpdate, LifecycleError,
    SubmitAuditInput, SubmitResultsInput,
};
use crate::ports::inbound::{AuditLifecycleApi, SubmissionEstimate};
use async_trait::async_trait;
use shared_types::{AuditOwner, AuditRequest, AuditResult, Developer, Finding};

#[async_trait]
impl AuditLifecycleApi for AuditLifecycleService {
    async fn estimate_submission(
        &self,
        repository_url: &str,
        code_sample: &str,
    ) -> Result<SubmissionEstimate, LifecycleError> {
        self.estimate(repository_url, code_sample).await
    }

    async fn submit_audit_request(
        &self,
        input: SubmitAuditInput,
    ) -> Result<AuditRequest, LifecycleError> {
        self.submit(input).await
    }

    async fn get_audit_request(&self, request_id: &str) -> Result<AuditRequest, LifecycleError> {
        Ok(self.repository.require(request_id).await?)
    }

    async fn accept_audit_request(
        &self,
        request_id: &str,
        input: AcceptAuditInput,
    ) -> Result<AuditOwner, LifecycleError> {
        self.accept(request_id, input).await
    }

    async fn start_audit(&self, owner_id: &str) -> Result<AuditOwner, LifecycleError> {
        self.start(owner_id).await
    }

    async fn cancel_audit_request(
        &self,
        request_id: &str,
        input: CancelAuditInput,
    ) -> Result<AuditRequest, LifecycleError> {
        self.cancel(request_id, input).await
    }

    async fn submit_audit_results(
        &self,
        owner_id: &str,
        input: SubmitResultsInput,
    ) -> Result<AuditResult, LifecycleError> {
        self.complete(owner_id, input).await
    }

    async fn create_finding(
        &self,
        request_id: &str,
        input: FindingInput,
    ) -> Result<Finding, LifecycleError> {
        self.create_finding_for(request_id, input).await
    }

    async fn update_finding(
        &self,
        finding_id: &str,
        auditor_wallet: Option<&str>,
        update: FindingUpdate,
    ) -> Result<Finding, LifecycleError> {
        self.update_finding_by_id(finding_id, auditor_wallet, update)
            .await
    }

    async fn delete_finding(
        &self,
        finding_id: &str,
        auditor_wallet: Option<&str>,
    ) -> Result<(), LifecycleError> {
        self.delete_finding_by_id(finding_id, auditor_wallet).await
    }

    async fn list_findings(
        &self,
        request_id: &str,
        auditor_wallet: Option<&str>,
    ) -> Result<Vec<Finding>, LifecycleError> {
        self.findings_for(request_id, auditor_wallet).await
    }

    async fn refresh_developer_profile(&self, wallet: &str) -> Result<Developer, LifecycleError> {
        self.refresh_profile(wallet).await
    }
}

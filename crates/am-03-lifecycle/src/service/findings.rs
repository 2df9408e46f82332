//! Finding CRUD.

use super::{new_id, touched, AuditLifecycleService};
use crate::domain::{FindingInput, FindingUpdate, LifecycleError};
use am_01_persistence::{patch_of, Filter};
use serde_json::json;
use shared_types::{fields, AuditRequest, AuditStatus, Finding, FindingStatus};
use tracing::{debug, info};

impl AuditLifecycleService {
    pub(crate) async fn create_finding_for(
        &self,
        request_id: &str,
        input: FindingInput,
    ) -> Result<Finding, LifecycleError> {
        let severity = input.validate()?;
        let request: AuditRequest = self.repository.require(request_id).await?;
        if request.status != AuditStatus::InProgress {
            return Err(LifecycleError::state(format!(
                "findings can only be recorded on an In Progress request ({request_id} is {})",
                request.status
            )));
        }

        let now = self.now();
        let finding = Finding {
            id: new_id("fnd"),
            audit_request_id: request_id.to_string(),
            auditor_wallet: input.auditor_wallet.trim().to_string(),
            title: input.title,
            description: input.description,
            severity,
            category: input.category,
            file_path: input.file_path,
            line_number: input.line_number,
            function_name: input.function_name,
            vulnerability_type: input.vulnerability_type,
            impact: input.impact,
            recommendation: input.recommendation,
            proof_of_concept: input.proof_of_concept,
            evidence_files: input.evidence_files,
            code_snippets: input.code_snippets,
            tags: input.tags,
            priority: input.priority,
            estimated_effort: input.estimated_effort,
            references: input.references,
            status: FindingStatus::Open,
            created_at: now,
            updated_at: now,
        };
        let finding = self.repository.create(&finding).await?;
        info!(
            "[am-03] Finding {} ({}) recorded on {}",
            finding.id, finding.severity, request_id
        );
        Ok(finding)
    }

    pub(crate) async fn update_finding_by_id(
        &self,
        finding_id: &str,
        auditor_wallet: Option<&str>,
        update: FindingUpdate,
    ) -> Result<Finding, LifecycleError> {
        let severity = update.validate()?;
        if update.is_empty() {
            return Err(LifecycleError::validation("no finding fields to update"));
        }
        self.editable_finding(finding_id, auditor_wallet).await?;

        let mut patch = patch_of(
            serde_json::to_value(&update).map_err(|e| LifecycleError::validation(e.to_string()))?,
        );
        patch.retain(|_, value| !value.is_null());
        if let Some(severity) = severity {
            patch.insert("severity".to_string(), json!(severity));
        }

        let finding = self
            .repository
            .update::<Finding>(finding_id, touched(patch, self.now()))
            .await?;
        debug!("[am-03] Finding {} updated", finding_id);
        Ok(finding)
    }

    pub(crate) async fn delete_finding_by_id(
        &self,
        finding_id: &str,
        auditor_wallet: Option<&str>,
    ) -> Result<(), LifecycleError> {
        self.editable_finding(finding_id, auditor_wallet).await?;
        self.repository.delete::<Finding>(finding_id).await?;
        info!("[am-03] Finding {} deleted", finding_id);
        Ok(())
    }

    /// A finding may change only while its request is In Progress, and only
    /// by the auditor who recorded it when a wallet is given.
    async fn editable_finding(
        &self,
        finding_id: &str,
        auditor_wallet: Option<&str>,
    ) -> Result<Finding, LifecycleError> {
        let finding: Finding = self.repository.require(finding_id).await?;
        if let Some(wallet) = auditor_wallet.map(str::trim).filter(|w| !w.is_empty()) {
            if !finding.auditor_wallet.eq_ignore_ascii_case(wallet) {
                return Err(LifecycleError::state(format!(
                    "finding {finding_id} was recorded by another auditor"
                )));
            }
        }

        let request: AuditRequest = self.repository.require(&finding.audit_request_id).await?;
        if request.status != AuditStatus::InProgress {
            return Err(LifecycleError::state(format!(
                "findings can only change on an In Progress request ({} is {})",
                request.id, request.status
            )));
        }
        Ok(finding)
    }

    pub(crate) async fn findings_for(
        &self,
        request_id: &str,
        auditor_wallet: Option<&str>,
    ) -> Result<Vec<Finding>, LifecycleError> {
        let mut filters = vec![Filter::eq(fields::AUDIT_REQUEST_ID, request_id)];
        if let Some(wallet) = auditor_wallet.map(str::trim).filter(|w| !w.is_empty()) {
            filters.push(Filter::eq_ignore_case(fields::AUDITOR_WALLET, wallet));
        }
        Ok(self.repository.list(&filters).await?)
    }
}


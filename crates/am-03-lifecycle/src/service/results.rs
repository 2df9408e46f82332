//! Result submission.
//!
//! Evidence upload and certificate minting happen before anything is
//! written, so a collaborator failure leaves the request untouched. After
//! the request flips to `Completed`, a failed write is reported with the
//! ids already persisted.

use super::{new_id, touched, AuditLifecycleService};
use crate::domain::{severity_breakdown, status_guard, LifecycleError, SubmitResultsInput};
use am_01_persistence::{patch_of, Filter};
use am_02_collaborators::{MintReceipt, NftMetadata, StoredContent};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use shared_types::{
    fields, AuditOwner, AuditRequest, AuditResult, AuditStatus, Finding, IpfsContentKind,
    IpfsRecord, NftKind, NftRecord, OwnerStatus, ResultStatus, Severity,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Uploaded evidence and the minted certificate.
struct Evidence {
    bundle: StoredContent,
    files: Vec<(String, StoredContent)>,
    certificate: MintReceipt,
    metadata_uri: String,
}

impl AuditLifecycleService {
    pub(crate) async fn complete(
        &self,
        owner_id: &str,
        input: SubmitResultsInput,
    ) -> Result<AuditResult, LifecycleError> {
        input.validate()?;
        let owner: AuditOwner = self.repository.require(owner_id).await?;
        let request: AuditRequest = self.repository.require(&owner.audit_request_id).await?;
        let request_id = request.id.clone();

        if request.status != AuditStatus::InProgress {
            return Err(LifecycleError::state(format!(
                "results can only be submitted for an In Progress request ({request_id} is {})",
                request.status
            )));
        }
        if !owner.status.is_active() {
            return Err(LifecycleError::state(format!(
                "audit owner {owner_id} is {}",
                owner.status.as_str()
            )));
        }
        let existing: Vec<AuditResult> = self
            .repository
            .list(&[Filter::eq(fields::AUDIT_REQUEST_ID, request_id.as_str())])
            .await?;
        if !existing.is_empty() {
            return Err(LifecycleError::state(format!(
                "results already submitted for {request_id}"
            )));
        }

        let recorded: Vec<Finding> = self
            .repository
            .list(&[Filter::eq(fields::AUDIT_REQUEST_ID, request_id.as_str())])
            .await?;
        let recorded: HashSet<String> = recorded.into_iter().map(|f| f.id).collect();

        let now = self.now();
        let breakdown = severity_breakdown(&input.findings);
        let evidence = self.publish_evidence(&request, &owner, &input, now).await?;

        let completed = self
            .repository
            .patch_if::<AuditRequest>(
                &request_id,
                &[status_guard(&[AuditStatus::InProgress])],
                touched(patch_of(json!({ "status": AuditStatus::Completed })), now),
            )
            .await?;
        if completed.is_none() {
            return Err(LifecycleError::state(format!(
                "audit request {request_id} changed state during submission"
            )));
        }

        let mut created = vec![request_id.clone()];
        let backend = self.repository.backend_name();
        let nft_id = new_id("nft");
        let bundle_record_id = new_id("ipfs");

        let result = AuditResult {
            id: new_id("res"),
            audit_request_id: request_id.clone(),
            audit_owner_id: owner.id.clone(),
            ipfs_hash: evidence.bundle.hash.clone(),
            evidence_hashes: evidence.files.iter().map(|(_, f)| f.hash.clone()).collect(),
            findings_count: count(input.findings.len()),
            vulnerabilities_count: count(input.vulnerabilities.len()),
            severity_breakdown: breakdown,
            contract_hash: input.contract_hash.clone(),
            notes: input.notes.clone(),
            completed_at: now,
            nft_id: Some(nft_id.clone()),
            status: ResultStatus::Completed,
        };
        let partial = |e: am_01_persistence::StoreError, created: &[String]| {
            LifecycleError::partial_write(&e, backend, created)
        };

        let result = self
            .repository
            .create(&result)
            .await
            .map_err(|e| partial(e, &created))?;
        created.push(result.id.clone());

        self.repository
            .update::<AuditOwner>(
                &owner.id,
                touched(
                    patch_of(json!({
                        "status": OwnerStatus::Completed,
                        "completedAt": now,
                        "nftId": nft_id,
                    })),
                    now,
                ),
            )
            .await
            .map_err(|e| partial(e, &created))?;

        for finding in submitted_findings(&request_id, &owner, &input.findings, &recorded, now) {
            self.repository
                .create(&finding)
                .await
                .map_err(|e| partial(e, &created))?;
            created.push(finding.id);
        }

        let mut ipfs_records = vec![IpfsRecord {
            id: bundle_record_id.clone(),
            audit_request_id: request_id.clone(),
            kind: IpfsContentKind::EvidenceBundle,
            content_hash: evidence.bundle.hash.clone(),
            file_name: None,
            size_bytes: Some(evidence.bundle.size_bytes),
            created_at: now,
        }];
        ipfs_records.extend(evidence.files.iter().map(|(name, stored)| IpfsRecord {
            id: new_id("ipfs"),
            audit_request_id: request_id.clone(),
            kind: IpfsContentKind::EvidenceFile,
            content_hash: stored.hash.clone(),
            file_name: Some(name.clone()),
            size_bytes: Some(stored.size_bytes),
            created_at: now,
        }));
        for record in ipfs_records {
            self.repository
                .create(&record)
                .await
                .map_err(|e| partial(e, &created))?;
            created.push(record.id);
        }

        let nft = NftRecord {
            id: nft_id,
            audit_request_id: request_id.clone(),
            kind: NftKind::Result,
            token_id: evidence.certificate.token_id,
            transaction_hash: evidence.certificate.transaction_hash,
            recipient_wallet: request.developer_wallet.clone(),
            metadata_uri: evidence.metadata_uri,
            ipfs_record_id: Some(bundle_record_id),
            created_at: now,
        };
        self.repository
            .create(&nft)
            .await
            .map_err(|e| partial(e, &created))?;

        info!(
            "[am-03] Results for {} submitted by {}: {} findings, certificate token {}",
            request_id, owner.auditor_wallet, result.findings_count, nft.token_id
        );
        self.refresh_profile_quietly(&request.developer_wallet).await;
        Ok(result)
    }

    /// Upload the bundle and each file, then mint the certificate to the
    /// developer.
    async fn publish_evidence(
        &self,
        request: &AuditRequest,
        owner: &AuditOwner,
        input: &SubmitResultsInput,
        now: DateTime<Utc>,
    ) -> Result<Evidence, LifecycleError> {
        let mut files = Vec::with_capacity(input.evidence_files.len());
        for file in &input.evidence_files {
            let stored = self
                .storage
                .store_file(file)
                .await
                .map_err(|e| LifecycleError::upstream(&e, &[]))?;
            files.push((file.name.clone(), stored));
        }

        let bundle = json!({
            "auditRequestId": request.id,
            "auditOwnerId": owner.id,
            "auditorWallet": owner.auditor_wallet,
            "findings": input.findings,
            "vulnerabilities": input.vulnerabilities,
            "reports": input.reports,
            "notes": input.notes,
            "contractHash": input.contract_hash,
            "evidenceFiles": files
                .iter()
                .map(|(name, stored)| json!({ "name": name, "hash": stored.hash }))
                .collect::<Vec<_>>(),
            "submittedAt": now,
        });
        let bundle = self
            .storage
            .store_json(&format!("audit-results-{}", request.id), &bundle)
            .await
            .map_err(|e| LifecycleError::upstream(&e, &[]))?;

        let metadata_uri = self.storage.uri_for(&bundle.hash);
        let breakdown = severity_breakdown(&input.findings);
        let metadata = NftMetadata {
            name: format!("Audit Certificate: {}", request.project_name),
            description: format!(
                "Security audit of {} completed by {}",
                request.project_name, owner.auditor_name
            ),
            external_url: Some(metadata_uri.clone()),
            attributes: Vec::new(),
        }
        .attribute("requestNft", request.nft_id.clone())
        .attribute("auditOwnerId", owner.id.as_str())
        .attribute("auditor", owner.auditor_wallet.as_str())
        .attribute("findings", count(input.findings.len()))
        .attribute("critical", breakdown.critical)
        .attribute("high", breakdown.high)
        .attribute("completedAt", now.to_rfc3339());

        let certificate = self
            .minter
            .mint(&metadata, &request.developer_wallet)
            .await
            .map_err(|e| LifecycleError::upstream(&e, &[]))?;

        Ok(Evidence {
            bundle,
            files,
            certificate,
            metadata_uri,
        })
    }
}

/// Submitted finding objects that carry a valid severity and a title.
///
/// Entries whose `id` names a finding already recorded on the request are
/// counted in the breakdown but not stored again.
fn submitted_findings(
    request_id: &str,
    owner: &AuditOwner,
    findings: &[Value],
    recorded: &HashSet<String>,
    now: DateTime<Utc>,
) -> Vec<Finding> {
    findings
        .iter()
        .filter_map(|raw| {
            let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
            if let Some(id) = text("id").filter(|id| recorded.contains(id)) {
                debug!("[am-03] Finding {} already recorded on {}", id, request_id);
                return None;
            }
            let severity = text("severity").and_then(|s| s.parse::<Severity>().ok());
            let (Some(title), Some(severity)) = (text("title"), severity) else {
                warn!(
                    "[am-03] Skipping finding without title or valid severity on {}",
                    request_id
                );
                return None;
            };
            Some(Finding {
                id: new_id("fnd"),
                audit_request_id: request_id.to_string(),
                auditor_wallet: owner.auditor_wallet.clone(),
                title,
                description: text("description").unwrap_or_default(),
                severity,
                category: text("category").unwrap_or_else(|| "general".to_string()),
                file_path: text("filePath"),
                line_number: raw
                    .get("lineNumber")
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok()),
                function_name: text("functionName"),
                vulnerability_type: text("vulnerabilityType"),
                impact: text("impact"),
                recommendation: text("recommendation"),
                proof_of_concept: text("proofOfConcept"),
                evidence_files: Vec::new(),
                code_snippets: Vec::new(),
                tags: Vec::new(),
                priority: 0,
                estimated_effort: None,
                references: Vec::new(),
                status: Default::default(),
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

//! Submission and pre-submission estimation.

use super::{new_id, touched, AuditLifecycleService};
use crate::domain::{repository_hash, LifecycleError, SubmitAuditInput};
use crate::ports::inbound::SubmissionEstimate;
use am_01_persistence::Patch;
use am_02_collaborators::{NftMetadata, PaymentRequest};
use serde_json::json;
use shared_types::{
    fields, AuditRequest, AuditStatus, IpfsContentKind, IpfsRecord, NftKind, NftRecord,
    SmartContract,
};
use tracing::{info, warn};

impl AuditLifecycleService {
    pub(crate) async fn estimate(
        &self,
        repository_url: &str,
        code_sample: &str,
    ) -> Result<SubmissionEstimate, LifecycleError> {
        if repository_url.trim().is_empty() {
            return Err(LifecycleError::validation("repositoryUrl is required"));
        }
        let repository_stats = self
            .analyzer
            .analyze(repository_url)
            .await
            .map_err(|e| LifecycleError::upstream(&e, &[]))?;
        let estimate = self
            .estimator
            .estimate(code_sample, &repository_stats)
            .await
            .map_err(|e| LifecycleError::upstream(&e, &[]))?;

        Ok(SubmissionEstimate {
            complexity: estimate.complexity.into(),
            repository_stats,
            estimate,
        })
    }

    pub(crate) async fn submit(
        &self,
        input: SubmitAuditInput,
    ) -> Result<AuditRequest, LifecycleError> {
        let valid = input.validate()?;
        let now = self.now();
        let request_id = new_id("req");
        let contract_id = input.contract.as_ref().map(|_| new_id("sc"));

        let request = AuditRequest {
            id: request_id.clone(),
            project_name: input.project_name.trim().to_string(),
            description: input.description,
            repository_hash: repository_hash(&input.repository_url, now),
            repository_url: input.repository_url,
            complexity: valid.complexity,
            proposed_price: valid.proposed_price,
            estimated_duration_days: valid.estimated_duration_days,
            auditor_count: valid.auditor_count,
            developer_wallet: input.developer_wallet,
            status: AuditStatus::Available,
            tags: input.tags,
            created_at: now,
            updated_at: now,
            start_date: None,
            estimated_completion_date: None,
            smart_contract_id: contract_id.clone(),
            nft_id: None,
            ipfs_record_id: None,
            payment_reference: None,
            repository_stats: input.repository_stats,
            estimate: input.estimate,
            cancellation_reason: None,
        };

        let request = self.repository.create(&request).await?;
        info!(
            "[am-03] Audit request {} submitted by {}",
            request.id, request.developer_wallet
        );

        let mut created = vec![request_id.clone()];
        let mut links = Patch::new();
        let outcome = self
            .run_submission_side_effects(&request, input.contract, contract_id, &mut created, &mut links)
            .await;

        // Persist whatever links were obtained, even on failure.
        let linked = if links.is_empty() {
            Ok(request.clone())
        } else {
            self.repository
                .update::<AuditRequest>(&request_id, touched(links, now))
                .await
        };

        if let Err(err) = outcome {
            warn!(
                "[am-03] Submission side effects failed for {}: {}",
                request_id, err
            );
            if let Err(link_err) = linked {
                warn!("[am-03] Could not link partial results to {}: {}", request_id, link_err);
            }
            return Err(err);
        }
        let request = linked.map_err(|e| {
            LifecycleError::partial_write(&e, self.repository.backend_name(), &created)
        })?;

        self.refresh_profile_quietly(&request.developer_wallet).await;
        Ok(request)
    }

    /// Contract record, payment, metadata upload and request NFT.
    ///
    /// Ids written go to `created`; fields to link onto the request go to
    /// `links`.
    async fn run_submission_side_effects(
        &self,
        request: &AuditRequest,
        contract: Option<crate::domain::ContractInput>,
        contract_id: Option<String>,
        created: &mut Vec<String>,
        links: &mut Patch,
    ) -> Result<(), LifecycleError> {
        let backend = self.repository.backend_name();
        let now = request.created_at;

        if let (Some(contract), Some(contract_id)) = (contract, contract_id) {
            let record = SmartContract {
                id: contract_id.clone(),
                audit_request_id: request.id.clone(),
                name: contract.name,
                contract_type: contract.contract_type,
                network: contract.network,
                address: contract.address,
                source_hash: None,
                created_at: now,
            };
            self.repository
                .create(&record)
                .await
                .map_err(|e| LifecycleError::partial_write(&e, backend, created))?;
            created.push(contract_id);
        }

        let receipt = self
            .payments
            .charge(&PaymentRequest {
                audit_request_id: request.id.clone(),
                payer_wallet: request.developer_wallet.clone(),
                amount: request.proposed_price,
            })
            .await
            .map_err(|e| LifecycleError::upstream(&e, created))?;
        links.insert(fields::PAYMENT_REFERENCE.into(), json!(receipt.reference));

        let metadata = json!({
            "auditRequestId": request.id,
            "projectName": request.project_name,
            "description": request.description,
            "repositoryUrl": request.repository_url,
            "repositoryHash": request.repository_hash,
            "complexity": request.complexity,
            "proposedPrice": request.proposed_price.to_string(),
            "estimatedDurationDays": request.estimated_duration_days,
            "developerWallet": request.developer_wallet,
            "tags": request.tags,
            "submittedAt": request.created_at,
        });
        let stored = self
            .storage
            .store_json(&format!("audit-request-{}", request.id), &metadata)
            .await
            .map_err(|e| LifecycleError::upstream(&e, created))?;

        let ipfs_record = IpfsRecord {
            id: new_id("ipfs"),
            audit_request_id: request.id.clone(),
            kind: IpfsContentKind::RequestMetadata,
            content_hash: stored.hash.clone(),
            file_name: None,
            size_bytes: Some(stored.size_bytes),
            created_at: now,
        };
        self.repository
            .create(&ipfs_record)
            .await
            .map_err(|e| LifecycleError::partial_write(&e, backend, created))?;
        created.push(ipfs_record.id.clone());
        links.insert(fields::IPFS_RECORD_ID.into(), json!(ipfs_record.id));

        let metadata_uri = self.storage.uri_for(&stored.hash);
        let nft_metadata = NftMetadata {
            name: format!("Audit Request: {}", request.project_name),
            description: request.description.clone(),
            external_url: Some(metadata_uri.clone()),
            attributes: Vec::new(),
        }
        .attribute("complexity", request.complexity.as_str())
        .attribute("durationDays", request.estimated_duration_days);

        let receipt = self
            .minter
            .mint(&nft_metadata, &request.developer_wallet)
            .await
            .map_err(|e| LifecycleError::upstream(&e, created))?;

        let nft = NftRecord {
            id: new_id("nft"),
            audit_request_id: request.id.clone(),
            kind: NftKind::Request,
            token_id: receipt.token_id,
            transaction_hash: receipt.transaction_hash,
            recipient_wallet: request.developer_wallet.clone(),
            metadata_uri,
            ipfs_record_id: Some(ipfs_record.id),
            created_at: now,
        };
        self.repository
            .create(&nft)
            .await
            .map_err(|e| LifecycleError::partial_write(&e, backend, created))?;
        created.push(nft.id.clone());
        links.insert(fields::NFT_ID.into(), json!(nft.id));

        Ok(())
    }
}

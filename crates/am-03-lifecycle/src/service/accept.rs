//! Acceptance, start and cancellation.

use super::{new_id, touched, AuditLifecycleService};
use crate::domain::{status_guard, AcceptAuditInput, CancelAuditInput, LifecycleError};
use am_01_persistence::{patch_of, Filter};
use chrono::Duration;
use serde_json::json;
use shared_types::{fields, AuditOwner, AuditRequest, AuditStatus, OwnerStatus};
use tracing::{error, info, warn};

impl AuditLifecycleService {
    /// Claim an `Available` request.
    ///
    /// The request flips to `In Progress` through a conditional update
    /// before the owner row is written, so of any number of concurrent
    /// claims exactly one passes the guard.
    pub(crate) async fn accept(
        &self,
        request_id: &str,
        input: AcceptAuditInput,
    ) -> Result<AuditOwner, LifecycleError> {
        input.validate()?;
        let request: AuditRequest = self.repository.require(request_id).await?;

        if request
            .developer_wallet
            .eq_ignore_ascii_case(input.auditor_wallet.trim())
        {
            return Err(LifecycleError::state(
                "developers cannot accept their own audit request",
            ));
        }
        if request.status != AuditStatus::Available {
            return Err(LifecycleError::state(format!(
                "audit request {request_id} is no longer available ({})",
                request.status
            )));
        }

        let now = self.now();
        let completion = now
            .checked_add_signed(Duration::days(i64::from(input.estimated_days)))
            .ok_or_else(|| LifecycleError::validation("estimatedDays is out of range"))?;
        let claim = touched(
            patch_of(json!({
                "status": AuditStatus::InProgress,
                "startDate": now,
                "estimatedCompletionDate": completion,
            })),
            now,
        );
        let claimed = self
            .repository
            .patch_if::<AuditRequest>(request_id, &[status_guard(&[AuditStatus::Available])], claim)
            .await?;
        if claimed.is_none() {
            return Err(LifecycleError::state(format!(
                "audit request {request_id} is no longer available"
            )));
        }

        let owner = AuditOwner {
            id: new_id("own"),
            audit_request_id: request_id.to_string(),
            auditor_wallet: input.auditor_wallet.trim().to_string(),
            auditor_name: input.auditor_name,
            accepted_price: input.accepted_price,
            start_date: now,
            estimated_completion_date: completion,
            status: OwnerStatus::Accepted,
            nft_id: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        let owner = match self.repository.create(&owner).await {
            Ok(owner) => owner,
            Err(write_err) => {
                warn!(
                    "[am-03] Owner write failed for {}, releasing claim: {}",
                    request_id, write_err
                );
                return Err(self.release_claim(request_id, write_err).await);
            }
        };
        self.withdraw_if_cancelled(request_id, &owner).await?;

        info!(
            "[am-03] Audit request {} accepted by {} at {}",
            request_id, owner.auditor_wallet, owner.accepted_price
        );
        self.refresh_profile_quietly(&request.developer_wallet).await;
        Ok(owner)
    }

    /// A cancel that landed between the claim and the owner insert did not
    /// see this owner; retire it here. Any later cancel lists it itself.
    async fn withdraw_if_cancelled(
        &self,
        request_id: &str,
        owner: &AuditOwner,
    ) -> Result<(), LifecycleError> {
        let current: AuditRequest = self.repository.require(request_id).await?;
        if current.status != AuditStatus::Cancelled {
            return Ok(());
        }

        self.repository
            .patch_if::<AuditOwner>(
                &owner.id,
                &[Filter::eq(fields::STATUS, OwnerStatus::Accepted.as_str())],
                touched(
                    patch_of(json!({ "status": OwnerStatus::Cancelled })),
                    self.now(),
                ),
            )
            .await
            .map_err(|e| {
                LifecycleError::partial_write(
                    &e,
                    self.repository.backend_name(),
                    &[owner.id.clone()],
                )
            })?;
        warn!(
            "[am-03] Audit request {} was cancelled during acceptance by {}",
            request_id, owner.auditor_wallet
        );
        Err(LifecycleError::state(format!(
            "audit request {request_id} was cancelled"
        )))
    }

    /// Put a claimed request back on the marketplace after the owner write
    /// failed.
    async fn release_claim(
        &self,
        request_id: &str,
        write_err: am_01_persistence::StoreError,
    ) -> LifecycleError {
        let release = touched(
            patch_of(json!({
                "status": AuditStatus::Available,
                "startDate": null,
                "estimatedCompletionDate": null,
            })),
            self.now(),
        );
        match self
            .repository
            .patch_if::<AuditRequest>(request_id, &[status_guard(&[AuditStatus::InProgress])], release)
            .await
        {
            Ok(Some(_)) => write_err.into(),
            Ok(None) | Err(_) => {
                error!(
                    "[am-03] Audit request {} left In Progress without an owner",
                    request_id
                );
                LifecycleError::partial_write(
                    &write_err,
                    self.repository.backend_name(),
                    &[request_id.to_string()],
                )
            }
        }
    }

    /// Owner `accepted` → `in_progress`.
    pub(crate) async fn start(&self, owner_id: &str) -> Result<AuditOwner, LifecycleError> {
        let owner: AuditOwner = self.repository.require(owner_id).await?;
        if owner.status != OwnerStatus::Accepted {
            return Err(LifecycleError::state(format!(
                "audit owner {owner_id} cannot start from {}",
                owner.status.as_str()
            )));
        }

        let started = self
            .repository
            .patch_if::<AuditOwner>(
                owner_id,
                &[Filter::eq(fields::STATUS, OwnerStatus::Accepted.as_str())],
                touched(
                    patch_of(json!({ "status": OwnerStatus::InProgress })),
                    self.now(),
                ),
            )
            .await?
            .ok_or_else(|| {
                LifecycleError::state(format!("audit owner {owner_id} changed concurrently"))
            })?;

        info!("[am-03] Audit {} started by {}", owner_id, started.auditor_wallet);
        Ok(started)
    }

    pub(crate) async fn cancel(
        &self,
        request_id: &str,
        input: CancelAuditInput,
    ) -> Result<AuditRequest, LifecycleError> {
        let request: AuditRequest = self.repository.require(request_id).await?;
        let now = self.now();

        let cancelled = self
            .repository
            .patch_if::<AuditRequest>(
                request_id,
                &[status_guard(&[AuditStatus::Available, AuditStatus::InProgress])],
                touched(
                    patch_of(json!({
                        "status": AuditStatus::Cancelled,
                        "cancellationReason": input.reason,
                    })),
                    now,
                ),
            )
            .await?;
        let Some(cancelled) = cancelled else {
            return Err(LifecycleError::state(format!(
                "cannot cancel a {} request",
                request.status
            )));
        };

        let owners: Vec<AuditOwner> = self
            .repository
            .list(&[Filter::eq(fields::AUDIT_REQUEST_ID, request_id)])
            .await?;
        for owner in owners.iter().filter(|o| o.status.is_active()) {
            self.repository
                .update::<AuditOwner>(
                    &owner.id,
                    touched(patch_of(json!({ "status": OwnerStatus::Cancelled })), now),
                )
                .await
                .map_err(|e| {
                    LifecycleError::partial_write(
                        &e,
                        self.repository.backend_name(),
                        &[request_id.to_string()],
                    )
                })?;
        }

        info!("[am-03] Audit request {} cancelled", request_id);
        self.refresh_profile_quietly(&cancelled.developer_wallet).await;
        Ok(cancelled)
    }
}

//! # Acceptance Race Regression
//!
//! Concurrent claims on one request must produce exactly one owner, and a
//! claim interleaved with a cancellation must never leave an active owner
//! on a cancelled request.

#[cfg(test)]
mod tests {
    use crate::fixtures::{acceptance, submission, Marketplace};
    use am_03_lifecycle::{AuditLifecycleApi, CancelAuditInput, LifecycleError};
    use futures::future::join_all;
    use shared_types::{AuditOwner, AuditRequest, AuditStatus, OwnerStatus};
    use std::sync::Arc;

    async fn owners_of(market: &Marketplace, request_id: &str) -> Vec<AuditOwner> {
        let repository = am_01_persistence::Repository::new(market.store.clone());
        repository
            .list(&[am_01_persistence::Filter::eq(
                shared_types::fields::AUDIT_REQUEST_ID,
                request_id,
            )])
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_have_one_winner() {
        for round in 0..10 {
            let market = Marketplace::new();
            let request = market
                .lifecycle
                .submit_audit_request(submission(&format!("Race{round}"), "0xdev"))
                .await
                .unwrap();

            let claims = (0..16).map(|i| {
                let lifecycle = Arc::clone(&market.lifecycle);
                let request_id = request.id.clone();
                tokio::spawn(async move {
                    lifecycle
                        .accept_audit_request(&request_id, acceptance(&format!("0xaud{i}"), 1500))
                        .await
                })
            });
            let outcomes: Vec<_> = join_all(claims)
                .await
                .into_iter()
                .map(|joined| joined.unwrap())
                .collect();

            let winners: Vec<&AuditOwner> = outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
            assert_eq!(winners.len(), 1, "round {round}: exactly one claim wins");
            for loser in outcomes.iter().filter_map(|o| o.as_ref().err()) {
                assert!(
                    matches!(loser, LifecycleError::State(_)),
                    "round {round}: losers see a state conflict, got {loser:?}"
                );
            }

            let owners = owners_of(&market, &request.id).await;
            assert_eq!(owners.len(), 1);
            assert_eq!(owners[0].auditor_wallet, winners[0].auditor_wallet);

            let stored: AuditRequest = market.lifecycle.get_audit_request(&request.id).await.unwrap();
            assert_eq!(stored.status, AuditStatus::InProgress);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_claim_racing_cancel_leaves_no_active_owner() {
        for round in 0..20 {
            let market = Marketplace::new();
            let request = market
                .lifecycle
                .submit_audit_request(submission(&format!("Cancel{round}"), "0xdev"))
                .await
                .unwrap();

            let claim = {
                let lifecycle = Arc::clone(&market.lifecycle);
                let request_id = request.id.clone();
                tokio::spawn(async move {
                    lifecycle
                        .accept_audit_request(&request_id, acceptance("0xaudA", 1500))
                        .await
                })
            };
            let cancel = {
                let lifecycle = Arc::clone(&market.lifecycle);
                let request_id = request.id.clone();
                tokio::spawn(async move {
                    lifecycle
                        .cancel_audit_request(&request_id, CancelAuditInput::default())
                        .await
                })
            };
            let (claimed, cancelled) = (claim.await.unwrap(), cancel.await.unwrap());

            let stored: AuditRequest = market.lifecycle.get_audit_request(&request.id).await.unwrap();
            let owners = owners_of(&market, &request.id).await;
            let active = owners.iter().filter(|o| o.status.is_active()).count();

            assert!(cancelled.is_ok(), "round {round}: cancel always applies");
            assert_eq!(stored.status, AuditStatus::Cancelled);
            assert_eq!(active, 0, "round {round}: cancelled request has no active owner");
            if let Err(err) = &claimed {
                assert!(matches!(err, LifecycleError::State(_)), "round {round}: {err:?}");
            }
            assert!(owners.iter().all(|o| o.status == OwnerStatus::Cancelled));
        }
    }
}

//! # Lifecycle Flows
//!
//! Drives the lifecycle service and reads every result back through the
//! query service, the way a developer and an auditor see them.
//!
//! ## Flows Tested:
//!
//! 1. **Submit → Accept → Start → Findings → Complete**: dashboards, stats
//!    and verification agree at every step
//! 2. **Cancellation**: the request leaves the marketplace and the owner is
//!    retired
//! 3. **Collaborator failure**: a failed mint leaves a consistent, listable
//!    request and reports what was written

#[cfg(test)]
mod tests {
    use crate::fixtures::{acceptance, finding, submission, Marketplace};
    use am_02_collaborators::{EvidenceFile, SimulatedNftMinter};
    use am_03_lifecycle::{AuditLifecycleApi, CancelAuditInput, LifecycleError, SubmitResultsInput};
    use am_04_projection::MarketplaceQueryApi;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared_types::{AuditStatus, Collection};

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[tokio::test]
    async fn test_full_audit_flow_is_visible_to_both_sides() {
        let market = Marketplace::new();
        let request = market
            .lifecycle
            .submit_audit_request(submission("Vault", "0xdev"))
            .await
            .unwrap();

        // Anonymous visitors see the new listing.
        let listing = market.queries.marketplace_listing(Default::default(), None).await;
        assert!(!listing.is_degraded());
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.data[0].status, AuditStatus::Available);
        assert_eq!(listing.data[0].progress, 0);

        let owner = market
            .lifecycle
            .accept_audit_request(&request.id, acceptance("0xaudA", 1800))
            .await
            .unwrap();

        // Claimed work disappears for everyone except its auditor.
        let anonymous = market.queries.marketplace_listing(Default::default(), None).await;
        assert!(anonymous.data.is_empty());
        let stranger = market
            .queries
            .marketplace_listing(Default::default(), Some("0xaudB"))
            .await;
        assert!(stranger.data.is_empty());
        let mine = market
            .queries
            .marketplace_listing(Default::default(), Some("0XAUDA"))
            .await;
        assert_eq!(mine.data.len(), 1);
        assert_eq!(mine.data[0].accepted_price, Some(Decimal::new(1800, 0)));

        market.lifecycle.start_audit(&owner.id).await.unwrap();
        market.clock.advance(Duration::days(4));

        let auditor = market.queries.auditor_dashboard("0xaudA").await;
        assert_eq!(auditor.data.cards.len(), 1);
        assert_eq!(auditor.data.cards[0].progress, 40);
        assert_eq!(auditor.data.cards[0].findings_count, None);
        assert_eq!(auditor.data.summary.active, 1);

        market
            .lifecycle
            .create_finding(&request.id, finding("0xaudA", "Reentrancy", "high"))
            .await
            .unwrap();
        market
            .lifecycle
            .create_finding(&request.id, finding("0xaudA", "Unchecked call", "low"))
            .await
            .unwrap();
        let recorded = market
            .lifecycle
            .list_findings(&request.id, Some("0xAUDA"))
            .await
            .unwrap();
        assert_eq!(recorded.len(), 2);

        let result = market
            .lifecycle
            .submit_audit_results(
                &owner.id,
                SubmitResultsInput {
                    findings: vec![
                        json!({"title": "Reentrancy", "severity": "high"}),
                        json!({"title": "Unchecked call", "severity": "low"}),
                    ],
                    notes: Some("Two issues".into()),
                    evidence_files: vec![EvidenceFile {
                        name: "report.pdf".into(),
                        content_type: Some("application/pdf".into()),
                        bytes: b"%PDF-1.7 report".to_vec(),
                    }],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result.severity_breakdown.high, 1);
        assert_eq!(result.severity_breakdown.low, 1);

        // Developer side: card, stats and profile.
        let developer = market.queries.developer_dashboard("0xdev").await;
        assert!(!developer.is_degraded());
        assert_eq!(developer.data.cards.len(), 1);
        let card = &developer.data.cards[0];
        assert_eq!(card.status, AuditStatus::Completed);
        assert_eq!(card.progress, 100);
        assert_eq!(card.findings_count, Some(2));
        assert_eq!(card.price, Decimal::new(1800, 0));
        assert_eq!(developer.data.stats.by_status["Completed"], 1);
        let profile = developer.data.profile.expect("profile refreshed on completion");
        assert_eq!(profile.total_projects, 1);
        assert_eq!(profile.total_spend, Decimal::new(1800, 0));

        // Auditor side: summary and severity totals.
        let auditor = market.queries.auditor_dashboard("0xaudA").await;
        assert_eq!(auditor.data.summary.completed, 1);
        assert_eq!(auditor.data.summary.total_earnings, Decimal::new(1800, 0));
        assert_eq!(auditor.data.severity_totals.high, 1);

        // Public verification with the evidence bundle.
        let verification = market.queries.verification(&request.id).await.unwrap();
        assert!(verification.verified);
        assert!(verification.certificate.is_some());
        assert!(verification.request_nft.is_some());
        assert_eq!(verification.evidence_hashes.len(), 1);
        assert!(verification.evidence.is_some());
        assert!(verification.ipfs_error.is_none());

        // One request NFT, one certificate.
        assert_eq!(market.minter.minted(), 2);
        assert_eq!(market.store.count(Collection::AuditResults), 1);
    }

    #[tokio::test]
    async fn test_stats_cover_every_status() {
        let market = Marketplace::new();
        let open = market
            .lifecycle
            .submit_audit_request(submission("Open", "0xdev"))
            .await
            .unwrap();
        let claimed = market
            .lifecycle
            .submit_audit_request(submission("Claimed", "0xdev"))
            .await
            .unwrap();
        let withdrawn = market
            .lifecycle
            .submit_audit_request(submission("Withdrawn", "0xother"))
            .await
            .unwrap();

        market
            .lifecycle
            .accept_audit_request(&claimed.id, acceptance("0xaudA", 1500))
            .await
            .unwrap();
        market
            .lifecycle
            .cancel_audit_request(&withdrawn.id, CancelAuditInput::default())
            .await
            .unwrap();

        let stats = market.queries.marketplace_stats().await;
        assert!(!stats.is_degraded());
        assert_eq!(stats.data.total, 3);
        assert_eq!(stats.data.by_status["Available"], 1);
        assert_eq!(stats.data.by_status["In Progress"], 1);
        assert_eq!(stats.data.by_status["Cancelled"], 1);
        assert_eq!(stats.data.by_complexity["Medium"], 3);
        assert_eq!(stats.data.total_revenue, Decimal::new(6000, 0));
        assert_eq!(stats.data.average_price, Decimal::new(2000, 0));

        let listing = market.queries.marketplace_listing(Default::default(), None).await;
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.data[0].id, open.id);
    }

    // =============================================================================
    // CANCELLATION
    // =============================================================================

    #[tokio::test]
    async fn test_cancel_in_progress_retires_owner() {
        let market = Marketplace::new();
        let request = market
            .lifecycle
            .submit_audit_request(submission("Bridge", "0xdev"))
            .await
            .unwrap();
        let owner = market
            .lifecycle
            .accept_audit_request(&request.id, acceptance("0xaudA", 1900))
            .await
            .unwrap();

        let cancelled = market
            .lifecycle
            .cancel_audit_request(
                &request.id,
                CancelAuditInput {
                    reason: Some("scope changed".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, AuditStatus::Cancelled);
        assert_eq!(cancelled.cancellation_reason.as_deref(), Some("scope changed"));

        let auditor = market.queries.auditor_dashboard("0xaudA").await;
        assert_eq!(auditor.data.summary.cancelled, 1);
        assert_eq!(auditor.data.summary.active, 0);

        let err = market.lifecycle.start_audit(&owner.id).await.unwrap_err();
        assert!(matches!(err, LifecycleError::State(_)));

        let err = market
            .lifecycle
            .submit_audit_results(&owner.id, SubmitResultsInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::State(_)));

        // Cancelled spend no longer counts.
        let profile = market
            .lifecycle
            .refresh_developer_profile("0xdev")
            .await
            .unwrap();
        assert_eq!(profile.total_spend, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_completed_request_cannot_be_cancelled() {
        let market = Marketplace::new();
        let request = market
            .lifecycle
            .submit_audit_request(submission("Dex", "0xdev"))
            .await
            .unwrap();
        let owner = market
            .lifecycle
            .accept_audit_request(&request.id, acceptance("0xaudA", 1500))
            .await
            .unwrap();
        market
            .lifecycle
            .submit_audit_results(&owner.id, SubmitResultsInput::default())
            .await
            .unwrap();

        let err = market
            .lifecycle
            .cancel_audit_request(&request.id, CancelAuditInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::State(_)));

        let stored = market.lifecycle.get_audit_request(&request.id).await.unwrap();
        assert_eq!(stored.status, AuditStatus::Completed);
    }

    // =============================================================================
    // FAILURES
    // =============================================================================

    #[tokio::test]
    async fn test_failed_mint_leaves_listable_request() {
        let market = Marketplace::with_minter(SimulatedNftMinter::failing());

        let err = market
            .lifecycle
            .submit_audit_request(submission("Oracle", "0xdev"))
            .await
            .unwrap_err();
        let LifecycleError::Upstream {
            collaborator,
            created,
            ..
        } = err
        else {
            panic!("expected upstream error, got {err:?}");
        };
        assert_eq!(collaborator, "nft-minter");
        assert!(!created.is_empty());

        // The request itself was written and stays on the marketplace.
        let listing = market.queries.marketplace_listing(Default::default(), None).await;
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.data[0].nft_token_id, None);
        assert!(listing.data[0].metadata_hash.is_some());
    }

    #[tokio::test]
    async fn test_unavailable_backend_degrades_queries_but_fails_mutations() {
        let market = Marketplace::new();
        market
            .lifecycle
            .submit_audit_request(submission("Lend", "0xdev"))
            .await
            .unwrap();
        market.store.set_unavailable(true);

        let listing = market.queries.marketplace_listing(Default::default(), None).await;
        assert!(listing.is_degraded());
        assert!(listing.data.is_empty());

        let err = market
            .lifecycle
            .submit_audit_request(submission("Lend2", "0xdev"))
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::BackendUnavailable(_)));

        market.store.set_unavailable(false);
        let recovered = market.queries.marketplace_listing(Default::default(), None).await;
        assert!(!recovered.is_degraded());
        assert_eq!(recovered.data.len(), 1);
    }
}

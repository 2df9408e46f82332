//! Marketplace-wide request statistics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::AuditRequest;
use std::collections::BTreeMap;

/// Counts and price totals over a set of audit requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceStats {
    pub total: u64,
    /// Keyed by the persisted status label (`"In Progress"`, ...).
    pub by_status: BTreeMap<String, u64>,
    /// Keyed by the canonical complexity label.
    pub by_complexity: BTreeMap<String, u64>,
    /// Sum of proposed prices.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    /// Mean proposed price, rounded to cents; zero for an empty set.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price: Decimal,
}

pub fn compute_stats(requests: &[AuditRequest]) -> MarketplaceStats {
    let mut stats = MarketplaceStats::default();
    for request in requests {
        stats.total += 1;
        *stats
            .by_status
            .entry(request.status.as_str().to_string())
            .or_default() += 1;
        *stats
            .by_complexity
            .entry(request.complexity.as_str().to_string())
            .or_default() += 1;
        stats.total_revenue += request.proposed_price;
    }
    if stats.total > 0 {
        stats.average_price = (stats.total_revenue / Decimal::from(stats.total)).round_dp(2);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use shared_types::{AuditStatus, Complexity};

    fn request(status: AuditStatus, complexity: Complexity, price: i64) -> AuditRequest {
        let now = Utc::now();
        AuditRequest {
            id: format!("r-{price}"),
            project_name: "P".into(),
            description: String::new(),
            repository_url: "https://example.com/p".into(),
            repository_hash: "0x0".into(),
            complexity,
            proposed_price: Decimal::new(price, 0),
            estimated_duration_days: 5,
            auditor_count: 1,
            developer_wallet: "0xdev".into(),
            status,
            tags: vec![],
            created_at: now,
            updated_at: now,
            start_date: None,
            estimated_completion_date: None,
            smart_contract_id: None,
            nft_id: None,
            ipfs_record_id: None,
            payment_reference: None,
            repository_stats: None,
            estimate: None,
            cancellation_reason: None,
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_status.is_empty());
        assert!(stats.by_complexity.is_empty());
        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.average_price, Decimal::ZERO);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["averagePrice"], 0.0);
        assert_eq!(json["byStatus"], serde_json::json!({}));
    }

    #[test]
    fn test_groups_and_sums() {
        let stats = compute_stats(&[
            request(AuditStatus::Available, Complexity::Low, 1000),
            request(AuditStatus::InProgress, Complexity::High, 2000),
            request(AuditStatus::Available, Complexity::High, 4000),
        ]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status["Available"], 2);
        assert_eq!(stats.by_status["In Progress"], 1);
        assert_eq!(stats.by_complexity["High"], 2);
        assert_eq!(stats.total_revenue, Decimal::new(7000, 0));
        assert_eq!(stats.average_price, Decimal::new(233333, 2));
    }

    proptest! {
        #[test]
        fn prop_status_counts_sum_to_total(prices in proptest::collection::vec(0i64..100_000, 0..40)) {
            let requests: Vec<_> = prices
                .iter()
                .enumerate()
                .map(|(i, p)| request(AuditStatus::ALL[i % 4], Complexity::ALL[i % 4], *p))
                .collect();
            let stats = compute_stats(&requests);

            prop_assert_eq!(stats.total as usize, requests.len());
            prop_assert_eq!(stats.by_status.values().sum::<u64>(), stats.total);
            prop_assert_eq!(stats.by_complexity.values().sum::<u64>(), stats.total);
            prop_assert!(stats.average_price >= Decimal::ZERO);
        }
    }
}

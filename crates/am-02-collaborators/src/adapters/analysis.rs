//! Offline repository analysis and cost estimation.
//!
//! Stand-ins for the GitHub scraper and the AI estimator. Both produce the
//! same shapes the real services would, from deterministic rules.

use crate::domain::CollaboratorError;
use crate::ports::outbound::{CostEstimator, RepositoryAnalyzer};
use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use shared_types::{Complexity, CostEstimate, EstimatorComplexity, RepositoryStats};
use std::collections::HashMap;
use tracing::debug;

/// Returns configured stats per repository URL, or a default.
pub struct StaticRepositoryAnalyzer {
    default_stats: RepositoryStats,
    known: RwLock<HashMap<String, RepositoryStats>>,
    /// Should fail?
    pub should_fail: bool,
}

impl Default for StaticRepositoryAnalyzer {
    fn default() -> Self {
        Self {
            default_stats: RepositoryStats {
                file_count: 10,
                line_count: 1_200,
                complexity: Complexity::Medium,
            },
            known: RwLock::new(HashMap::new()),
            should_fail: false,
        }
    }
}

impl StaticRepositoryAnalyzer {
    pub fn new(default_stats: RepositoryStats) -> Self {
        Self {
            default_stats,
            ..Self::default()
        }
    }

    pub fn with_repository(self, url: &str, stats: RepositoryStats) -> Self {
        self.known.write().insert(url.to_string(), stats);
        self
    }
}

#[async_trait]
impl RepositoryAnalyzer for StaticRepositoryAnalyzer {
    async fn analyze(&self, repository_url: &str) -> Result<RepositoryStats, CollaboratorError> {
        if self.should_fail {
            return Err(CollaboratorError::unavailable("repository-analyzer", "mock failure"));
        }
        if !(repository_url.starts_with("https://") || repository_url.starts_with("http://")) {
            return Err(CollaboratorError::rejected(
                "repository-analyzer",
                format!("not an http(s) repository URL: {repository_url}"),
            ));
        }
        Ok(self
            .known
            .read()
            .get(repository_url)
            .cloned()
            .unwrap_or_else(|| self.default_stats.clone()))
    }
}

/// Source patterns that raise audit risk.
const RISK_PATTERNS: [(&str, &str); 6] = [
    ("delegatecall", "delegatecall to untrusted code"),
    ("selfdestruct", "contract can self-destruct"),
    ("tx.origin", "tx.origin used for authorization"),
    ("assembly", "inline assembly"),
    ("call{value", "low-level value transfer"),
    ("block.timestamp", "timestamp dependence"),
];

/// Rule-based estimator: size sets the tier, risky patterns bump it.
#[derive(Debug, Clone)]
pub struct HeuristicCostEstimator {
    /// Price per audit day.
    pub day_rate: Decimal,
}

impl Default for HeuristicCostEstimator {
    fn default() -> Self {
        Self {
            day_rate: Decimal::new(500, 0),
        }
    }
}

impl HeuristicCostEstimator {
    fn tier(line_count: u64, risks: usize) -> EstimatorComplexity {
        let by_size = match line_count {
            0..=999 => EstimatorComplexity::Simple,
            1_000..=4_999 => EstimatorComplexity::Medium,
            _ => EstimatorComplexity::Complex,
        };
        if risks < 2 {
            return by_size;
        }
        match by_size {
            EstimatorComplexity::Simple => EstimatorComplexity::Medium,
            _ => EstimatorComplexity::Complex,
        }
    }

    fn duration_days(tier: EstimatorComplexity, line_count: u64) -> u32 {
        let base: u32 = match tier {
            EstimatorComplexity::Simple => 3,
            EstimatorComplexity::Medium => 7,
            EstimatorComplexity::Complex => 14,
        };
        let extra = u32::try_from(line_count / 5_000).unwrap_or(u32::MAX);
        base.saturating_add(extra).min(30)
    }
}

#[async_trait]
impl CostEstimator for HeuristicCostEstimator {
    async fn estimate(
        &self,
        code_sample: &str,
        stats: &RepositoryStats,
    ) -> Result<CostEstimate, CollaboratorError> {
        let lowered = code_sample.to_lowercase();
        let risk_factors: Vec<String> = RISK_PATTERNS
            .iter()
            .filter(|(pattern, _)| lowered.contains(pattern))
            .map(|(_, label)| label.to_string())
            .collect();

        let complexity = Self::tier(stats.line_count, risk_factors.len());
        let duration_days = Self::duration_days(complexity, stats.line_count);
        let price = self.day_rate * Decimal::from(duration_days);

        debug!(
            "[am-02] Estimated {:?} / {} days for {} lines",
            complexity, duration_days, stats.line_count
        );
        Ok(CostEstimate {
            complexity,
            duration_days,
            price,
            risk_factors,
        })
    }
}

use shared_types::{AuditResult, SeverityBreakdown};

/// Sum of every result's severity breakdown.
pub fn severity_totals(results: &[AuditResult]) -> SeverityBreakdown {
    results
        .iter()
        .fold(SeverityBreakdown::default(), |mut totals, result| {
            totals.merge(&result.severity_breakdown);
            totals
        })
}

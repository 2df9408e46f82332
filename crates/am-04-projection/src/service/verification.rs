use super::MarketplaceQueries;
use crate::domain::{verification_view, ProjectionError, VerificationView};
use tracing::warn;

impl MarketplaceQueries {
    pub(crate) async fn verify(&self, request_id: &str) -> Result<VerificationView, ProjectionError> {
        let joined = self
            .repository
            .get_request_with_joins(request_id)
            .await?
            .ok_or_else(|| ProjectionError::NotFound(request_id.to_string()))?;
        let certificate = self.repository.result_nft(request_id).await?;

        let evidence = match &joined.result {
            Some(result) => Some(
                self.storage
                    .retrieve_json(&result.ipfs_hash)
                    .await
                    .map_err(|e| {
                        warn!(
                            "[am-04] Evidence {} for {} unreadable: {}",
                            result.ipfs_hash, request_id, e
                        );
                        e.to_string()
                    }),
            ),
            None => None,
        };

        Ok(verification_view(&joined, certificate.as_ref(), evidence))
    }
}

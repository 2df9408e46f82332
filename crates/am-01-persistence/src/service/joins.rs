//! Relationship-following reads.
//!
//! One query per related collection for the whole batch, grouped in memory
//! by `auditRequestId`.

use super::Repository;
use crate::domain::{select_owner, Filter, JoinedRequest, StoreError};
use shared_types::{
    fields, AuditOwner, AuditRequest, AuditResult, IpfsContentKind, IpfsRecord, NftKind,
    NftRecord, SmartContract,
};
use std::collections::HashMap;

impl Repository {
    /// Requests matching `filters`, each with its owner, result, contract,
    /// request NFT and request metadata record.
    pub async fn list_requests_with_joins(
        &self,
        filters: &[Filter],
    ) -> Result<Vec<JoinedRequest>, StoreError> {
        let requests: Vec<AuditRequest> = self.list(filters).await?;
        self.join(requests).await
    }

    /// One request with its joins; `None` when absent.
    pub async fn get_request_with_joins(
        &self,
        id: &str,
    ) -> Result<Option<JoinedRequest>, StoreError> {
        let Some(request) = self.get::<AuditRequest>(id).await? else {
            return Ok(None);
        };
        Ok(self.join(vec![request]).await?.into_iter().next())
    }

    async fn join(&self, requests: Vec<AuditRequest>) -> Result<Vec<JoinedRequest>, StoreError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = requests.iter().map(|r| r.id.clone()).collect();

        let mut owners = group(self.list_for_requests::<AuditOwner>(&ids).await?, |o| {
            &o.audit_request_id
        });
        let mut results = group(self.list_for_requests::<AuditResult>(&ids).await?, |r| {
            &r.audit_request_id
        });
        let mut contracts = group(self.list_for_requests::<SmartContract>(&ids).await?, |c| {
            &c.audit_request_id
        });
        let mut nfts = group(self.list_for_requests::<NftRecord>(&ids).await?, |n| {
            &n.audit_request_id
        });
        let mut ipfs = group(self.list_for_requests::<IpfsRecord>(&ids).await?, |i| {
            &i.audit_request_id
        });

        Ok(requests
            .into_iter()
            .map(|request| {
                let id = request.id.clone();
                let owner = select_owner(owners.remove(&id).unwrap_or_default());
                let result = results.remove(&id).and_then(|rs| rs.into_iter().next());
                let contract = pick(
                    contracts.remove(&id).unwrap_or_default(),
                    request.smart_contract_id.as_deref(),
                    |c| &c.id,
                    |_| true,
                );
                let nft = pick(
                    nfts.remove(&id).unwrap_or_default(),
                    request.nft_id.as_deref(),
                    |n| &n.id,
                    |n| n.kind == NftKind::Request,
                );
                let ipfs = pick(
                    ipfs.remove(&id).unwrap_or_default(),
                    request.ipfs_record_id.as_deref(),
                    |i| &i.id,
                    |i| i.kind == IpfsContentKind::RequestMetadata,
                );
                JoinedRequest {
                    request,
                    owner,
                    result,
                    contract,
                    nft,
                    ipfs,
                }
            })
            .collect())
    }

    /// Result NFT minted for a request, if any.
    pub async fn result_nft(&self, request_id: &str) -> Result<Option<NftRecord>, StoreError> {
        let nfts: Vec<NftRecord> = self
            .list(&[Filter::eq(fields::AUDIT_REQUEST_ID, request_id)])
            .await?;
        Ok(nfts.into_iter().find(|n| n.kind == NftKind::Result))
    }
}

fn group<T>(items: Vec<T>, key: impl Fn(&T) -> &String) -> HashMap<String, Vec<T>> {
    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(key(&item).clone()).or_default().push(item);
    }
    grouped
}

/// The linked record if the request names one, else the first fallback match.
fn pick<T>(
    candidates: Vec<T>,
    linked: Option<&str>,
    id: impl Fn(&T) -> &String,
    fallback: impl Fn(&T) -> bool,
) -> Option<T> {
    let position = linked
        .and_then(|link| candidates.iter().position(|c| id(c) == link))
        .or_else(|| candidates.iter().position(|c| fallback(c)))?;
    candidates.into_iter().nth(position)
}

//! Payment stub. Accepts every charge; no funds move.

use crate::domain::{CollaboratorError, PaymentReceipt, PaymentRequest};
use crate::ports::outbound::PaymentGateway;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

const COLLABORATOR: &str = "payment";

#[derive(Clone, Default)]
pub struct StubPaymentGateway {
    /// Should fail?
    pub should_fail: bool,
}

impl StubPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn charge(&self, request: &PaymentRequest) -> Result<PaymentReceipt, CollaboratorError> {
        if self.should_fail {
            return Err(CollaboratorError::rejected(COLLABORATOR, "payment declined"));
        }
        if request.amount < Decimal::ZERO {
            return Err(CollaboratorError::rejected(COLLABORATOR, "negative amount"));
        }
        debug!(
            "[am-02] Stub charge of {} for {}",
            request.amount, request.audit_request_id
        );
        Ok(PaymentReceipt {
            reference: format!("stub-{}", request.audit_request_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge(amount: i64) -> PaymentRequest {
        PaymentRequest {
            audit_request_id: "r1".into(),
            payer_wallet: "0xdev".into(),
            amount: Decimal::new(amount, 0),
        }
    }

    #[tokio::test]
    async fn test_stub_reference() {
        let receipt = StubPaymentGateway::new().charge(&charge(100)).await.unwrap();
        assert_eq!(receipt.reference, "stub-r1");
    }

    #[tokio::test]
    async fn test_stub_failure() {
        let gateway = StubPaymentGateway { should_fail: true };
        assert!(gateway.charge(&charge(100)).await.is_err());
    }
}

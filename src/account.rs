use anyhow::Result;
use derivative::Derivative;
use primitive_types::H160;
use std::sync::Arc;

/// Capability to sign transaction payloads, typically backed by a wallet
/// extension or an external key store.
///
/// The submission pipeline only hands this through to the chain client; it
/// never signs anything itself.
#[async_trait::async_trait]
pub trait TransactionSigning: Send + Sync {
    /// Produces a signature over the encoded payload. Implementations may
    /// reject, e.g. when the user declines the request.
    async fn sign(&self, payload: Vec<u8>) -> Result<Vec<u8>>;
}

/// Active account and its signing capability.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Capability {
    pub account: H160,
    #[derivative(Debug = "ignore")]
    pub signer: Arc<dyn TransactionSigning>,
}

/// Source of the currently selected account. No capability means no wallet
/// is connected or it is locked, which disables submission entirely.
#[cfg_attr(test, mockall::automock)]
pub trait AccountProviding: Send + Sync {
    fn capability(&self) -> Option<Capability>;
}

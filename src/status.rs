use primitive_types::H256;
use serde::{Deserialize, Serialize};

/// Where a contract call currently is in its submission lifecycle.
///
/// `Idle` and `PendingSignature` are produced locally. The remaining kinds
/// mirror what the chain client reports and are relayed without
/// reinterpretation, so their exact meaning is defined by the network.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxStatus {
    #[default]
    Idle,
    PendingSignature,
    Broadcast,
    InBlock,
    Retracted,
    Finalized,
    Dropped,
    Invalid,
}

impl TxStatus {
    /// Whether the chain client can still report further transitions.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Finalized | Self::Dropped | Self::Invalid)
    }

    /// True from the signature request up to finality.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::PendingSignature | Self::Broadcast | Self::InBlock | Self::Retracted
        )
    }
}

/// Progress snapshot of a submitted call as last reported by the chain
/// client.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxProgress {
    pub status: TxStatus,
    pub tx_hash: Option<H256>,
    pub block_hash: Option<H256>,
    pub error: Option<String>,
}

impl TxProgress {
    pub fn new(status: TxStatus) -> Self {
        Self {
            status,
            tx_hash: None,
            block_hash: None,
            error: None,
        }
    }
}

/// The status/result pair observers read as one unit.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TxState {
    pub status: TxStatus,
    pub result: Option<TxProgress>,
}

//! Contract call transaction lifecycle: dry run a call to price its gas,
//! sign it with an externally supplied capability, broadcast it and relay
//! the network's inclusion reports into one observable status/result view.
//!
//! [`submission::ContractTx`] is the entry point. The collaborators it
//! coordinates (account provider, method resolver, simulation service,
//! chain client) are traits injected at construction, so the pipeline works
//! against any node or wallet backend that implements them.

pub mod account;
pub mod contract;
pub mod simulation;
pub mod status;
pub mod submission;

pub use crate::{
    status::{TxProgress, TxState, TxStatus},
    submission::ContractTx,
};

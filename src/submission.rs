use crate::{
    account::{AccountProviding, Capability},
    contract::{CallOptions, MethodResolving, ResolvedCall},
    simulation::{SimulationError, Simulator},
    status::{TxProgress, TxState, TxStatus},
};
use ethabi::Token;
use futures::stream::{BoxStream, StreamExt};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The signing capability declined, e.g. the user rejected the request.
    #[error("signature request declined: {0}")]
    SignatureDeclined(String),
    /// Broadcasting the signed transaction failed.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Client able to turn a resolved call into a signed, submitted transaction.
///
/// The returned stream yields one progress snapshot per network reported
/// milestone, in report order, and ends when the client stops reporting.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TransactionSubmitting: Send + Sync {
    async fn sign_and_send(
        &self,
        call: ResolvedCall,
        args: Vec<Token>,
        options: CallOptions,
        capability: Capability,
    ) -> Result<BoxStream<'static, TxProgress>, SubmissionError>;
}

/// Observer invoked once per chain reported progress event.
pub type ProgressCallback = Box<dyn FnMut(&TxProgress) + Send>;

/// Drives the submission lifecycle of one contract method and keeps the
/// shared status/result view consistent for whoever is watching.
///
/// Concurrent [`Self::submit`] invocations run independent pipelines but
/// share the single status/result slot; whichever pipeline reports last
/// wins. [`Self::reset`] rewrites the slot without cancelling in-flight
/// pipelines, so a late report from an earlier invocation may overwrite it
/// again.
pub struct ContractTx {
    contract: Option<Arc<dyn MethodResolving>>,
    method: String,
    accounts: Arc<dyn AccountProviding>,
    simulator: Simulator,
    submitter: Arc<dyn TransactionSubmitting>,
    state: Mutex<TxState>,
    updates: watch::Sender<TxState>,
    // Keeps the channel open while no external observer is subscribed.
    _observer: watch::Receiver<TxState>,
}

impl ContractTx {
    pub fn new(
        contract: Option<Arc<dyn MethodResolving>>,
        method: impl Into<String>,
        accounts: Arc<dyn AccountProviding>,
        simulator: Simulator,
        submitter: Arc<dyn TransactionSubmitting>,
    ) -> Self {
        let (updates, observer) = watch::channel(TxState::default());
        Self {
            contract,
            method: method.into(),
            accounts,
            simulator,
            submitter,
            state: Mutex::new(TxState::default()),
            updates,
            _observer: observer,
        }
    }

    pub fn status(&self) -> TxStatus {
        self.state.lock().unwrap().status
    }

    /// Latest progress snapshot. Only ever set by an invocation that passed
    /// simulation.
    pub fn result(&self) -> Option<TxProgress> {
        self.state.lock().unwrap().result.clone()
    }

    /// Stream of state snapshots: the current one, then every update. An
    /// observer that lags only sees the newest state, not every
    /// intermediate one.
    pub fn state_stream(&self) -> WatchStream<TxState> {
        WatchStream::new(self.updates.subscribe())
    }

    /// Clears the result and forces the status back to `Idle`.
    pub fn reset(&self) {
        self.update_state(|state| *state = TxState::default());
    }

    /// Simulates, signs and submits one invocation of the bound method.
    ///
    /// A missing contract handle, account or signer makes this a complete
    /// no-op. All failures are handled here: they are reported through
    /// `tracing` and the status falls back to `Idle`; nothing is returned
    /// to the caller. Progress is observable through [`Self::status`],
    /// [`Self::result`], [`Self::state_stream`] and the optional
    /// `callback`, which fires once per chain reported milestone in report
    /// order.
    ///
    /// Resolves once the chain client stops reporting progress.
    pub async fn submit(
        &self,
        args: Vec<Token>,
        mut options: CallOptions,
        mut callback: Option<ProgressCallback>,
    ) {
        let contract = match &self.contract {
            Some(contract) => contract,
            None => return,
        };
        let capability = match self.accounts.capability() {
            Some(capability) => capability,
            None => return,
        };

        let call = match contract.resolve(&self.method) {
            Some(call) => call,
            None => {
                tracing::error!(
                    "'{}' not found on contract {:?}",
                    self.method,
                    contract.address()
                );
                return;
            }
        };

        let simulation = match self.simulator.simulate(&call, &args, &options).await {
            Ok(simulation) => simulation,
            Err(SimulationError::Reverted(reason)) => {
                tracing::warn!("dry run of '{}' reverted: {}", self.method, reason);
                return;
            }
            Err(err) => {
                tracing::error!("dry run of '{}' failed: {:?}", self.method, err);
                self.update_state(|state| state.status = TxStatus::Idle);
                return;
            }
        };

        self.update_state(|state| state.status = TxStatus::PendingSignature);
        options.gas_limit.get_or_insert(simulation.gas_required);

        let mut progress = match self
            .submitter
            .sign_and_send(call, args, options, capability)
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                tracing::error!("submitting '{}' failed: {:?}", self.method, err);
                self.update_state(|state| state.status = TxStatus::Idle);
                return;
            }
        };

        while let Some(report) = progress.next().await {
            self.update_state(|state| {
                state.status = report.status;
                state.result = Some(report.clone());
            });
            if let Some(callback) = callback.as_mut() {
                callback(&report);
            }
        }
    }

    fn update_state(&self, update: impl FnOnce(&mut TxState)) {
        let mut state = self.state.lock().unwrap();
        update(&mut state);
        let _ = self.updates.send(state.clone());
    }
}

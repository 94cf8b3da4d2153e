use crate::contract::{CallOptions, ResolvedCall};
use anyhow::Result;
use ethabi::Token;
use primitive_types::U256;
use std::sync::Arc;
use thiserror::Error;

/// Raw response of the remote dry run endpoint.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimulationResponse {
    /// Gas the node reported the execution to require.
    pub gas_required: U256,
    pub outcome: ExecutionOutcome,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExecutionOutcome {
    Success { return_data: Vec<u8> },
    Reverted { reason: String },
}

/// Remote endpoint able to evaluate a contract call without committing it.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CallSimulating: Send + Sync {
    async fn simulate(
        &self,
        call: ResolvedCall,
        args: Vec<Token>,
        options: CallOptions,
    ) -> Result<SimulationResponse>;
}

/// Successful dry run of a contract call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Simulation {
    pub gas_required: U256,
    pub return_data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum SimulationError {
    /// The node evaluated the call and the contract itself reported failure.
    #[error("simulated execution reverted: {0}")]
    Reverted(String),
    /// The dry run round trip failed.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Evaluates a call against current chain state to price its gas and catch
/// reverts before any funds or signature are spent.
pub struct Simulator {
    service: Arc<dyn CallSimulating>,
}

impl Simulator {
    pub fn new(service: Arc<dyn CallSimulating>) -> Self {
        Self { service }
    }

    /// A gas estimate is only returned when the simulated execution
    /// succeeded; there is no partial credit for a reverted call.
    pub async fn simulate(
        &self,
        call: &ResolvedCall,
        args: &[Token],
        options: &CallOptions,
    ) -> Result<Simulation, SimulationError> {
        let response = self
            .service
            .simulate(call.clone(), args.to_vec(), options.clone())
            .await?;
        match response.outcome {
            ExecutionOutcome::Success { return_data } => Ok(Simulation {
                gas_required: response.gas_required,
                return_data,
            }),
            ExecutionOutcome::Reverted { reason } => Err(SimulationError::Reverted(reason)),
        }
    }
}

use anyhow::{Context, Result};
use ethabi::Token;
use primitive_types::{H160, U256};

/// Caller supplied configuration for a single contract call.
///
/// A gas limit left unset is filled in from the dry run; every other field
/// passes through to the chain client untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallOptions {
    pub gas_limit: Option<U256>,
    pub gas_price: Option<U256>,
    pub value: Option<U256>,
    pub nonce: Option<U256>,
}

/// Calling metadata for one method of a deployed contract.
#[derive(Clone, Debug)]
pub struct ResolvedCall {
    pub contract: H160,
    pub function: ethabi::Function,
}

impl ResolvedCall {
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Selector prefixed calldata for this call.
    pub fn encode_args(&self, args: &[Token]) -> Result<Vec<u8>> {
        self.function
            .encode_input(args)
            .context("failed to encode call arguments")
    }
}

/// The view of a deployed contract the submission pipeline needs: where it
/// lives and whether a method exists on its ABI.
#[cfg_attr(test, mockall::automock)]
pub trait MethodResolving: Send + Sync {
    fn address(&self) -> H160;

    /// Calling metadata for `name`, or `None` when the ABI has no such
    /// method.
    fn resolve(&self, name: &str) -> Option<ResolvedCall>;
}

/// ABI backed handle to a deployed contract.
pub struct DeployedContract {
    address: H160,
    abi: ethabi::Contract,
}

impl DeployedContract {
    pub fn new(address: H160, abi: ethabi::Contract) -> Self {
        Self { address, abi }
    }

    /// Parses the raw ABI JSON of the deployed code.
    pub fn from_abi_json(address: H160, json: &[u8]) -> Result<Self> {
        let abi = ethabi::Contract::load(json).context("invalid contract ABI")?;
        Ok(Self::new(address, abi))
    }
}

impl MethodResolving for DeployedContract {
    fn address(&self) -> H160 {
        self.address
    }

    fn resolve(&self, name: &str) -> Option<ResolvedCall> {
        let function = self.abi.function(name).ok()?;
        Some(ResolvedCall {
            contract: self.address,
            function: function.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    pub const TOKEN_ABI: &str = r#"[
        {
            "type": "function",
            "name": "transfer",
            "inputs": [
                { "name": "to", "type": "address" },
                { "name": "value", "type": "uint256" }
            ],
            "outputs": [{ "name": "", "type": "bool" }],
            "stateMutability": "nonpayable"
        }
    ]"#;

    pub fn token_contract() -> DeployedContract {
        DeployedContract::from_abi_json(H160::from_low_u64_be(42), TOKEN_ABI.as_bytes()).unwrap()
    }

    pub fn transfer_call() -> ResolvedCall {
        token_contract().resolve("transfer").unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::{testutil::*, *};
    use hex_literal::hex;

    #[test]
    fn resolves_existing_method() {
        let call = token_contract().resolve("transfer").unwrap();
        assert_eq!(call.name(), "transfer");
        assert_eq!(call.contract, H160::from_low_u64_be(42));
        assert_eq!(call.function.inputs.len(), 2);
    }

    #[test]
    fn missing_method_resolves_to_none() {
        assert!(token_contract().resolve("approve").is_none());
    }

    #[test]
    fn encodes_selector_prefixed_calldata() {
        let call = transfer_call();
        let data = call
            .encode_args(&[Token::Address(H160::zero()), Token::Uint(1u64.into())])
            .unwrap();
        assert_eq!(data[..4], hex!("a9059cbb"));
        assert_eq!(data.len(), 4 + 2 * 32);
    }

    #[test]
    fn argument_mismatch_fails_encoding() {
        assert!(transfer_call().encode_args(&[Token::Uint(1u64.into())]).is_err());
    }

    #[test]
    fn rejects_malformed_abi() {
        assert!(DeployedContract::from_abi_json(H160::zero(), b"not an abi").is_err());
    }
}

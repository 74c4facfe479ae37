//! Accounts derived from a private key, bound to a chain and a gas policy.

use crate::ClientError;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, B512, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use std::fmt;

/// Gas limit applied to every write call unless overridden.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Transaction parameters attached to every call an [`Account`] submits.
///
/// The nonce stays unset by default and is resolved by the provider at
/// submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxAuthorization {
    pub chain_id: u64,
    pub nonce: Option<u64>,
    /// Native currency sent along (in wei)
    pub value: U256,
    /// Gas limit (in units)
    pub gas_limit: u64,
    /// Legacy gas price (in wei)
    pub gas_price: u128,
}

impl TxAuthorization {
    pub const fn new(chain_id: u64, gas_price: u128) -> Self {
        Self {
            chain_id,
            nonce: None,
            value: U256::ZERO,
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price,
        }
    }

    /// Override the gas limit.
    pub const fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Override the native value sent with each call.
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Stamp these parameters onto `request`, sent from `from`.
    pub fn apply(&self, from: Address, request: TransactionRequest) -> TransactionRequest {
        let request = request
            .with_from(from)
            .with_chain_id(self.chain_id)
            .with_value(self.value)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price);

        match self.nonce {
            Some(nonce) => request.with_nonce(nonce),
            None => request,
        }
    }
}

/// A signing account. Immutable once derived.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
    public_key: B512,
    address: Address,
    authorization: TxAuthorization,
}

impl Account {
    /// Derive an account from a hex private key (with or without `0x`).
    pub fn derive(private_key: &str, authorization: TxAuthorization) -> Result<Self, ClientError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))?;

        // Uncompressed SEC1 point without the 0x04 tag.
        let point = signer.credential().verifying_key().to_encoded_point(false);
        let public_key = B512::from_slice(&point.as_bytes()[1..]);
        let address = signer.address();

        Ok(Self {
            signer,
            public_key,
            address,
            authorization,
        })
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub const fn public_key(&self) -> B512 {
        self.public_key
    }

    pub const fn authorization(&self) -> &TxAuthorization {
        &self.authorization
    }

    pub const fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Prepare `request` to be sent and signed by this account.
    pub fn authorize(&self, request: TransactionRequest) -> TransactionRequest {
        self.authorization.apply(self.address, request)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("authorization", &self.authorization)
            .finish_non_exhaustive()
    }
}

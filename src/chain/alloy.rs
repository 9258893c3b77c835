// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`ChainClient`] over an alloy provider

use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::{ChainClient, FeeData};
use crate::config::constants::timing::RECEIPT_TIMEOUT;
use crate::errors::ChainError;
use crate::mint::{GasFee, MintCall};
use crate::provider::EndpointPool;

/// Chain client backed by a type-erased alloy provider
#[derive(Clone)]
pub struct AlloyChainClient {
    provider: DynProvider,
}

impl AlloyChainClient {
    /// Wrap an existing provider
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// Read-only client over the pool
    pub fn read_only(pool: &EndpointPool) -> Self {
        Self::new(pool.connect_read())
    }

    /// Client over the pool that signs with `signer`
    pub fn with_signer(pool: &EndpointPool, signer: PrivateKeySigner) -> Self {
        Self::new(pool.connect_signer(signer))
    }
}

fn to_request(call: &MintCall) -> TransactionRequest {
    let mut request = TransactionRequest::default()
        .from(call.from)
        .to(call.to)
        .input(TransactionInput::new(call.input.clone()))
        .value(call.value);

    if let Some(gas_limit) = call.gas_limit {
        request = request.gas_limit(gas_limit);
    }

    match call.fee {
        Some(GasFee::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        }) => request
            .max_fee_per_gas(max_fee_per_gas)
            .max_priority_fee_per_gas(max_priority_fee_per_gas),
        Some(GasFee::Legacy { gas_price }) => request.gas_price(gas_price),
        None => request,
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ChainError::call_failed("eth_getBalance", e))
    }

    async fn fee_data(&self) -> Result<FeeData, ChainError> {
        let (eip1559, gas_price) = tokio::join!(
            self.provider.estimate_eip1559_fees(),
            self.provider.get_gas_price()
        );

        match (eip1559, gas_price) {
            (Err(fee_history), Err(gas_price)) => {
                warn!(
                    %fee_history,
                    %gas_price,
                    "No fee data from the network, falling back to the fee floor"
                );
                Ok(FeeData::default())
            }
            (eip1559, gas_price) => {
                let eip1559 = eip1559.ok();
                Ok(FeeData {
                    max_fee_per_gas: eip1559.as_ref().map(|fees| fees.max_fee_per_gas),
                    max_priority_fee_per_gas: eip1559.as_ref().map(|fees| fees.max_priority_fee_per_gas),
                    gas_price: gas_price.ok(),
                })
            }
        }
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        let request = TransactionRequest::default()
            .to(to)
            .input(TransactionInput::new(input));
        self.provider
            .call(request)
            .await
            .map_err(|e| ChainError::call_failed("eth_call", e))
    }

    async fn estimate_gas(&self, call: &MintCall) -> Result<u64, ChainError> {
        self.provider
            .estimate_gas(to_request(call))
            .await
            .map_err(|e| ChainError::call_failed("eth_estimateGas", e))
    }

    async fn send_transaction(&self, call: &MintCall) -> Result<TxHash, ChainError> {
        let pending = self
            .provider
            .send_transaction(to_request(call))
            .await
            .map_err(|e| ChainError::call_failed("eth_sendRawTransaction", e))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<bool, ChainError> {
        let pending = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash);
        let receipt = tokio::time::timeout(RECEIPT_TIMEOUT, pending.get_receipt())
            .await
            .map_err(|_| {
                ChainError::from_message(
                    "eth_getTransactionReceipt",
                    format!("no receipt within {}s", RECEIPT_TIMEOUT.as_secs()),
                )
            })?
            .map_err(|e| ChainError::call_failed("eth_getTransactionReceipt", e))?;

        debug!(
            tx_hash = %tx_hash,
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Receipt received"
        );

        Ok(ReceiptResponse::status(&receipt))
    }
}

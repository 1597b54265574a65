//! Unsigned transaction request construction.
//!
//! The builder is a pure transformation over two injected collaborators: a
//! [`ContractRegistry`] that resolves a contract on a chain and a
//! [`CallEncoder`] that produces call data from the resolved ABI. It owns no
//! mutable state, never retries, and is safe to share across tasks.

use std::sync::Arc;

use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{BuildError, EncodingError};
use crate::models::{
    CallSpec, ChainReference, TransactionParams, UnsignedTransactionRequest, EIP155_NAMESPACE,
    SEND_TRANSACTION_METHOD,
};
use crate::registry::ContractRegistry;

/// Encodes a function invocation against an ABI.
///
/// Must be deterministic: identical inputs produce identical bytes.
pub trait CallEncoder: Send + Sync {
    fn encode(
        &self,
        abi: &JsonAbi,
        function_name: &str,
        args: &[Value],
    ) -> Result<Bytes, EncodingError>;
}

#[derive(Clone)]
pub struct TxRequestBuilder {
    registry: Arc<dyn ContractRegistry>,
    encoder: Arc<dyn CallEncoder>,
    namespace: String,
}

impl TxRequestBuilder {
    pub fn new(registry: Arc<dyn ContractRegistry>, encoder: Arc<dyn CallEncoder>) -> Self {
        Self {
            registry,
            encoder,
            namespace: EIP155_NAMESPACE.to_string(),
        }
    }

    /// Use a chain namespace other than `eip155` in `chainIdentifier`.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn build(
        &self,
        contract_name: &str,
        chain: ChainReference,
        call: CallSpec,
    ) -> Result<UnsignedTransactionRequest, BuildError> {
        self.try_build(contract_name, chain, call).map_err(|err| {
            warn!(
                contract = contract_name,
                chain_id = chain.id(),
                stage = err.stage(),
                error = %err,
                "transaction request build failed"
            );
            err
        })
    }

    fn try_build(
        &self,
        contract_name: &str,
        chain: ChainReference,
        call: CallSpec,
    ) -> Result<UnsignedTransactionRequest, BuildError> {
        // One resolution feeds both `to` and the encoding ABI.
        let contract = self.registry.resolve(contract_name, chain)?;
        let data = self
            .encoder
            .encode(&contract.abi, &call.function_name, &call.args)?;

        debug!(
            contract = contract_name,
            chain_id = chain.id(),
            function = %call.function_name,
            to = %contract.address,
            data_len = data.len(),
            "built unsigned transaction request"
        );

        Ok(UnsignedTransactionRequest {
            chain_identifier: chain.identifier(&self.namespace),
            method: SEND_TRANSACTION_METHOD.to_string(),
            params: TransactionParams {
                abi: contract.abi,
                to: contract.address,
                data,
                args: call.args,
            },
        })
    }
}

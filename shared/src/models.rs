use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// JSON-RPC method a wallet uses to submit the transaction
pub const SEND_TRANSACTION_METHOD: &str = "eth_sendTransaction";

/// Chain namespace for EVM networks in `namespace:chainId` identifiers
pub const EIP155_NAMESPACE: &str = "eip155";

// ═══════════════════════════════════════════════════════════════════════════
// CHAINS AND CONTRACTS
// ═══════════════════════════════════════════════════════════════════════════

/// Numeric id of a target blockchain network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainReference(pub u64);

impl ChainReference {
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Formats the chain as `namespace:chainId`, e.g. `eip155:31337`.
    pub fn identifier(self, namespace: &str) -> String {
        format!("{}:{}", namespace, self.0)
    }
}

impl std::fmt::Display for ChainReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A contract resolved on one chain: where it lives and what it exposes
#[derive(Debug, Clone, PartialEq)]
pub struct ContractReference {
    pub name: String,
    pub address: Address,
    pub abi: JsonAbi,
}

/// Function invocation requested by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSpec {
    pub function_name: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl CallSpec {
    pub fn new(function_name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            function_name: function_name.into(),
            args,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OUTPUT
// ═══════════════════════════════════════════════════════════════════════════

/// Unsigned transaction handed to a wallet or signing client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransactionRequest {
    pub chain_identifier: String,
    pub method: String,
    pub params: TransactionParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionParams {
    pub abi: JsonAbi,
    #[serde(serialize_with = "serialize_checksummed")]
    pub to: Address,
    /// Selector followed by the encoded arguments, serialized as 0x-hex.
    pub data: Bytes,
    /// Arguments exactly as the caller supplied them.
    pub args: Vec<Value>,
}

/// EIP-55 mixed-case form, matching how deployment manifests record addresses.
fn serialize_checksummed<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&address.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chain_identifier_format() {
        assert_eq!(ChainReference(31337).identifier(EIP155_NAMESPACE), "eip155:31337");
        assert_eq!(ChainReference(1).identifier("eip155"), "eip155:1");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = UnsignedTransactionRequest {
            chain_identifier: "eip155:1".to_string(),
            method: SEND_TRANSACTION_METHOD.to_string(),
            params: TransactionParams {
                abi: JsonAbi::default(),
                to: "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap(),
                data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
                args: vec![json!(3600)],
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["chainIdentifier"], "eip155:1");
        assert_eq!(value["method"], "eth_sendTransaction");
        assert_eq!(value["params"]["data"], "0xdeadbeef");
        assert_eq!(value["params"]["args"], json!([3600]));
        assert!(value["params"]["abi"].is_array());
        assert_eq!(value["params"]["to"], "0x5FbDB2315678afecb367f032d93F642f64180aa3");

        let back: UnsignedTransactionRequest = serde_json::from_value(value).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_call_spec_args_default_empty() {
        let call: CallSpec = serde_json::from_value(json!({ "function_name": "drawWinner" })).unwrap();
        assert!(call.args.is_empty());
    }
}

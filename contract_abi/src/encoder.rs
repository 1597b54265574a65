//! Solidity call-data encoding for JSON ABIs.

use alloy_dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::Bytes;
use serde_json::Value;
use shared::{CallEncoder, EncodingError};
use tracing::trace;

use crate::convert::{json_to_sol, string_integer_count};

/// Canonical signatures (e.g. `createLottery(uint256)`) of every overload of `name`.
pub fn function_signatures(abi: &JsonAbi, name: &str) -> Vec<String> {
    abi.function(name)
        .map(|overloads| overloads.iter().map(Function::signature).collect())
        .unwrap_or_default()
}

/// EVM call encoder: selector followed by the ABI-encoded arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbiEncoder;

impl AbiEncoder {
    pub fn new() -> Self {
        Self
    }

    fn convert_args(function: &Function, args: &[Value]) -> Result<Vec<DynSolValue>, String> {
        function
            .inputs
            .iter()
            .zip(args)
            .enumerate()
            .map(|(i, (param, arg))| {
                let ty: DynSolType = param
                    .resolve()
                    .map_err(|e| format!("unsupported parameter type {}: {}", param.ty, e))?;
                let label = if param.name.is_empty() {
                    format!("argument {}", i)
                } else {
                    format!("argument {} ({})", i, param.name)
                };
                json_to_sol(&ty, arg).map_err(|e| format!("{}: {}", label, e))
            })
            .collect()
    }
}

impl CallEncoder for AbiEncoder {
    fn encode(
        &self,
        abi: &JsonAbi,
        function_name: &str,
        args: &[Value],
    ) -> Result<Bytes, EncodingError> {
        let overloads = abi
            .function(function_name)
            .ok_or_else(|| EncodingError::UnknownFunction {
                function: function_name.to_string(),
            })?;

        let candidates: Vec<&Function> = overloads
            .iter()
            .filter(|f| f.inputs.len() == args.len())
            .collect();

        if candidates.is_empty() {
            return Err(EncodingError::ArgumentMismatch {
                function: function_name.to_string(),
                reason: format!(
                    "got {} arguments, expected one of: {}",
                    args.len(),
                    function_signatures(abi, function_name).join(", ")
                ),
            });
        }

        let mut first_failure = None;
        let mut matches = Vec::new();
        for function in candidates {
            match Self::convert_args(function, args) {
                Ok(values) => {
                    let looseness: usize = function
                        .inputs
                        .iter()
                        .zip(args)
                        .filter_map(|(param, arg)| {
                            param.resolve().ok().map(|ty| string_integer_count(&ty, arg))
                        })
                        .sum();
                    matches.push((function, values, looseness));
                }
                Err(reason) => {
                    first_failure.get_or_insert_with(|| format!("{}: {}", function.signature(), reason));
                }
            }
        }

        let Some(best) = matches.iter().map(|(_, _, looseness)| *looseness).min() else {
            return Err(EncodingError::ArgumentMismatch {
                function: function_name.to_string(),
                reason: first_failure.unwrap_or_default(),
            });
        };
        matches.retain(|(_, _, looseness)| *looseness == best);

        if matches.len() > 1 {
            let signatures: Vec<String> = matches.iter().map(|(f, _, _)| f.signature()).collect();
            return Err(EncodingError::ArgumentMismatch {
                function: function_name.to_string(),
                reason: format!("ambiguous call, matches {}", signatures.join(", ")),
            });
        }

        let (function, values, _) = matches.remove(0);
        let data = function
            .abi_encode_input(&values)
            .map_err(|e| EncodingError::Encode {
                function: function_name.to_string(),
                reason: format!("{}: {}", function.signature(), e),
            })?;
        trace!(
            signature = %function.signature(),
            data_len = data.len(),
            "encoded function call"
        );
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{keccak256, U256};
    use serde_json::json;

    fn abi() -> JsonAbi {
        serde_json::from_value(json!([
            {
                "type": "function",
                "name": "createLottery",
                "inputs": [{ "name": "duration", "type": "uint256" }],
                "outputs": [],
                "stateMutability": "nonpayable"
            },
            {
                "type": "function",
                "name": "transfer",
                "inputs": [
                    { "name": "to", "type": "address" },
                    { "name": "amount", "type": "uint256" }
                ],
                "outputs": [{ "name": "", "type": "bool" }],
                "stateMutability": "nonpayable"
            },
            {
                "type": "function",
                "name": "enter",
                "inputs": [{ "name": "ticket", "type": "uint256" }],
                "outputs": [],
                "stateMutability": "payable"
            },
            {
                "type": "function",
                "name": "enter",
                "inputs": [{ "name": "referrer", "type": "address" }],
                "outputs": [],
                "stateMutability": "payable"
            },
            {
                "type": "function",
                "name": "stake",
                "inputs": [{ "name": "amount", "type": "uint256" }],
                "outputs": [],
                "stateMutability": "payable"
            },
            {
                "type": "function",
                "name": "stake",
                "inputs": [{ "name": "amount", "type": "uint64" }],
                "outputs": [],
                "stateMutability": "payable"
            },
            {
                "type": "function",
                "name": "drawWinner",
                "inputs": [],
                "outputs": [],
                "stateMutability": "nonpayable"
            }
        ]))
        .unwrap()
    }

    fn selector(signature: &str) -> Vec<u8> {
        keccak256(signature.as_bytes())[..4].to_vec()
    }

    #[test]
    fn test_create_lottery_call_data() {
        let data = AbiEncoder.encode(&abi(), "createLottery", &[json!(3600)]).unwrap();

        let mut expected = selector("createLottery(uint256)");
        expected.extend_from_slice(&U256::from(3600u64).to_be_bytes::<32>());
        assert_eq!(data.to_vec(), expected);
    }

    #[test]
    fn test_erc20_transfer_selector() {
        let data = AbiEncoder
            .encode(
                &abi(),
                "transfer",
                &[json!("0x1234567890123456789012345678901234567890"), json!("1000000")],
            )
            .unwrap();

        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[16..36], &[0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90]);
    }

    #[test]
    fn test_no_arg_function() {
        let data = AbiEncoder.encode(&abi(), "drawWinner", &[]).unwrap();
        assert_eq!(data.to_vec(), selector("drawWinner()"));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let first = AbiEncoder.encode(&abi(), "createLottery", &[json!(60)]).unwrap();
        let second = AbiEncoder.encode(&abi(), "createLottery", &[json!(60)]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overload_selected_by_argument_type() {
        let by_ticket = AbiEncoder.encode(&abi(), "enter", &[json!(7)]).unwrap();
        assert_eq!(&by_ticket[..4], selector("enter(uint256)").as_slice());

        let by_referrer = AbiEncoder
            .encode(&abi(), "enter", &[json!("0x5FbDB2315678afecb367f032d93F642f64180aa3")])
            .unwrap();
        assert_eq!(&by_referrer[..4], selector("enter(address)").as_slice());
        assert_eq!(&by_referrer[16..], &[0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64, 0x2f, 0x64, 0x18, 0x0a, 0xa3]);
    }

    #[test]
    fn test_short_hex_string_only_fits_uint_overload() {
        let data = AbiEncoder.encode(&abi(), "enter", &[json!("0x10")]).unwrap();
        assert_eq!(&data[..4], selector("enter(uint256)").as_slice());
        assert_eq!(data[35], 0x10);
    }

    #[test]
    fn test_ambiguous_overloads_rejected() {
        let err = AbiEncoder.encode(&abi(), "stake", &[json!(5)]).unwrap_err();
        match err {
            EncodingError::ArgumentMismatch { function, reason } => {
                assert_eq!(function, "stake");
                assert!(reason.contains("stake(uint256)"), "{}", reason);
                assert!(reason.contains("stake(uint64)"), "{}", reason);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_function() {
        let err = AbiEncoder.encode(&abi(), "foo", &[]).unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnknownFunction {
                function: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_arity_mismatch_lists_signatures() {
        let err = AbiEncoder.encode(&abi(), "createLottery", &[]).unwrap_err();
        match err {
            EncodingError::ArgumentMismatch { function, reason } => {
                assert_eq!(function, "createLottery");
                assert!(reason.contains("createLottery(uint256)"), "{}", reason);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_type_mismatch() {
        let err = AbiEncoder
            .encode(&abi(), "createLottery", &[json!("one hour")])
            .unwrap_err();
        match err {
            EncodingError::ArgumentMismatch { function, reason } => {
                assert_eq!(function, "createLottery");
                assert!(reason.contains("createLottery(uint256)"), "{}", reason);
                assert!(reason.contains("argument 0 (duration)"), "{}", reason);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_function_signatures() {
        let mut sigs = function_signatures(&abi(), "enter");
        sigs.sort();
        assert_eq!(sigs, vec!["enter(address)", "enter(uint256)"]);
        assert!(function_signatures(&abi(), "missing").is_empty());
    }
}

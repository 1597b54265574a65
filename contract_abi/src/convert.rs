//! Strict conversion of JSON call arguments into ABI values.
//!
//! Only conversions the Solidity type system itself defines are accepted:
//! integers may arrive as JSON integers or as strings (decimal, or `0x` hex
//! for unsigned types) so that values beyond the JSON-safe range keep full
//! precision. Floats, numeric strings for `bool`, and bare hex without a `0x`
//! prefix are rejected.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{hex, Address, B256, I256, U256};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub message: String,
    pub context: Option<String>,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }

    /// Prefix the location with an outer path segment, e.g. `[2]` or `.1`.
    fn within(mut self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        self.context = Some(match self.context.take() {
            Some(inner) => format!("{}{}", segment, inner),
            None => segment,
        });
        self
    }
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ctx) = &self.context {
            write!(f, "{}: {}", ctx, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ConversionError {}

pub fn json_to_sol(ty: &DynSolType, value: &Value) -> Result<DynSolValue, ConversionError> {
    match ty {
        DynSolType::Bool => value
            .as_bool()
            .map(DynSolValue::Bool)
            .ok_or_else(|| mismatch(ty, value)),
        DynSolType::Uint(bits) => parse_uint(value, *bits).map(|v| DynSolValue::Uint(v, *bits)),
        DynSolType::Int(bits) => parse_int(value, *bits).map(|v| DynSolValue::Int(v, *bits)),
        DynSolType::Address => parse_address(value).map(DynSolValue::Address),
        DynSolType::Bytes => parse_hex(ty, value).map(DynSolValue::Bytes),
        DynSolType::FixedBytes(size) => {
            let bytes = parse_hex(ty, value)?;
            if bytes.len() != *size {
                return Err(ConversionError::new(format!(
                    "expected {} bytes for bytes{}, got {}",
                    size,
                    size,
                    bytes.len()
                )));
            }
            Ok(DynSolValue::FixedBytes(B256::right_padding_from(&bytes), *size))
        }
        DynSolType::String => value
            .as_str()
            .map(|s| DynSolValue::String(s.to_string()))
            .ok_or_else(|| mismatch(ty, value)),
        DynSolType::Array(inner) => {
            let items = value.as_array().ok_or_else(|| mismatch(ty, value))?;
            convert_items(inner, items).map(DynSolValue::Array)
        }
        DynSolType::FixedArray(inner, len) => {
            let items = value.as_array().ok_or_else(|| mismatch(ty, value))?;
            if items.len() != *len {
                return Err(ConversionError::new(format!(
                    "expected {} elements for {}, got {}",
                    len,
                    ty.sol_type_name(),
                    items.len()
                )));
            }
            convert_items(inner, items).map(DynSolValue::FixedArray)
        }
        DynSolType::Tuple(types) => {
            let items = value.as_array().ok_or_else(|| mismatch(ty, value))?;
            if items.len() != types.len() {
                return Err(ConversionError::new(format!(
                    "expected {} components for {}, got {}",
                    types.len(),
                    ty.sol_type_name(),
                    items.len()
                )));
            }
            types
                .iter()
                .zip(items)
                .enumerate()
                .map(|(i, (ty, item))| json_to_sol(ty, item).map_err(|e| e.within(format!(".{}", i))))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        other => Err(ConversionError::new(format!(
            "unsupported parameter type {}",
            other.sol_type_name()
        ))),
    }
}

/// Counts integer slots in `value` that were filled from JSON strings.
///
/// A string that parses as an integer is a weaker match than one that fills
/// an `address` or `bytesN` slot as written, so overload selection prefers
/// the candidate with the lowest count.
pub fn string_integer_count(ty: &DynSolType, value: &Value) -> usize {
    match (ty, value) {
        (DynSolType::Uint(_) | DynSolType::Int(_), Value::String(_)) => 1,
        (DynSolType::Array(inner) | DynSolType::FixedArray(inner, _), Value::Array(items)) => items
            .iter()
            .map(|item| string_integer_count(inner, item))
            .sum(),
        (DynSolType::Tuple(types), Value::Array(items)) => types
            .iter()
            .zip(items)
            .map(|(ty, item)| string_integer_count(ty, item))
            .sum(),
        _ => 0,
    }
}

fn convert_items(inner: &DynSolType, items: &[Value]) -> Result<Vec<DynSolValue>, ConversionError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| json_to_sol(inner, item).map_err(|e| e.within(format!("[{}]", i))))
        .collect()
}

fn parse_uint(value: &Value, bits: usize) -> Result<U256, ConversionError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(|| {
            ConversionError::new(format!(
                "expected non-negative integer for uint{}, got {}",
                bits, n
            ))
        })?,
        Value::String(s) => parse_uint_str(s, bits)?,
        other => {
            return Err(ConversionError::new(format!(
                "expected uint{}, got {}",
                bits,
                json_kind(other)
            )))
        }
    };

    if parsed.bit_len() > bits {
        return Err(ConversionError::new(format!(
            "value {} does not fit in uint{}",
            parsed, bits
        )));
    }
    Ok(parsed)
}

fn parse_uint_str(s: &str, bits: usize) -> Result<U256, ConversionError> {
    let invalid = || ConversionError::new(format!("invalid uint{} string {:?}", bits, s));

    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex_digits) => (hex_digits, 16),
        None => (s, 10),
    };
    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| if radix == 16 { c.is_ascii_hexdigit() } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(invalid());
    }

    U256::from_str_radix(digits, radix).map_err(|_| invalid())
}

fn parse_int(value: &Value, bits: usize) -> Result<I256, ConversionError> {
    let text = match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => {
            return Err(ConversionError::new(format!(
                "expected integer for int{}, got {}",
                bits, n
            )))
        }
        Value::String(s) => {
            let digits = s.strip_prefix('-').unwrap_or(s);
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConversionError::new(format!(
                    "invalid int{} string {:?}",
                    bits, s
                )));
            }
            s.clone()
        }
        other => {
            return Err(ConversionError::new(format!(
                "expected int{}, got {}",
                bits,
                json_kind(other)
            )))
        }
    };

    let parsed = I256::from_dec_str(&text).map_err(|_| {
        ConversionError::new(format!("value {} does not fit in int{}", text, bits))
    })?;

    if bits < 256 {
        let bound = U256::from(1u8) << (bits - 1);
        let fits = if parsed.is_negative() {
            parsed.unsigned_abs() <= bound
        } else {
            parsed.into_raw() < bound
        };
        if !fits {
            return Err(ConversionError::new(format!(
                "value {} does not fit in int{}",
                text, bits
            )));
        }
    }
    Ok(parsed)
}

fn parse_address(value: &Value) -> Result<Address, ConversionError> {
    let s = value
        .as_str()
        .ok_or_else(|| ConversionError::new(format!("expected address, got {}", json_kind(value))))?;
    if !s.starts_with("0x") {
        return Err(ConversionError::new(format!(
            "address {:?} must be 0x-prefixed",
            s
        )));
    }
    s.parse::<Address>()
        .map_err(|_| ConversionError::new(format!("invalid address {:?}", s)))
}

fn parse_hex(ty: &DynSolType, value: &Value) -> Result<Vec<u8>, ConversionError> {
    let s = value.as_str().ok_or_else(|| mismatch(ty, value))?;
    let digits = s.strip_prefix("0x").ok_or_else(|| {
        ConversionError::new(format!("{} value {:?} must be 0x-prefixed", ty.sol_type_name(), s))
    })?;
    hex::decode(digits).map_err(|e| {
        ConversionError::new(format!("invalid hex for {}: {}", ty.sol_type_name(), e))
    })
}

fn mismatch(ty: &DynSolType, value: &Value) -> ConversionError {
    ConversionError::new(format!(
        "expected {}, got {}",
        ty.sol_type_name(),
        json_kind(value)
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Encode EVM contract calls from a JSON ABI and JSON arguments.

pub mod convert;
pub mod encoder;

pub use convert::{json_to_sol, ConversionError};
pub use encoder::{function_signatures, AbiEncoder};

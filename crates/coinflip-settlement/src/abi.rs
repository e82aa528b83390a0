//! Minimal ABI value model and static call encoding
//!
//! Only the static word types the request struct and the settlement call
//! use are modelled. Every value occupies one 32-byte big-endian word.

use std::{fmt, str::FromStr};

use alloy_primitives::{Address, B256, U256};
use serde_json::Value;
use tiny_keccak::{Hasher, Keccak};

use crate::error::SettlementError;

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// Size of a function selector in bytes
pub const SELECTOR_SIZE: usize = 4;

/// Width of an address in bits
const ADDRESS_BITS: usize = 160;

/// Hex digits in a textual address, without the `0x` prefix
const ADDRESS_HEX_LEN: usize = 40;

/// Compute keccak256 hash
fn tiny_keccak_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Function selector: keccak256(signature)[:4]
pub fn selector(signature: &str) -> [u8; SELECTOR_SIZE] {
    let hash = tiny_keccak_hash(signature.as_bytes());
    let mut out = [0u8; SELECTOR_SIZE];
    out.copy_from_slice(&hash[..SELECTOR_SIZE]);
    out
}

/// Encode a call with static arguments: selector followed by one word per argument.
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut calldata = Vec::with_capacity(SELECTOR_SIZE + WORD_SIZE * args.len());
    calldata.extend_from_slice(&selector(signature));
    for arg in args {
        calldata.extend_from_slice(&arg.to_word());
    }
    calldata
}

/// A single decoded ABI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `uint256`
    Uint(U256),
    /// `address`
    Address(Address),
    /// `bool`
    Bool(bool),
}

impl Token {
    /// The 32-byte big-endian word this value occupies in calldata.
    pub fn to_word(&self) -> [u8; WORD_SIZE] {
        match self {
            Self::Uint(value) => value.to_be_bytes::<WORD_SIZE>(),
            Self::Address(address) => address.into_word().0,
            Self::Bool(flag) => U256::from(u8::from(*flag)).to_be_bytes::<WORD_SIZE>(),
        }
    }

    /// Read the value as a `uint256` slot.
    ///
    /// Addresses and booleans are words too, so they widen losslessly.
    pub fn as_uint(&self) -> U256 {
        U256::from_be_bytes(self.to_word())
    }

    /// Convert a raw JSON value found at tuple position `index`.
    ///
    /// Numbers must be non-negative integers; strings are parsed with
    /// [`FromStr`].
    pub fn from_json(value: &Value, index: usize) -> Result<Self, SettlementError> {
        let invalid = |reason: String| SettlementError::InvalidParameterValue {
            index,
            value: value.to_string(),
            reason,
        };

        match value {
            Value::Bool(flag) => Ok(Self::Bool(*flag)),
            Value::Number(number) => {
                let digits = number.to_string();
                U256::from_str_radix(&digits, 10)
                    .map(Self::Uint)
                    .map_err(|_| invalid("not an unsigned integer".to_string()))
            }
            Value::String(s) => s.parse().map_err(invalid),
            _ => Err(invalid(
                "expected an unsigned integer, a hex/decimal string or a boolean".to_string(),
            )),
        }
    }

    /// Read the value as an `address` slot, at tuple position `index`.
    pub fn as_address(&self, index: usize) -> Result<Address, SettlementError> {
        match self {
            Self::Address(address) => Ok(*address),
            Self::Uint(value) if value.bit_len() <= ADDRESS_BITS => {
                Ok(Address::from_word(B256::from(value.to_be_bytes::<WORD_SIZE>())))
            }
            _ => Err(SettlementError::InvalidParameterType {
                index,
                expected: "address",
                found: *self,
            }),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(value) => write!(f, "uint256({value})"),
            Self::Address(address) => write!(f, "address({address:#x})"),
            Self::Bool(flag) => write!(f, "bool({flag})"),
        }
    }
}

impl FromStr for Token {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            if digits.len() == ADDRESS_HEX_LEN {
                return Address::from_str(s)
                    .map(Self::Address)
                    .map_err(|e| format!("invalid address {s}: {e}"));
            }
        }
        U256::from_str(s).map(Self::Uint).map_err(|e| format!("invalid uint256 {s}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selector() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
    }

    #[test]
    fn test_encode_call_layout() {
        let data = encode_call("f(uint256,bool)", &[Token::Uint(U256::from(7)), Token::Bool(true)]);

        assert_eq!(data.len(), SELECTOR_SIZE + 2 * WORD_SIZE);
        assert_eq!(data[..SELECTOR_SIZE], selector("f(uint256,bool)"));
        assert_eq!(data[SELECTOR_SIZE + WORD_SIZE - 1], 7);
        assert!(data[SELECTOR_SIZE..SELECTOR_SIZE + WORD_SIZE - 1].iter().all(|b| *b == 0));
        assert_eq!(data[SELECTOR_SIZE + 2 * WORD_SIZE - 1], 1);
    }

    #[test]
    fn test_parse_tokens() {
        let address: Token = "0x1111111111111111111111111111111111111111".parse().unwrap();
        assert_eq!(address, Token::Address(Address::repeat_byte(0x11)));

        assert_eq!("42".parse::<Token>().unwrap(), Token::Uint(U256::from(42)));
        assert_eq!("0x2a".parse::<Token>().unwrap(), Token::Uint(U256::from(42)));
        assert!("not-a-number".parse::<Token>().is_err());
    }

    #[test]
    fn test_tokens_from_json() {
        let values: Vec<Value> = serde_json::from_str(
            r#"[1, "0x2222222222222222222222222222222222222222", true, "1000000000000000000000"]"#,
        )
        .unwrap();
        let tokens: Vec<Token> =
            values.iter().enumerate().map(|(i, v)| Token::from_json(v, i).unwrap()).collect();

        assert_eq!(tokens[0], Token::Uint(U256::from(1)));
        assert_eq!(tokens[1], Token::Address(Address::repeat_byte(0x22)));
        assert_eq!(tokens[2], Token::Bool(true));
        assert_eq!(tokens[3], Token::Uint(U256::from(1_000_000_000_000_000_000_000u128)));
    }

    #[test]
    fn test_bare_numbers_beyond_u64() {
        let value: Value = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(Token::from_json(&value, 0), Ok(Token::Uint(U256::from(1u128 << 64))));
    }

    #[test]
    fn test_invalid_json_values() {
        for raw in ["-1", "1.5", r#""zz""#, "null", "[1]", r#"{"a": 1}"#] {
            let value: Value = serde_json::from_str(raw).unwrap();
            let err = Token::from_json(&value, 3).unwrap_err();
            assert!(
                matches!(err, SettlementError::InvalidParameterValue { index: 3, .. }),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn test_word_coercions() {
        let address = Address::repeat_byte(0x33);
        let as_uint = Token::Address(address).as_uint();
        assert_eq!(Token::Uint(as_uint).as_address(1).unwrap(), address);

        assert_eq!(Token::Bool(true).as_uint(), U256::from(1));

        let err = Token::Uint(U256::MAX).as_address(2).unwrap_err();
        assert!(matches!(err, SettlementError::InvalidParameterType { index: 2, .. }));
        assert!(Token::Bool(false).as_address(1).is_err());
    }
}

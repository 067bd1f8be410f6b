// src/blockchain/services/tokens.rs

use ethers_core::abi::{Function, ParamType, Token};
use ethers_core::types::{I256, U256};
use ethers_core::utils::to_checksum;
use serde_json::Value;

use crate::utils::parse_address;

/// Coerce positional JSON arguments into ABI tokens for `func`.
///
/// Errors carry the zero-based index of the offending argument.
pub fn coerce_tokens(func: &Function, args: &[Value]) -> Result<Vec<Token>, (usize, String)> {
    func.inputs
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (param, val))| value_to_token(val, &param.kind).map_err(|e| (i, e)))
        .collect()
}

/// Convert a JSON value into a token of the given ABI type.
pub fn value_to_token(value: &Value, kind: &ParamType) -> Result<Token, String> {
    match kind {
        ParamType::Address => {
            let s = value
                .as_str()
                .ok_or_else(|| format!("expected address string, got {}", value))?;
            parse_address(s)
                .map(Token::Address)
                .map_err(|_| format!("invalid address: {}", s))
        }
        ParamType::Uint(bits) => {
            let n = parse_u256(&numeric_text(value, kind)?)
                .map_err(|e| format!("invalid uint{}: {}", bits, e))?;
            if *bits < 256 && n.bits() > *bits {
                return Err(format!("value {} overflows uint{}", n, bits));
            }
            Ok(Token::Uint(n))
        }
        ParamType::Int(bits) => {
            let s = numeric_text(value, kind)?;
            let n = parse_i256(&s).map_err(|e| format!("invalid int{}: {}", bits, e))?;
            if !fits_signed(n, *bits) {
                return Err(format!("value {} overflows int{}", n, bits));
            }
            Ok(Token::Int(n.into_raw()))
        }
        ParamType::Bool => value
            .as_bool()
            .map(Token::Bool)
            .ok_or_else(|| format!("expected boolean, got {}", value)),
        ParamType::String => value
            .as_str()
            .map(|s| Token::String(s.to_string()))
            .ok_or_else(|| format!("expected string, got {}", value)),
        ParamType::Bytes => decode_hex_arg(value).map(Token::Bytes),
        ParamType::FixedBytes(size) => {
            let bytes = decode_hex_arg(value)?;
            if bytes.len() != *size {
                return Err(format!("expected {} bytes, got {}", size, bytes.len()));
            }
            Ok(Token::FixedBytes(bytes))
        }
        ParamType::Array(inner) => {
            let arr = value
                .as_array()
                .ok_or_else(|| format!("expected array, got {}", value))?;
            arr.iter()
                .map(|v| value_to_token(v, inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::Array)
        }
        ParamType::FixedArray(inner, size) => {
            let arr = value
                .as_array()
                .ok_or_else(|| format!("expected array, got {}", value))?;
            if arr.len() != *size {
                return Err(format!("fixed array expects {} elements, got {}", size, arr.len()));
            }
            arr.iter()
                .map(|v| value_to_token(v, inner))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::FixedArray)
        }
        ParamType::Tuple(types) => {
            let arr = value
                .as_array()
                .ok_or_else(|| format!("expected array for tuple, got {}", value))?;
            if arr.len() != types.len() {
                return Err(format!("tuple expects {} elements, got {}", types.len(), arr.len()));
            }
            arr.iter()
                .zip(types)
                .map(|(v, t)| value_to_token(v, t))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::Tuple)
        }
    }
}

fn numeric_text(value: &Value, kind: &ParamType) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("expected number or numeric string for {}, got {}", kind, other)),
    }
}

fn decode_hex_arg(value: &Value) -> Result<Vec<u8>, String> {
    let s = value
        .as_str()
        .ok_or_else(|| format!("expected hex string, got {}", value))?;
    let hex_str = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(hex_str).map_err(|e| format!("invalid hex: {}", e))
}

/// Parse a decimal or `0x`-prefixed hex unsigned integer.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        U256::from_str_radix(hex_str, 16).map_err(|e| e.to_string())
    } else {
        U256::from_dec_str(s).map_err(|e| e.to_string())
    }
}

/// Parse a decimal (optionally negative) or `0x`-prefixed hex signed integer.
///
/// Hex is read as a non-negative magnitude, not as two's complement.
fn parse_i256(s: &str) -> Result<I256, String> {
    if s.starts_with("0x") || s.starts_with("0X") {
        let raw = parse_u256(s)?;
        if raw.bit(255) {
            return Err(format!("{} exceeds the largest int256", s));
        }
        return Ok(I256::from_raw(raw));
    }
    I256::from_dec_str(s).map_err(|e| e.to_string())
}

/// Whether `n` lies in `[-2^(bits-1), 2^(bits-1) - 1]`.
fn fits_signed(n: I256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let limit = U256::one() << (bits - 1);
    let magnitude = n.unsigned_abs();
    if n.is_negative() {
        magnitude <= limit
    } else {
        magnitude < limit
    }
}

/// Render decoded return values the way they cross the tool boundary.
///
/// No outputs render as an empty string, a single output as its own text,
/// several outputs as a parenthesized tuple.
pub fn render_outputs(tokens: &[Token]) -> String {
    match tokens {
        [] => String::new(),
        [single] => render_token(single, false),
        many => render_tuple(many),
    }
}

fn render_tuple(tokens: &[Token]) -> String {
    let inner: Vec<String> = tokens.iter().map(|t| render_token(t, true)).collect();
    format!("({})", inner.join(", "))
}

fn render_token(token: &Token, nested: bool) -> String {
    match token {
        Token::Address(a) => to_checksum(a, None),
        Token::Uint(n) => n.to_string(),
        Token::Int(n) => I256::from_raw(*n).to_string(),
        Token::Bool(b) => b.to_string(),
        Token::String(s) if nested => format!("{:?}", s),
        Token::String(s) => s.clone(),
        Token::Bytes(b) | Token::FixedBytes(b) => format!("0x{}", hex::encode(b)),
        Token::Array(items) | Token::FixedArray(items) => {
            let inner: Vec<String> = items.iter().map(|t| render_token(t, true)).collect();
            format!("[{}]", inner.join(", "))
        }
        Token::Tuple(items) => render_tuple(items),
    }
}

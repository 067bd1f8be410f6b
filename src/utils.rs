//! Address helpers shared by the contract service and the tool surfaces

use std::str::FromStr;

use ethers_core::types::Address;
use ethers_core::utils::to_checksum;

use crate::blockchain::models::CallError;

/// Parse a hex account address in any letter case.
///
/// The `0x` prefix is optional and surrounding whitespace is ignored. The
/// EIP-55 checksum of mixed-case input is not verified: the input is
/// normalized, not trusted.
pub fn parse_address(input: &str) -> Result<Address, CallError> {
    let trimmed = input.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let invalid = |reason: &str| CallError::InvalidAddress {
        address: input.to_string(),
        reason: reason.to_string(),
    };

    if hex_part.len() != 40 {
        return Err(invalid("expected 20 bytes of hex"));
    }
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("non-hex character"));
    }
    Address::from_str(hex_part).map_err(|e| invalid(&e.to_string()))
}

/// Normalize an address into its canonical EIP-55 checksummed form.
pub fn normalize_address(input: &str) -> Result<String, CallError> {
    parse_address(input).map(|addr| to_checksum(&addr, None))
}

//! Token address validation

use super::TrackerError;

/// Length in bytes of a decoded Solana public key
const PUBKEY_LEN: usize = 32;

/// Validate a Solana mint address, returning it trimmed
///
/// The address must be base58 and decode to exactly 32 bytes.
pub fn validate_address(address: &str) -> Result<&str, TrackerError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(invalid(address, "address is empty"));
    }

    let bytes = bs58::decode(trimmed)
        .into_vec()
        .map_err(|e| invalid(address, &format!("not base58: {e}")))?;

    if bytes.len() != PUBKEY_LEN {
        return Err(invalid(
            address,
            &format!("decodes to {} bytes, expected {}", bytes.len(), PUBKEY_LEN),
        ));
    }

    Ok(trimmed)
}

fn invalid(address: &str, reason: &str) -> TrackerError {
    TrackerError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    }
}

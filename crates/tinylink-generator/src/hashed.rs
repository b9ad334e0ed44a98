use crate::error::{GeneratorError, Result};
use crate::Generator;
use sha2::{Digest, Sha256};
use tinylink_core::token::TOKEN_LENGTH;
use tinylink_core::Token;

/// Derives tokens from a SHA-256 digest of `original_url ++ owner_id`.
///
/// The digest is read as a big-endian integer and narrowed to its low
/// 64 bits. That value's decimal numeral is re-expressed in base58 and
/// the first 8 characters are kept. Tokens produced this way are stable
/// across releases; do not change any step.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Base58Generator;

impl Sha256Base58Generator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for Sha256Base58Generator {
    fn generate(&self, original_url: &str, owner_id: &str) -> Result<Token> {
        generate_token(original_url, owner_id)
    }
}

/// Derives the token for `original_url` on behalf of `owner_id`.
pub fn generate_token(original_url: &str, owner_id: &str) -> Result<Token> {
    let mut hasher = Sha256::new();
    hasher.update(original_url.as_bytes());
    hasher.update(owner_id.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();

    token_from_value(low_u64(&digest))
}

/// Low-order 64 bits of the digest taken as one big-endian integer.
fn low_u64(digest: &[u8; 32]) -> u64 {
    let mut low = [0u8; 8];
    low.copy_from_slice(&digest[24..]);
    u64::from_be_bytes(low)
}

fn token_from_value(value: u64) -> Result<Token> {
    let encoded = encode_decimal(&value.to_string())?;
    let prefix = encoded.get(..TOKEN_LENGTH).ok_or_else(|| {
        GeneratorError::GenerationFault(format!(
            "encoded value '{}' is shorter than {} characters",
            encoded, TOKEN_LENGTH
        ))
    })?;
    Ok(Token::new_unchecked(prefix))
}

/// Re-expresses a base-10 numeral in base58.
fn encode_decimal(numeral: &str) -> Result<String> {
    if numeral.is_empty() || !numeral.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GeneratorError::GenerationFault(format!(
            "malformed decimal input '{}'",
            numeral
        )));
    }

    let value: u64 = numeral.parse().map_err(|e| {
        GeneratorError::GenerationFault(format!("malformed decimal input '{}': {e}", numeral))
    })?;

    // bs58 keeps leading zero bytes as '1's; a numeral has no such padding.
    let bytes = value.to_be_bytes();
    let first = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    Ok(bs58::encode(&bytes[first..]).into_string())
}

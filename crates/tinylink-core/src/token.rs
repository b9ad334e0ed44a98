use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// The Bitcoin base58 alphabet.
///
/// Leaves out `0`, `O`, `I` and `l` so tokens survive being read aloud or
/// retyped, and contains nothing that needs escaping in a URL path.
pub const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Number of characters in every token.
pub const TOKEN_LENGTH: usize = 8;

/// An 8-character base58 short token.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(SmolStr);

impl Token {
    /// Parses and validates a token.
    ///
    /// Valid tokens are exactly [`TOKEN_LENGTH`] characters drawn from
    /// [`ALPHABET`].
    pub fn parse(token: impl AsRef<str>) -> Result<Self, CoreError> {
        let token = token.as_ref();
        Self::validate(token)?;
        Ok(Self(SmolStr::new(token)))
    }

    /// Creates a `Token` without validation.
    ///
    /// Use this only for tokens produced by trusted internal sources
    /// (e.g. the generator, whose output is base58 by construction).
    pub fn new_unchecked(token: impl AsRef<str>) -> Self {
        Self(SmolStr::new(token))
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the public short URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    fn validate(token: &str) -> Result<(), CoreError> {
        if token.len() != TOKEN_LENGTH {
            return Err(CoreError::InvalidToken(format!(
                "length must be {}, got {}",
                TOKEN_LENGTH,
                token.len()
            )));
        }

        if !token.bytes().all(|b| ALPHABET.as_bytes().contains(&b)) {
            return Err(CoreError::InvalidToken(format!(
                "must contain only base58 characters: '{}'",
                token
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&self.0).finish()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Token {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Token::parse(&s).map_err(serde::de::Error::custom)
    }
}

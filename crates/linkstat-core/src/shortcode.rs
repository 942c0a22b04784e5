use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// The textual form of an identifier as handed out to clients.
///
/// A `ShortCode` is not validated on construction: codes arrive from
/// untrusted requests and are only interpreted when [`identifier`] is called.
///
/// [`identifier`]: ShortCode::identifier
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Encodes an identifier into its short code.
    pub fn from_identifier(id: u64) -> Self {
        Self(SmolStr::new(linkstat_codec::encode(id)))
    }

    /// Wraps a client-supplied code as-is.
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code))
    }

    /// Recovers the identifier this code names.
    pub fn identifier(&self) -> linkstat_codec::Result<u64> {
        linkstat_codec::decode(&self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ShortCode {
    fn from(id: u64) -> Self {
        Self::from_identifier(id)
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Ok(Self(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkstat_codec::CodecError;

    #[test]
    fn from_identifier_round_trips() {
        let code = ShortCode::from_identifier(1_001_002);
        assert_eq!(code.as_str(), "f5dp");
        assert_eq!(code.identifier().unwrap(), 1_001_002);
    }

    #[test]
    fn unchecked_code_fails_on_interpretation() {
        let code = ShortCode::new_unchecked("not/a/code");
        assert!(matches!(
            code.identifier(),
            Err(CodecError::InvalidCharacter {
                character: '/',
                position: 3
            })
        ));
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = ShortCode::from(1u64);
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"a\"");
        let back: ShortCode = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(back, code);
    }
}

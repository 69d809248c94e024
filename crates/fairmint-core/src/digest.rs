//! # 32-Byte Digests
//!
//! `Hash32` is the value type for Merkle roots, proof nodes, commitments and
//! seeds. It renders as lowercase hex and serializes as a `0x`-prefixed hex
//! string so configuration files and fixtures stay human-readable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CryptoError;

/// A raw 32-byte hash value.
///
/// Ordering is lexicographic over the bytes, which is the ordering the
/// sorted-pair Merkle convention relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// The all-zero hash.
    pub const ZERO: Hash32 = Hash32([0u8; 32]);

    /// Wrap raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse 64 hex chars, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let mut out = [0u8; 32];
        decode_hex_into(s, &mut out)?;
        Ok(Self(out))
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Hash32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash32::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Decode a hex string (optional `0x` prefix) into a fixed-size buffer.
pub(crate) fn decode_hex_into(s: &str, out: &mut [u8]) -> Result<(), CryptoError> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if s.len() != out.len() * 2 {
        return Err(CryptoError::HexLength {
            expected: out.len() * 2,
            actual: s.len(),
        });
    }
    for (i, chunk) in s.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk)
            .map_err(|_| CryptoError::HexCharacter { position: i * 2 })?;
        out[i] = u8::from_str_radix(pair, 16)
            .map_err(|_| CryptoError::HexCharacter { position: i * 2 })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_with_and_without_prefix() {
        let h = Hash32([0xAB; 32]);
        assert_eq!(Hash32::from_hex(&h.to_hex()).unwrap(), h);
        assert_eq!(Hash32::from_hex(&h.to_string()).unwrap(), h);
    }

    #[test]
    fn display_is_prefixed() {
        let s = Hash32::ZERO.to_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 66);
    }

    #[test]
    fn rejects_short_hex() {
        let err = Hash32::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            CryptoError::HexLength {
                expected: 64,
                actual: 4
            }
        );
    }

    #[test]
    fn rejects_non_hex() {
        let bad = "zz".repeat(32);
        assert!(matches!(
            Hash32::from_hex(&bad),
            Err(CryptoError::HexCharacter { position: 0 })
        ));
    }

    #[test]
    fn ordering_is_bytewise() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        a[0] = 1;
        b[31] = 0xFF;
        assert!(Hash32(b) < Hash32(a));
    }

    #[test]
    fn serde_as_hex_string() {
        let h = Hash32([0x01; 32]);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(32)));
        let parsed: Hash32 = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, h);
    }
}

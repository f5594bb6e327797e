//! BLAKE3 content digests and version identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A BLAKE3 hash (32 bytes)
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Blake3Hash([u8; 32]);

impl Blake3Hash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Lowercase hex, 64 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string
    pub fn from_hex(s: &str) -> Option<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Debug for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blake3Hash({})", self.to_hex())
    }
}

impl fmt::Display for Blake3Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hash bytes using BLAKE3
pub fn hash_bytes(data: &[u8]) -> Blake3Hash {
    Blake3Hash::from_bytes(*blake3::hash(data).as_bytes())
}

/// BLAKE3 of the empty string. Marks "no real parent" at the root of every chain.
pub const ROOT_VERSION: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

/// Identifier of one committed version of a file
///
/// Real identifiers have the form `<blake3 hex of text>:<commits before this one>`.
/// The count only disambiguates commits of identical text; it is not a security property.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// The root sentinel
    pub fn root() -> Self {
        Self(ROOT_VERSION.to_string())
    }

    /// Derive the identifier for `text` committed on top of `prior_commits` versions
    pub fn identify(text: &str, prior_commits: usize) -> Self {
        Self(format!("{}:{}", hash_bytes(text.as_bytes()).to_hex(), prior_commits))
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_VERSION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a real identifier into its content hash and disambiguating count
    ///
    /// Returns `None` for the sentinel and for strings not shaped like an identifier.
    pub fn parts(&self) -> Option<(Blake3Hash, usize)> {
        let (hash, count) = self.0.split_once(':')?;
        Some((Blake3Hash::from_hex(hash)?, count.parse().ok()?))
    }

    /// Whether `text` is the content this identifier was derived from
    pub fn matches_content(&self, text: &str) -> bool {
        match self.parts() {
            Some((hash, _)) => hash == hash_bytes(text.as_bytes()),
            None => false,
        }
    }
}

impl From<String> for VersionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VersionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for VersionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionId({})", self.0)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

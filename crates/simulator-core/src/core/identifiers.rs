// crates/simulator-core/src/core/identifiers.rs
// ============================================================================
// Module: Simulator Identifiers
// Description: Fixed-size program identifiers, public keys, and addresses.
// Purpose: Provide strongly typed byte identifiers with stable hex text forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Program identifiers are opaque 32-byte values generated by the program
//! loader or the interpreter. Addresses are derived from named public keys by
//! prefixing the raw key bytes with a one-byte key-kind tag. All identifiers
//! render as lowercase hex.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of a program identifier in bytes.
pub const PROGRAM_ID_LEN: usize = 32;
/// Length of an Ed25519 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of a derived address in bytes (prefix + public key).
pub const ADDRESS_LEN: usize = 1 + PUBLIC_KEY_LEN;
/// Address type prefix for Ed25519 keys.
pub const ED25519_ADDRESS_PREFIX: u8 = 0;
/// Text prefix marking a symbolic step reference (`step_N`).
pub const STEP_REFERENCE_PREFIX: &str = "step_";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing identifier text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The text has the wrong length for the identifier.
    #[error("expected {expected} hex characters, got {actual}")]
    Length {
        /// Expected character count.
        expected: usize,
        /// Actual character count.
        actual: usize,
    },
    /// The text contains a non-hex character.
    #[error("invalid hex character in identifier")]
    InvalidHex,
}

// ============================================================================
// SECTION: Program Identifier
// ============================================================================

/// Identifier of a created program or of an executed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId([u8; PROGRAM_ID_LEN]);

impl ProgramId {
    /// Creates an identifier from its raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; PROGRAM_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates an identifier from a slice of exactly [`PROGRAM_ID_LEN`] bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; PROGRAM_ID_LEN]>::try_from(bytes).ok().map(Self)
    }

    /// Parses a parameter value as an identifier.
    ///
    /// Accepts exactly [`PROGRAM_ID_LEN`] raw bytes, or the hex text form.
    #[must_use]
    pub fn from_param_value(value: &[u8]) -> Option<Self> {
        if let Some(id) = Self::from_slice(value) {
            return Some(id);
        }
        std::str::from_utf8(value).ok().and_then(|text| text.parse().ok())
    }

    /// Returns the raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PROGRAM_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_encode(&self.0))
    }
}

impl FromStr for ProgramId {
    type Err = IdentifierError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        hex_decode_array(text).map(Self)
    }
}

impl Serialize for ProgramId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ProgramId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Public Keys and Addresses
// ============================================================================

/// Raw Ed25519 public key bytes of a named key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Creates a public key from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

/// Account address derived from a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Derives the address of an Ed25519 public key.
    #[must_use]
    pub fn from_ed25519(key: &PublicKey) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = ED25519_ADDRESS_PREFIX;
        bytes[1..].copy_from_slice(key.as_bytes());
        Self(bytes)
    }

    /// Returns the raw address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex_encode(&self.0))
    }
}

// ============================================================================
// SECTION: Step References
// ============================================================================

/// Handle to a step added to a plan, rendered as `step_N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepRef(usize);

impl StepRef {
    /// Creates a reference to the step at `index`.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the referenced step index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{STEP_REFERENCE_PREFIX}{}", self.0)
    }
}

impl From<usize> for StepRef {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}

/// Decodes hex text into a fixed-size byte array.
fn hex_decode_array<const N: usize>(text: &str) -> Result<[u8; N], IdentifierError> {
    let bytes = text.as_bytes();
    if bytes.len() != N * 2 {
        return Err(IdentifierError::Length {
            expected: N * 2,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
        let high = hex_value(pair[0]).ok_or(IdentifierError::InvalidHex)?;
        let low = hex_value(pair[1]).ok_or(IdentifierError::InvalidHex)?;
        *slot = (high << 4) | low;
    }
    Ok(out)
}

/// Returns the numeric value of a single hex digit.
const fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

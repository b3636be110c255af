//! Canonicalization and digests
//!
//! Two hashing paths:
//!
//! - **Digest hash** for the top-level fingerprint: canonical JSON text of the
//!   signal set, SHA-256, first 16 bytes as 32 lowercase hex characters.
//! - **Rolling hash** for the canvas/WebGL sub-fingerprints, and as the digest
//!   fallback when the `secure-hash` feature is disabled. It is a 32-bit
//!   `hash * 31 + unit` accumulator rendered as signed decimal.
//!
//! The rolling hash is NOT collision resistant. Collisions are expected at
//! scale; it is only suitable for coarse rendering comparison, and a
//! fingerprint produced by the fallback path must not be treated as
//! equivalent to a SHA-256 fingerprint.

use std::fmt::Write as _;

use dfp_error::{FingerprintError, Result};
use serde::Serialize;
use serde_json::Value;

#[cfg(feature = "secure-hash")]
use crate::constants::digest::TRUNCATED_BYTES;

/// Digest algorithm used for the top-level fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// Truncated SHA-256, 32 hex characters
    #[cfg(feature = "secure-hash")]
    Sha256,
    /// 32-bit rolling hash, signed decimal
    Rolling,
}

impl HashAlgorithm {
    /// SHA-256 when compiled in, otherwise the rolling fallback
    pub fn preferred() -> Self {
        #[cfg(feature = "secure-hash")]
        {
            Self::Sha256
        }
        #[cfg(not(feature = "secure-hash"))]
        {
            Self::Rolling
        }
    }

    pub fn is_secure(self) -> bool {
        !matches!(self, Self::Rolling)
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::preferred()
    }
}

// ============================================================================
// Canonicalization
// ============================================================================

/// Serialize a value to its canonical text
///
/// Object keys keep insertion order, integral floats are written without a
/// fractional part, very large or very small magnitudes use exponent form and
/// non-finite numbers become `null`. Identical input
/// structures always produce identical text.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let tree = serde_json::to_value(value)
        .map_err(|e| FingerprintError::Canonicalization(e.to_string()))?;
    let mut out = String::new();
    write_canonical(&mut out, &tree)?;
    Ok(out)
}

fn write_canonical(out: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                write!(out, "{}", i).map_err(fmt_error)?;
            } else if let Some(u) = n.as_u64() {
                write!(out, "{}", u).map_err(fmt_error)?;
            } else {
                write_float(out, n.as_f64().unwrap_or(f64::NAN))?;
            }
        }
        Value::String(s) => {
            let quoted = serde_json::to_string(s)
                .map_err(|e| FingerprintError::Canonicalization(e.to_string()))?;
            out.push_str(&quoted);
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let quoted = serde_json::to_string(key)
                    .map_err(|e| FingerprintError::Canonicalization(e.to_string()))?;
                out.push_str(&quoted);
                out.push(':');
                write_canonical(out, item)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

/// Largest float that still has an exact integer representation
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Magnitudes at or above this are written in exponent form
const EXPONENT_ABOVE: f64 = 1e21;

/// Nonzero magnitudes below this are written in exponent form
const EXPONENT_BELOW: f64 = 1e-6;

/// Shortest round-trip text in the form `JSON.stringify` uses
///
/// Positive exponents carry an explicit sign (`1e+21`), negative ones do not
/// (`1.5e-7`).
fn write_float(out: &mut String, f: f64) -> Result<()> {
    let magnitude = f.abs();
    if !f.is_finite() {
        out.push_str("null");
    } else if magnitude >= EXPONENT_ABOVE {
        let text = format!("{:e}", f);
        out.push_str(&text.replacen('e', "e+", 1));
    } else if magnitude != 0.0 && magnitude < EXPONENT_BELOW {
        write!(out, "{:e}", f).map_err(fmt_error)?;
    } else if f.fract() == 0.0 && magnitude <= MAX_SAFE_INTEGER {
        write!(out, "{}", f as i64).map_err(fmt_error)?;
    } else {
        write!(out, "{}", f).map_err(fmt_error)?;
    }
    Ok(())
}

fn fmt_error(e: std::fmt::Error) -> FingerprintError {
    FingerprintError::Canonicalization(e.to_string())
}

// ============================================================================
// Digests
// ============================================================================

/// Rolling hash accumulator over UTF-16 code units
pub fn rolling_hash(input: &str) -> i32 {
    input
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Rolling hash rendered as signed decimal text
pub fn hash_string(input: &str) -> String {
    rolling_hash(input).to_string()
}

/// Canonicalize and digest with the preferred algorithm
pub fn hash_object<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    hash_object_with(value, HashAlgorithm::preferred())
}

/// Canonicalize and digest with an explicit algorithm
pub fn hash_object_with<T: Serialize + ?Sized>(value: &T, algorithm: HashAlgorithm) -> Result<String> {
    let text = canonicalize(value)?;
    match algorithm {
        #[cfg(feature = "secure-hash")]
        HashAlgorithm::Sha256 => sha256_hex(text.as_bytes()),
        HashAlgorithm::Rolling => Ok(hash_string(&text)),
    }
}

#[cfg(feature = "secure-hash")]
fn sha256_hex(bytes: &[u8]) -> Result<String> {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    let mut hex = String::with_capacity(TRUNCATED_BYTES * 2);
    for b in &result[..TRUNCATED_BYTES] {
        write!(hex, "{:02x}", b).map_err(|e| FingerprintError::Hashing(e.to_string()))?;
    }
    Ok(hex)
}

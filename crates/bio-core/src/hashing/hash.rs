//! Hashes blake3 en hex (64 caracteres) para fingerprints de planes,
//! definiciones y corridas.
//!
//! El algoritmo es parte del formato del fingerprint: cambiarlo exige subir
//! `ENGINE_VERSION`, igual que cualquier cambio en la forma canónica.

use serde_json::Value;

use super::to_canonical_json;

pub fn hash_str(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

/// Hash del JSON canónico de `value`.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

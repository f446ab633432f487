//! Report Hashing - SHA-256 over Canonical JSON
//!
//! Analysis reports and formatting jobs get deterministic hashes so the
//! panel can dedupe and diff repeated runs over the same selection.

use serde::Serialize;
use serde_json::{to_string, Value};
use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Canonical JSON: recursively sorted object keys, no whitespace. Two
/// semantically equal values always serialize identically.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let v: Value = serde_json::to_value(value)?;
    to_string(&sort_value(&v))
}

fn sort_value(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            Value::Object(
                keys.into_iter()
                    .map(|k| (k.clone(), sort_value(&map[k])))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        _ => v.clone(),
    }
}

/// Hash of a full analysis report (computed over the hash-zeroed report).
pub fn compute_report_hash<T: Serialize>(report: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonical_json(report)?.as_bytes()))
}

/// Audit hash for a formatting job:
/// sha256(ruleset_id : ruleset_version : canonical_payload : engine_version)
pub fn compute_job_hash(
    ruleset_id: &str,
    ruleset_version: &str,
    payload: &impl Serialize,
    engine_version: &str,
) -> Result<String, serde_json::Error> {
    let canonical_payload = canonical_json(payload)?;
    let combined =
        format!("{ruleset_id}:{ruleset_version}:{canonical_payload}:{engine_version}");
    Ok(sha256_hex(combined.as_bytes()))
}

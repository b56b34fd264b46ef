//! # Canonical Encoding
//!
//! The byte string a block hash is computed over. Two nodes agree on a hash
//! only if they agree on this encoding, so it is part of the protocol:
//!
//! - JSON, no insignificant whitespace
//! - object keys sorted lexicographically (by UTF-8 bytes) at every depth
//! - scalars rendered exactly as `serde_json` renders them

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Render `value` in canonical form.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Lowercase hex SHA-256 of the canonical form of `value`.
pub fn canonical_digest(value: &Value) -> String {
    hex::encode(Sha256::digest(canonical_json(value).as_bytes()))
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_string(s: &str, out: &mut String) {
    // serde_json owns the escaping rules
    out.push_str(&Value::from(s).to_string());
}

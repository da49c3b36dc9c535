use crate::model::Signature;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - rule_id
/// - code
/// - item path
/// - salient detail (parameter name, capability name, ...) if present
pub fn fingerprint_for_item(
    rule_id: &str,
    code: &str,
    item_path: &str,
    detail: Option<&str>,
) -> String {
    let mut parts = vec![rule_id, code, item_path];
    if let Some(d) = detail {
        parts.push(d);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

/// Structural fingerprint of a signature, used by the diff engine to pair
/// rename candidates. Parameter names and the borrow note are not identity.
pub fn signature_fingerprint(sig: &Signature) -> String {
    let mut canonical = String::new();
    for param in &sig.params {
        canonical.push_str(&param.ty.name);
        if param.ty.two_valued {
            canonical.push('2');
        }
        if param.ty.textual {
            canonical.push('t');
        }
        if param.ty.borrowed.is_some() {
            canonical.push('&');
        }
        if param.has_default {
            canonical.push('=');
        }
        canonical.push(';');
    }
    canonical.push('|');
    for generic in &sig.generics {
        for bound in &generic.bounds {
            canonical.push_str(bound);
            canonical.push('+');
        }
        canonical.push(';');
    }
    canonical.push('|');
    if let Some(ret) = &sig.ret {
        canonical.push_str(&ret.name);
    }
    canonical.push('|');
    if let Some(error) = &sig.error {
        canonical.push_str(&error.name);
    }

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

/// Compare a presented credential against the configured secret in constant
/// time. A length mismatch returns early; lengths are not secret here.
pub fn secrets_match(expected: &Secret<String>, presented: &str) -> bool {
    let expected_bytes = expected.expose_secret().as_bytes();
    let presented_bytes = presented.as_bytes();

    if expected_bytes.len() != presented_bytes.len() {
        return false;
    }

    expected_bytes.ct_eq(presented_bytes).into()
}

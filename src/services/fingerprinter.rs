//! Content fingerprinting for change detection
//!
//! The digest is a change-detection token, not a security boundary. Two
//! records with the same canonical field tuple always produce the same
//! digest; any field change flips it with overwhelming probability.

use sha2::{Digest, Sha256};

/// Join the canonical field tuple with `|` and hash it.
///
/// Inputs are expected to be canonicalized already (see
/// [`super::canonicalizer::canonicalize`]); absent optional fields hash as
/// the empty string. The detail URL deliberately stays out of the digest so
/// a relocated but unchanged page does not register as a change.
pub fn fingerprint(
    title: &str,
    instructor: &str,
    term: &str,
    schedule: &str,
    room: Option<&str>,
    updated_at: Option<&str>,
    body_text: &str,
) -> String {
    let joined = [
        title,
        instructor,
        term,
        schedule,
        room.unwrap_or(""),
        updated_at.unwrap_or(""),
        body_text,
    ]
    .join("|");

    let digest = Sha256::digest(joined.as_bytes());
    format!("{:x}", digest)
}

//! Segment pseudonymization.
//!
//! # Security
//! - Digests are HMAC-SHA256 keyed by the configured secret
//! - No positional salt: a segment hashes the same wherever it appears
//! - The secret itself never reaches the artifact or the logs

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::secret::Secret;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted digest, in hex characters.
pub const MIN_DIGEST_LENGTH: usize = 8;

/// Longest accepted digest, in hex characters.
pub const MAX_DIGEST_LENGTH: usize = 16;

/// Maps one name segment to its pseudonym.
///
/// Implemented for plain closures so tests can inject a fixed stub.
pub trait Pseudonymizer {
    fn pseudonym(&self, segment: &str) -> String;
}

impl<F> Pseudonymizer for F
where
    F: Fn(&str) -> String,
{
    fn pseudonym(&self, segment: &str) -> String {
        self(segment)
    }
}

/// Keyed-digest pseudonymizer.
#[derive(Clone)]
pub struct HmacPseudonymizer {
    mac: HmacSha256,
    length: usize,
}

impl HmacPseudonymizer {
    /// Build a pseudonymizer keyed by `secret`, keeping `length` hex characters.
    ///
    /// `length` is clamped to `MIN_DIGEST_LENGTH..=MAX_DIGEST_LENGTH`;
    /// configuration validation rejects out-of-range values before this point.
    pub fn new(secret: &Secret, length: usize) -> Self {
        Self {
            mac: keyed_mac(secret),
            length: length.clamp(MIN_DIGEST_LENGTH, MAX_DIGEST_LENGTH),
        }
    }
}

impl Pseudonymizer for HmacPseudonymizer {
    fn pseudonym(&self, segment: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(segment.as_bytes());
        let mut digest = hex::encode(mac.finalize().into_bytes());
        digest.truncate(self.length);
        digest
    }
}

impl std::fmt::Debug for HmacPseudonymizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacPseudonymizer")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// HMAC-SHA256 instance keyed by `secret`.
pub(crate) fn keyed_mac(secret: &Secret) -> HmacSha256 {
    <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size")
}

//! Opaque random tokens.

use rand::distr::Alphanumeric;
use rand::{Rng, rng};

/// Length of the per-request log id.
pub const REQUEST_ID_LEN: usize = 12;

/// Length of the token returned with a sync-collection report.
pub const SYNC_TOKEN_LEN: usize = 16;

/// Length of a session cookie value.
pub const SESSION_ID_LEN: usize = 32;

/// ## Summary
/// Returns a random alphanumeric string of `len` characters.
///
/// Not suitable as a secret; uniqueness is probabilistic.
#[must_use]
pub fn random_token(len: usize) -> String {
    rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

//! Datastore credential generation.

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::constants::SECRET_LENGTH;

/// Generate a [`SECRET_LENGTH`]-character secret over `[A-Za-z0-9]`.
///
/// Uses the thread-local CSPRNG, which is seeded from the OS.
#[must_use]
pub fn generate_secret() -> String {
    generate_with(&mut rand::thread_rng(), SECRET_LENGTH)
}

/// Generate `len` alphanumeric characters from `rng`.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}

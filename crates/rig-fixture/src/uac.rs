//! Unique access code generation and hashing.
//!
//! Codes are drawn from a restricted alphabet: no vowels (so no
//! accidental words), and none of the characters people misread over
//! the phone (0/O, 1/I, W/Y are out). The backend never stores the code
//! itself, only its SHA-256 hash, so fixtures need both.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated access code.
pub const CODE_LENGTH: usize = 16;

/// Codes are minted in segments of four, matching how they are printed.
const SEGMENT_SIZE: usize = 4;

/// The 27 characters a code may contain.
const ALPHABET: &[u8] = b"BCDFGHJKLMNPQRSTVXZ23456789";

/// Generates a random 16-character access code.
///
/// Uses the thread-local CSPRNG; codes are credentials, even throwaway
/// test ones.
#[must_use]
pub fn generate_uac() -> String {
    let mut rng = rand::rng();
    let mut code = String::with_capacity(CODE_LENGTH);

    for _ in 0..(CODE_LENGTH / SEGMENT_SIZE) {
        for _ in 0..SEGMENT_SIZE {
            let index = rng.random_range(0..ALPHABET.len());
            code.push(ALPHABET[index] as char);
        }
    }

    code
}

/// SHA-256 hash of an access code, as 64 lowercase hex characters.
///
/// This is the form the backend stores and searches by.
#[must_use]
pub fn sha256_hash(uac: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uac.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    debug_assert_eq!(digest.len(), 64, "sha-256 hex digest must be 64 chars");
    digest
}

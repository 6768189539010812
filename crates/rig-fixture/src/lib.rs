//! # rig-fixture
//!
//! Fixture data for end-to-end tests.
//!
//! Currently this is unique access codes (UACs): the 16-character codes
//! respondents type in from a letter, generated here so test scenarios
//! can mint fresh credentials, plus the SHA-256 hashing under which the
//! backend stores them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod uac;

pub use uac::{CODE_LENGTH, generate_uac, sha256_hash};

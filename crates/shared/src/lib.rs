//! Shared utilities for the rental listing backend.
//!
//! Password digests with Argon2id, used by the domain model and surfaced as
//! an error type by the API.

pub mod password;

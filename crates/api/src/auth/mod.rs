//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification with a
//!   configurable work factor.

pub mod password;

//! Admin authentication.
//!
//! - `basic`: `Authorization: Basic` header parsing and credential checks
//! - `password`: Argon2 hashing and verification

pub mod basic;
pub mod password;

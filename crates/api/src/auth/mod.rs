//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`cookies`] -- http-only cookies carrying the access and refresh tokens.

pub mod cookies;
pub mod jwt;
pub mod password;

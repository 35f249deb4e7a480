//! Argon2id hashing of login secrets, stored as PHC strings.

pub mod argon2;
pub mod errors;

pub use argon2::PasswordHasher;
pub use errors::PasswordError;

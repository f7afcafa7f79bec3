//! Artblob Auth - credential hashing
//!
//! Passwords are stored as self-describing Argon2id PHC strings:
//!
//! ```text
//! $argon2id$v=19$m=65536,t=1,p=4$<base64 salt>$<base64 hash>
//! ```
//!
//! Verification reads the cost parameters back out of the stored string, so
//! hashes created under older parameters keep verifying after the defaults
//! change.

mod password;

pub use password::{hash_password, hash_password_with, verify_password, PasswordError, PasswordParams};

//! Authentication primitives: login credentials, stored password hashes, and
//! the signed-in operator.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace.
///
/// # Examples
/// ```
/// use utang::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" tindera ", "sari-sari").unwrap();
/// assert_eq!(creds.username(), "tindera");
/// assert_eq!(creds.password(), "sari-sari");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Operator password held as an Argon2 PHC string.
///
/// # Examples
/// ```
/// use utang::domain::StoredPassword;
///
/// let stored = StoredPassword::hash("sari-sari").unwrap();
/// assert!(stored.as_phc().starts_with("$argon2id$"));
/// assert!(stored.verify("sari-sari"));
/// assert!(!stored.verify("sari-sarI"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct StoredPassword(String);

impl StoredPassword {
    /// Hash `password` with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(Self(phc.to_string()))
    }

    /// Accept a configured PHC string. Returns `None` when it does not parse.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        PasswordHash::new(trimmed).ok()?;
        Some(Self(trimmed.to_owned()))
    }

    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }

    /// Check `password` against the stored hash.
    pub fn verify(&self, password: &str) -> bool {
        PasswordHash::new(&self.0)
            .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
            .is_ok()
    }
}

impl fmt::Debug for StoredPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredPassword(..)")
    }
}

/// Name of the signed-in store operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operator(String);

impl Operator {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("tindera", " spaced password ")]
    fn valid_credentials_trim_username_only(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn stored_password_verifies_only_the_same_password() {
        let stored = StoredPassword::hash("sari-sari").expect("hashes");
        assert!(stored.verify("sari-sari"));
        assert!(!stored.verify("sari-sarI"));
        assert!(!stored.verify(""));
    }

    #[rstest]
    fn hashing_twice_uses_distinct_salts() {
        let first = StoredPassword::hash("sari-sari").expect("hashes");
        let second = StoredPassword::hash("sari-sari").expect("hashes");
        assert_ne!(first, second);
        assert!(second.verify("sari-sari"));
    }

    #[rstest]
    #[case("", false)]
    #[case("5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8", false)]
    #[case("$argon2id$v=19$m=19456,t=2,p=1$c2FyaXNhcmlzYWx0$not base64!", false)]
    fn parse_rejects_non_phc_strings(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(StoredPassword::parse(raw).is_some(), accepted);
    }

    #[rstest]
    fn parse_keeps_a_generated_hash_usable() {
        let generated = StoredPassword::hash("sari-sari").expect("hashes");
        let padded = format!("  {}\n", generated.as_phc());
        let parsed = StoredPassword::parse(&padded).expect("valid PHC string");
        assert_eq!(parsed, generated);
        assert!(parsed.verify("sari-sari"));
    }

    #[rstest]
    fn stored_password_debug_is_redacted() {
        let stored = StoredPassword::hash("password").expect("hashes");
        assert_eq!(format!("{stored:?}"), "StoredPassword(..)");
    }
}

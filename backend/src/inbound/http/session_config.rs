//! Session cookie settings read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning so a laptop
//! can run the server with no setup. Release builds refuse to start unless
//! every toggle is present and valid and the signing key comes from a file.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const DEFAULT_KEY_PATH: &str = "/var/run/secrets/utang_session_key";
const MIN_KEY_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Defaults are tolerated with a warning.
    Debug,
    /// Every toggle must be set explicitly.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// `Ok(fallback)` after a warning in debug builds, `Err(error)` otherwise.
    fn tolerate<T>(
        self,
        fallback: T,
        error: SessionConfigError,
    ) -> Result<T, SessionConfigError> {
        match self {
            Self::Debug => {
                warn!(%error, "using session default");
                Ok(fallback)
            }
            Self::Release => Err(error),
        }
    }
}

/// Validated session cookie settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Short hex fingerprint of the signing key, safe to log.
    ///
    /// # Examples
    /// ```
    /// use actix_web::cookie::{Key, SameSite};
    /// use utang::inbound::http::session_config::SessionSettings;
    ///
    /// let settings = SessionSettings {
    ///     key: Key::derive_from(&[7; 64]),
    ///     cookie_secure: true,
    ///     same_site: SameSite::Strict,
    /// };
    /// assert_eq!(settings.key_fingerprint().len(), 16);
    /// ```
    pub fn key_fingerprint(&self) -> String {
        let digest = Sha256::digest(self.key.signing());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn bool_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    fallback: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return mode.tolerate(fallback, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => mode.tolerate(
            fallback,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return mode.tolerate(fallback, SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => mode.tolerate(SameSite::None, SessionConfigError::InsecureSameSiteNone),
        _ => mode.tolerate(
            fallback,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn signing_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
    );
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using temporary session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };
    let length = bytes.len();
    if mode == BuildMode::Release && length < MIN_KEY_LEN {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: MIN_KEY_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

/// Read and validate session settings.
///
/// `SESSION_ALLOW_EPHEMERAL=1` lets a missing key file fall back to a
/// per-process key; it is rejected outright in release builds.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = bool_toggle(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = bool_toggle(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = signing_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

#[cfg(test)]
mod tests;

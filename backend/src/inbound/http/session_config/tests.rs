//! Unit tests for session configuration parsing.

use std::collections::HashMap;
use std::io::Write;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary key file");
    file.write_all(&vec![b'k'; len]).expect("write key bytes");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn full_key() -> NamedTempFile {
    key_file(MIN_KEY_LEN)
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key.path().display().to_string()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

#[rstest]
fn release_accepts_complete_configuration(full_key: NamedTempFile) {
    let env = mock_env(release_vars(&full_key));

    let settings =
        session_settings_from_env(&env, BuildMode::Release).expect("valid configuration");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn the_same_key_file_yields_the_same_fingerprint(full_key: NamedTempFile) {
    let first = session_settings_from_env(&mock_env(release_vars(&full_key)), BuildMode::Release)
        .expect("valid configuration");
    let second = session_settings_from_env(&mock_env(release_vars(&full_key)), BuildMode::Release)
        .expect("valid configuration");

    assert_eq!(first.key_fingerprint(), second.key_fingerprint());
    assert_eq!(first.key_fingerprint().len(), FINGERPRINT_BYTES * 2);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(full_key: NamedTempFile, #[case] missing: &'static str) {
    let mut vars = release_vars(&full_key);
    vars.remove(missing);

    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);

    assert!(matches!(
        result,
        Err(SessionConfigError::MissingEnv { name }) if name == missing
    ));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(ALLOW_EPHEMERAL_ENV, "")]
fn release_rejects_invalid_values(
    full_key: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let mut vars = release_vars(&full_key);
    vars.insert(name, value.to_owned());

    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);

    assert!(matches!(
        result,
        Err(SessionConfigError::InvalidEnv { name: bad, .. }) if bad == name
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure_cookie(full_key: NamedTempFile) {
    let mut vars = release_vars(&full_key);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);

    assert!(matches!(result, Err(SessionConfigError::InsecureSameSiteNone)));
}

#[rstest]
fn release_rejects_ephemeral_keys(full_key: NamedTempFile) {
    let mut vars = release_vars(&full_key);
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());

    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);

    assert!(matches!(result, Err(SessionConfigError::EphemeralNotAllowed)));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(MIN_KEY_LEN - 1);

    let result = session_settings_from_env(&mock_env(release_vars(&short)), BuildMode::Release);

    assert!(matches!(
        result,
        Err(SessionConfigError::KeyTooShort { length, .. }) if length == MIN_KEY_LEN - 1
    ));
}

#[rstest]
fn release_rejects_missing_key_file(full_key: NamedTempFile) {
    let mut vars = release_vars(&full_key);
    vars.insert(KEY_FILE_ENV, "/nonexistent/utang/session_key".to_owned());

    let result = session_settings_from_env(&mock_env(vars), BuildMode::Release);

    assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
}

#[rstest]
fn debug_tolerates_an_empty_environment() {
    let settings = session_settings_from_env(&mock_env(HashMap::new()), BuildMode::Debug)
        .expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_accepts_short_keys_and_explicit_toggles() {
    let short = key_file(8);
    let vars = HashMap::from([
        (KEY_FILE_ENV, short.path().display().to_string()),
        (COOKIE_SECURE_ENV, "false".to_owned()),
        (SAMESITE_ENV, "none".to_owned()),
    ]);

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");

    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::None);
}

#[rstest]
fn current_mode_tracks_debug_assertions() {
    let expected = if cfg!(debug_assertions) {
        BuildMode::Debug
    } else {
        BuildMode::Release
    };
    assert_eq!(BuildMode::current(), expected);
}

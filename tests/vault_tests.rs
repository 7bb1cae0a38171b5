//! Integration tests for the untold vault handle.

use std::fs;

use tempfile::TempDir;
use untold::binder::{Bindable, Field};
use untold::crypto::KeyPair;
use untold::errors::KeyKind;
use untold::{Settings, UntoldError, Vault};

/// Settings rooted in a fresh temp dir.  Each test gets its own key
/// variable name so parallel tests never see each other's keys.
fn settings(dir: &TempDir, env: &str, key_var: &str) -> Settings {
    Settings::default()
        .with_path_prefix(dir.path().join("untold").to_string_lossy())
        .with_environment(env)
        .with_key_env_var(key_var)
}

// ---------------------------------------------------------------------------
// Create, put, get
// ---------------------------------------------------------------------------

#[test]
fn production_environment_end_to_end() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, "production", "UNTOLD_IT_E2E_KEY");

    let vault = Vault::create_environment(settings.clone()).unwrap();
    vault.put("api_key", "xyz", false).unwrap();
    assert_eq!(vault.get("api_key").unwrap(), "xyz");

    // A second handle reads the same value from disk.
    let reopened = Vault::new(settings).unwrap();
    assert_eq!(reopened.get("api_key").unwrap(), "xyz");

    let dup = reopened.put("api_key", "abc", false);
    assert!(matches!(dup, Err(UntoldError::SecretAlreadyExists { .. })));
    assert!(dup.unwrap_err().is_already_exists());

    reopened.put("api_key", "abc", true).unwrap();
    assert_eq!(reopened.get("api_key").unwrap(), "abc");
}

#[test]
fn secret_files_do_not_reveal_names_or_values() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, "staging", "UNTOLD_IT_OPAQUE_KEY");
    let vault = Vault::create_environment(settings.clone()).unwrap();
    vault.put("db_password", "hunter2", false).unwrap();

    for entry in fs::read_dir(settings.environment_dir()).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        assert!(!name.contains("db_password"));
        let contents = fs::read_to_string(entry.path()).unwrap();
        assert!(!contents.contains("hunter2"));
    }
}

#[test]
fn missing_secret_is_not_found() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::create_environment(settings(&dir, "dev", "UNTOLD_IT_MISSING_KEY")).unwrap();

    let err = vault.get("nope").unwrap_err();
    assert!(matches!(err, UntoldError::SecretNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn unknown_environment_has_no_public_key() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::new(settings(&dir, "ghost", "UNTOLD_IT_GHOST_KEY")).unwrap();

    let err = vault.put("a", "1", false).unwrap_err();
    assert!(matches!(
        err,
        UntoldError::KeyNotFound {
            kind: KeyKind::Public,
            ..
        }
    ));
}

#[test]
fn missing_private_key_is_reported() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, "ci", "UNTOLD_IT_NOPRIV_KEY");
    let vault = Vault::create_environment(settings.clone()).unwrap();
    vault.put("token", "t0k3n", false).unwrap();
    fs::remove_file(settings.private_key_path()).unwrap();

    // Writing still works with only the public key.
    let vault = Vault::new(settings).unwrap();
    vault.put("other", "value", false).unwrap();

    let err = vault.get("token").unwrap_err();
    assert!(matches!(
        err,
        UntoldError::KeyNotFound {
            kind: KeyKind::Private,
            ..
        }
    ));
}

#[test]
fn key_variable_beats_private_key_file() {
    let dir = TempDir::new().unwrap();
    let key_var = "UNTOLD_IT_PRECEDENCE_KEY";
    let settings = settings(&dir, "qa", key_var);
    let vault = Vault::create_environment(settings.clone()).unwrap();
    vault.put("a", "1", false).unwrap();

    let private = fs::read_to_string(settings.private_key_path()).unwrap();
    // Replace the file with an unrelated key; the variable must win.
    fs::write(
        settings.private_key_path(),
        KeyPair::generate().encode_private().as_str(),
    )
    .unwrap();

    std::env::set_var(key_var, private.trim());
    let result = Vault::new(settings).unwrap().get("a");
    std::env::remove_var(key_var);

    assert_eq!(result.unwrap(), "1");
}

#[test]
fn creating_an_existing_environment_fails() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, "dev", "UNTOLD_IT_DUPENV_KEY");
    Vault::create_environment(settings.clone()).unwrap();

    let err = Vault::create_environment(settings).unwrap_err();
    assert!(matches!(err, UntoldError::EnvironmentAlreadyExists(ref e) if e == "dev"));
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

#[test]
fn rotation_preserves_values_and_replaces_keys() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, "production", "UNTOLD_IT_ROTATE_KEY");
    let mut vault = Vault::create_environment(settings.clone()).unwrap();
    vault.put("api_key", "xyz", false).unwrap();
    vault.put("db_password", "hunter2", false).unwrap();

    let old_public = fs::read_to_string(settings.public_key_path()).unwrap();
    let old_private = fs::read_to_string(settings.private_key_path()).unwrap();

    let report = vault.rotate().unwrap();
    assert_eq!(report.environment, "production");
    assert_eq!(report.secrets, 2);

    assert_ne!(fs::read_to_string(settings.public_key_path()).unwrap(), old_public);
    assert_ne!(fs::read_to_string(settings.private_key_path()).unwrap(), old_private);

    // The same handle keeps working with the new keys.
    assert_eq!(vault.get("api_key").unwrap(), "xyz");

    // So does a fresh handle reading the new key files.
    let fresh = Vault::new(settings.clone()).unwrap();
    assert_eq!(fresh.get("db_password").unwrap(), "hunter2");

    // The old private key no longer opens anything.
    let stale = Vault::new(settings).unwrap().with_private_key(old_private.trim());
    assert!(stale.get("api_key").is_err());
}

#[test]
fn failed_key_write_leaves_secrets_under_unsaved_key() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir, "fragile", "UNTOLD_IT_FRAGILE_KEY");
    let vault = Vault::create_environment(settings.clone()).unwrap();
    vault.put("a", "1", false).unwrap();

    // Keep the private key in memory and turn the key file into a
    // directory so the final key write fails.
    let private = fs::read_to_string(settings.private_key_path()).unwrap();
    fs::remove_file(settings.private_key_path()).unwrap();
    fs::create_dir(settings.private_key_path()).unwrap();

    let mut vault = Vault::new(settings.clone())
        .unwrap()
        .with_private_key(private.trim());
    let result = vault.rotate();
    assert!(matches!(result, Err(UntoldError::Io(_))));

    // Secrets were already resealed, so the old key cannot open them.
    let stale = Vault::new(settings).unwrap().with_private_key(private.trim());
    assert!(matches!(
        stale.get("a"),
        Err(UntoldError::DecryptionFailed)
    ));
}

#[test]
fn rotating_an_empty_environment_reports_zero() {
    let dir = TempDir::new().unwrap();
    let mut vault =
        Vault::create_environment(settings(&dir, "empty", "UNTOLD_IT_EMPTY_KEY")).unwrap();
    let report = vault.rotate().unwrap();
    assert_eq!(report.secrets, 0);
}

// ---------------------------------------------------------------------------
// Loading into structs
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Database {
    url: String,
    password: String,
}

impl Bindable for Database {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![Field::plain(), Field::secret("db_password", &mut self.password)]
    }
}

#[derive(Default)]
struct AppConfig {
    api_key: String,
    database: Database,
}

impl Bindable for AppConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::secret("api_key", &mut self.api_key),
            Field::nested(&mut self.database),
        ]
    }
}

#[test]
fn load_fills_nested_struct() {
    let dir = TempDir::new().unwrap();
    let vault = Vault::create_environment(settings(&dir, "app", "UNTOLD_IT_LOAD_KEY")).unwrap();
    vault.put("api_key", "xyz", false).unwrap();
    vault.put("db_password", "hunter2", false).unwrap();

    let mut config = AppConfig::default();
    config.database.url = "postgres://localhost".to_string();
    vault.load(&mut config).unwrap();

    assert_eq!(config.api_key, "xyz");
    assert_eq!(config.database.password, "hunter2");
    assert_eq!(config.database.url, "postgres://localhost");
}

#[test]
fn load_fails_on_missing_secret() {
    let dir = TempDir::new().unwrap();
    let vault =
        Vault::create_environment(settings(&dir, "app", "UNTOLD_IT_LOADMISS_KEY")).unwrap();
    vault.put("api_key", "xyz", false).unwrap();

    let mut config = AppConfig::default();
    let err = vault.load(&mut config).unwrap_err();

    assert!(matches!(err, UntoldError::SecretNotFound { ref name, .. } if name == "db_password"));
    // Fields visited before the failure keep their values.
    assert_eq!(config.api_key, "xyz");
}

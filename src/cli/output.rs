//! Terminal output for the `untold` binary.
//!
//! Results go to stdout; warnings and failures go to stderr, so the value
//! printed by `show-secret` can be piped without noise.

use console::style;

use crate::errors::{KeyKind, UntoldError};

/// A completed action: "✓ {msg}" on stdout.
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// "⚠ {msg}" on stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// A dim follow-up line: "→ {msg}".
pub fn hint(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// No `--env` flag and no positional environment.
pub fn using_default_environment(environment: &str) {
    warning(&format!(
        "No environment provided, using default - '{environment}'"
    ));
}

/// Report a failed command on stderr, with a suggestion when one helps.
pub fn failure(err: &UntoldError) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), err);
    if let Some(next) = next_step(err) {
        eprintln!("{} {}", style("\u{2192}").dim(), style(next).dim());
    }
}

fn next_step(err: &UntoldError) -> Option<&'static str> {
    match err {
        UntoldError::EnvironmentNotFound(_) => Some("Create it with `untold new-env <name>`."),
        UntoldError::KeyNotFound {
            kind: KeyKind::Private,
            ..
        } => {
            Some("Pass the private key with --key or the key variable (UNTOLD_KEY by default).")
        }
        UntoldError::SecretNotFound { .. } => Some("Add it with `untold add-secret <name>`."),
        UntoldError::DecryptionFailed => {
            Some("Check that the private key belongs to this environment.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_private_key_suggests_key_sources() {
        let err = UntoldError::KeyNotFound {
            environment: "prod".into(),
            kind: KeyKind::Private,
        };
        assert!(next_step(&err).unwrap().contains("--key"));
    }

    #[test]
    fn missing_public_key_has_no_suggestion() {
        let err = UntoldError::KeyNotFound {
            environment: "prod".into(),
            kind: KeyKind::Public,
        };
        assert!(next_step(&err).is_none());
    }

    #[test]
    fn missing_secret_points_at_add_secret() {
        let err = UntoldError::SecretNotFound {
            name: "api_key".into(),
            environment: "prod".into(),
        };
        assert!(next_step(&err).unwrap().contains("add-secret"));
    }
}

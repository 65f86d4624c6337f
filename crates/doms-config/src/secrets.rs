//! Resource-index credential resolution.
//!
//! # Contract
//! - Config YAML stores only the env var NAME for the password
//!   (`risearch.password_env`).
//! - Callers invoke [`resolve_credentials`] once at startup and pass the result
//!   to the client constructor; no other code reads the environment.
//! - `Debug` output redacts the password.
//!
//! When the named variable is unset the stock Fedora development password is
//! used, which is what a fresh local Fedora answers to.

use crate::AuditConfig;

/// Env var consulted when the config does not name one.
pub const DEFAULT_PASSWORD_ENV: &str = "DOMS_RISEARCH_PASSWORD";

const FEDORA_DEV_PASSWORD: &str = "fedoraAdminPass";

/// Basic-auth credentials. **Password is redacted in `Debug` output.**
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub username: String,
    pub password: String,
    /// `true` when the password came from the environment.
    pub from_env: bool,
}

impl std::fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("from_env", &self.from_env)
            .finish()
    }
}

/// Returns `None` if the variable is unset or blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve the risearch credentials for `cfg`.
///
/// `username_override` (from the command line) wins over the config value.
pub fn resolve_credentials(
    cfg: &AuditConfig,
    username_override: Option<&str>,
) -> ResolvedCredentials {
    let username = username_override
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(cfg.risearch.username.as_str())
        .to_string();

    let var = cfg.risearch.password_env.trim();
    let var = if var.is_empty() { DEFAULT_PASSWORD_ENV } else { var };

    match resolve_env(var) {
        Some(password) => ResolvedCredentials {
            username,
            password,
            from_env: true,
        },
        None => ResolvedCredentials {
            username,
            password: FEDORA_DEV_PASSWORD.to_string(),
            from_env: false,
        },
    }
}

use std::collections::HashMap;

use crate::error::{AppError, AppResult};

/// Demo accounts served when no `APP_USERS` override is configured.
const DEMO_USERS: &[(&str, &str)] = &[("admin", "admin123"), ("yuvan", "yuvan123")];

/// Static username -> password mapping, fixed at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl Default for CredentialStore {
    fn default() -> Self { Self::demo() }
}

impl CredentialStore {
    pub fn demo() -> Self {
        let users = DEMO_USERS.iter().map(|(u, p)| (u.to_string(), p.to_string())).collect();
        Self { users }
    }

    /// Build from explicit pairs. Rejects empty usernames and duplicates.
    pub fn from_pairs<I, U, P>(pairs: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        let mut users = HashMap::new();
        for (u, p) in pairs {
            let u = u.into();
            if u.is_empty() {
                return Err(AppError::config("bad_users", "empty username in credential set"));
            }
            if users.insert(u.clone(), p.into()).is_some() {
                return Err(AppError::config("bad_users", format!("duplicate username '{}'", u)));
            }
        }
        if users.is_empty() {
            return Err(AppError::config("bad_users", "credential set is empty"));
        }
        Ok(Self { users })
    }

    /// Parse the `user:pass[,user:pass...]` form used by `APP_USERS`.
    /// Passwords may contain ':'; only the first one separates the pair.
    /// Usernames are trimmed, passwords are kept byte for byte.
    pub fn parse(spec: &str) -> AppResult<Self> {
        let mut pairs = Vec::new();
        for entry in spec.split(',') {
            if entry.trim().is_empty() { continue; }
            let Some((u, p)) = entry.split_once(':') else {
                return Err(AppError::config("bad_users", format!("missing ':' in entry '{}'", entry.trim())));
            };
            pairs.push((u.trim().to_string(), p.to_string()));
        }
        Self::from_pairs(pairs)
    }

    /// Literal string comparison, no hashing and not constant-time. Kept for
    /// compatibility with the demo accounts; do not reuse outside the demo.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(stored) => stored == password,
            None => false,
        }
    }

    pub fn contains(&self, username: &str) -> bool { self.users.contains_key(username) }

    pub fn len(&self) -> usize { self.users.len() }

    pub fn is_empty(&self) -> bool { self.users.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_accounts_verify() {
        let store = CredentialStore::demo();
        assert!(store.verify("admin", "admin123"));
        assert!(store.verify("yuvan", "yuvan123"));
        assert!(!store.verify("admin", "wrong"));
        assert!(!store.verify("admin", "ADMIN123"));
        assert!(!store.verify("nobody", "admin123"));
        assert!(!store.verify("", ""));
    }

    #[test]
    fn no_normalization_on_compare() {
        let store = CredentialStore::demo();
        assert!(!store.verify("admin ", "admin123"));
        assert!(!store.verify("admin", " admin123"));
    }

    #[test]
    fn parse_accepts_colons_in_password() {
        let store = CredentialStore::parse("ops:a:b:c, dev:pw").unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.verify("ops", "a:b:c"));
        assert!(store.verify("dev", "pw"));
    }

    #[test]
    fn parse_keeps_password_whitespace() {
        let store = CredentialStore::parse("ops:pw , dev: lead").unwrap();
        assert!(store.verify("ops", "pw "));
        assert!(!store.verify("ops", "pw"));
        assert!(store.verify("dev", " lead"));
        assert!(!store.verify("dev", "lead"));

        let store = CredentialStore::parse("ops:pw ").unwrap();
        assert!(store.verify("ops", "pw "));
        assert!(!store.verify("ops", "pw"));
    }

    #[test]
    fn parse_rejects_bad_entries() {
        assert!(matches!(CredentialStore::parse("admin"), Err(AppError::Config { .. })));
        assert!(CredentialStore::parse(":pw").is_err());
        assert!(CredentialStore::parse("a:1,a:2").is_err());
        assert!(CredentialStore::parse(" , ").is_err());
    }
}

//! Pod identity and environment lookups used for display only.
//! Neither lookup can fail from the caller's point of view: absent values fall back
//! to a default.

use std::collections::HashMap;

pub trait HostEnvironment: Send + Sync {
    /// Stable identifier of the current pod/process.
    fn hostname(&self) -> String;
    /// Configured value of `name`, or `default` when unset.
    fn var(&self, name: &str, default: &str) -> String;
}

/// Reads the real host name and process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnvironment;

impl HostEnvironment for SystemEnvironment {
    fn hostname(&self) -> String {
        hostname::get()
            .ok()
            .map(|h| h.to_string_lossy().to_string())
            .filter(|h| !h.is_empty())
            .or_else(|| std::env::var("HOSTNAME").ok())
            .unwrap_or_else(|| "localhost".to_string())
    }

    fn var(&self, name: &str, default: &str) -> String {
        std::env::var(name).unwrap_or_else(|_| default.to_string())
    }
}

/// Fixed host name and variables, for tests and local demos.
#[derive(Debug, Default, Clone)]
pub struct StaticEnvironment {
    pub hostname: String,
    pub vars: HashMap<String, String>,
}

impl StaticEnvironment {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self { hostname: hostname.into(), vars: HashMap::new() }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl HostEnvironment for StaticEnvironment {
    fn hostname(&self) -> String { self.hostname.clone() }

    fn var(&self, name: &str, default: &str) -> String {
        self.vars.get(name).cloned().unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_env_falls_back_to_default() {
        let env = StaticEnvironment::new("pod-a").with_var("APP_VERSION", "v2");
        assert_eq!(env.hostname(), "pod-a");
        assert_eq!(env.var("APP_VERSION", "v1"), "v2");
        assert_eq!(env.var("MISSING", "fallback"), "fallback");
    }

    #[test]
    fn system_hostname_is_never_empty() {
        assert!(!SystemEnvironment.hostname().is_empty());
    }

    #[test]
    fn system_var_default_for_unset_name() {
        assert_eq!(SystemEnvironment.var("PODVIEW_SURELY_UNSET_VAR", "dflt"), "dflt");
    }
}

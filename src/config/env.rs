// src/config/env.rs

//! Environment access for configuration.
//!
//! Loaders take an [`EnvLookup`] instead of reading `std::env` directly, so
//! tests can resolve configuration from a closure over a plain map.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Lookup of one environment variable by name.
pub trait EnvLookup {
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`EnvLookup::get`], treating empty values as unset.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<F> EnvLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        self(key)
    }
}

static VAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("variable reference pattern is valid")
});

/// Expand `$VAR` and `${VAR}` references.
///
/// References to unset variables are left untouched, matching shell-less
/// path expansion.
pub fn expand_vars(input: &str, env: &dyn EnvLookup) -> String {
    VAR_REF
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            env.get(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

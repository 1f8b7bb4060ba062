//! Environment variable interpolation for config files.
//!
//! Recognised forms:
//! - `${VAR}`: value of `VAR`, an error if unset
//! - `${VAR:-default}`: `default` when `VAR` is unset or empty
//! - `$$`: a literal `$`
//!
//! A `$` followed by anything else is left untouched.

use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;

static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("interpolation pattern is valid")
});

/// Output of [`interpolate`].
#[derive(Debug)]
pub struct InterpolationResult {
    pub text: String,
    /// One message per unresolved variable.
    pub errors: Vec<String>,
}

impl InterpolationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Substitute environment variables in `input`.
///
/// Unresolved references are kept verbatim and reported in `errors`, so every
/// missing variable is listed at once.
pub fn interpolate(input: &str) -> InterpolationResult {
    let mut errors = Vec::new();

    let text = VAR_PATTERN.replace_all(input, |caps: &Captures| {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            return "$".to_string();
        };
        let default = caps.get(2).map(|m| m.as_str());

        match (env::var(name), default) {
            (Ok(value), Some(default)) if value.is_empty() => default.to_string(),
            (Ok(value), _) if value.contains(['\n', '\r']) => {
                errors.push(format!("environment variable '{name}' contains a newline"));
                caps[0].to_string()
            }
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.to_string(),
            (Err(_), None) => {
                errors.push(format!("environment variable '{name}' is not set"));
                caps[0].to_string()
            }
        }
    });

    InterpolationResult {
        text: text.into_owned(),
        errors,
    }
}

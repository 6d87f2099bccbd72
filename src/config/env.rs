//! Environment variable interpolation for string values.
//!
//! Supports `${NAME}` and `${NAME|default}`. A variable that is unset or empty
//! takes the default; without a default the token is left as written.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static ENV_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([\w\-| ]+)\}").expect("env token pattern is valid"));

/// Interpolates `${...}` tokens using the process environment.
pub fn interpolate(value: &str) -> Cow<'_, str> {
    interpolate_with(value, |name| std::env::var(name).ok())
}

/// Interpolates `${...}` tokens using `lookup` to read variables.
///
/// Every distinct token is resolved once and all its occurrences get the same
/// replacement.
pub fn interpolate_with<F>(value: &str, mut lookup: F) -> Cow<'_, str>
where
    F: FnMut(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Cow::Borrowed(value);
    }

    let mut resolved: HashMap<String, String> = HashMap::new();

    ENV_TOKEN.replace_all(value, |caps: &Captures<'_>| {
        let token = &caps[0];
        if let Some(hit) = resolved.get(token) {
            return hit.clone();
        }

        let (name, default) = match caps[1].split_once('|') {
            Some((name, default)) => (name.trim(), default.trim()),
            None => (&caps[1], token),
        };

        let replacement = lookup(name)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string());
        resolved.insert(token.to_string(), replacement.clone());
        replacement
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_no_token_is_borrowed() {
        let out = interpolate_with("plain value $HOME", vars(&[]));
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "plain value $HOME");
    }

    #[test]
    fn test_simple_variable() {
        let out = interpolate_with("${APP_HOME}/bin", vars(&[("APP_HOME", "/opt/app")]));
        assert_eq!(out, "/opt/app/bin");
    }

    #[test]
    fn test_default_used_when_unset() {
        let out = interpolate_with("${ENV_X|fallback}", vars(&[]));
        assert_eq!(out, "fallback");
    }

    #[test]
    fn test_default_used_when_empty() {
        let out = interpolate_with("${ENV_X|fallback}", vars(&[("ENV_X", "")]));
        assert_eq!(out, "fallback");
    }

    #[test]
    fn test_variable_overrides_default() {
        let out = interpolate_with("${ENV_X|fallback}", vars(&[("ENV_X", "v")]));
        assert_eq!(out, "v");
    }

    #[test]
    fn test_spaces_around_pipe_are_trimmed() {
        let out = interpolate_with("${ APP_ENV | prod }", vars(&[("APP_ENV", "dev")]));
        assert_eq!(out, "dev");

        let out = interpolate_with("${APP_ENV | prod}", vars(&[]));
        assert_eq!(out, "prod");
    }

    #[test]
    fn test_unset_without_default_keeps_token() {
        let out = interpolate_with("root=${NOT_SET}/x", vars(&[]));
        assert_eq!(out, "root=${NOT_SET}/x");
    }

    #[test]
    fn test_multiple_tokens_and_repeats() {
        let mut calls = 0;
        let out = interpolate_with("${A}-${B|b}-${A}", |name| {
            calls += 1;
            (name == "A").then(|| "a".to_string())
        });
        assert_eq!(out, "a-b-a");
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_unmatched_syntax_left_alone() {
        let out = interpolate_with("${unclosed and ${a.b}", vars(&[("a.b", "x")]));
        assert_eq!(out, "${unclosed and ${a.b}");
    }

    #[test]
    fn test_process_environment() {
        std::env::set_var("DRAGON_CFG_ENV_TEST", "from-env");
        assert_eq!(interpolate("${DRAGON_CFG_ENV_TEST|no}"), "from-env");
        assert_eq!(interpolate("${DRAGON_CFG_ENV_UNSET_TEST|no}"), "no");
    }
}

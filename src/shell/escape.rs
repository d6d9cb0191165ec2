//! Shell word escaping
//!
//! Turns an arbitrary string into a single token that a POSIX shell reads back as
//! exactly the original string: no globbing, no parameter expansion, no command
//! substitution.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches any character that is not safe to leave unquoted.
static UNSAFE_CHAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_@%+=:,./-]").expect("escape pattern is a valid regex")
});

/// Escapes `value` so it is interpreted as one literal shell word.
///
/// Strings made only of safe characters are returned unchanged, which keeps
/// the generated script readable (`git fetch origin` stays as-is). Everything
/// else is wrapped in single quotes; embedded single quotes are closed, emitted
/// inside double quotes, and reopened.
///
/// # Example
///
/// ```
/// use jobscript::shell::escape::shell_escape;
///
/// assert_eq!(shell_escape("origin"), "origin");
/// assert_eq!(shell_escape(""), "''");
/// assert_eq!(shell_escape("it's"), r#"'it'"'"'s'"#);
/// ```
pub fn shell_escape(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    if !UNSAFE_CHAR.is_match(value) {
        return value.to_string();
    }

    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}

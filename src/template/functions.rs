//! String functions available inside templates.

use regex::Regex;

use crate::variables::VariableMapping;

/// Resolve a function argument: a bare variable name becomes its value,
/// anything else is taken literally. Surrounding double quotes are dropped.
pub fn resolve_argument(arg: &str, variables: &VariableMapping) -> String {
    let arg = arg.trim();
    let value = variables.get(arg).unwrap_or(arg);
    remove_quotes(value).to_string()
}

/// Strip one pair of surrounding double quotes, if present.
pub fn remove_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Shorten `text` to `length` chars, the last three replaced by `...`.
pub fn truncate(text: &str, length: usize) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let kept: String = text.chars().take(length.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Up to `length` chars starting at char index `start`; clipped silently.
pub fn substr(text: &str, start: usize, length: usize) -> String {
    text.chars().skip(start).take(length).collect()
}

/// First match of `pattern` in `text`, or empty when nothing matches or the
/// pattern does not compile.
pub fn regex_match(text: &str, pattern: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        Err(e) => {
            tracing::debug!("Invalid regex pattern {:?}: {}", pattern, e);
            String::new()
        }
    }
}

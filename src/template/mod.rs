//! Notification title/body templates.
//!
//! Two placeholder forms are supported:
//!
//! - `{NAME}` substitutes a variable (case-sensitive); unknown names are left as-is.
//! - `{truncate(text, n)}`, `{substr(text, start, len)}`, `{regex(text, pattern)}`
//!   where `text` is either a variable name or a literal.
//!
//! Calls do not nest: a call's argument text is never evaluated again, and a
//! call that runs into another placeholder is left as text.

pub mod functions;
pub mod parser;

pub use parser::{parse, Call, Function, Node};

use crate::variables::VariableMapping;

use functions::{regex_match, remove_quotes, resolve_argument, substr, truncate};

/// Format an optional template. `None` stays `None`.
pub fn format_template(template: Option<&str>, variables: &VariableMapping) -> Option<String> {
    template.map(|t| render(t, variables))
}

/// Render a template against `variables`.
pub fn render(template: &str, variables: &VariableMapping) -> String {
    if template.is_empty() {
        return String::new();
    }
    Renderer::new(variables).render(&parse(template))
}

struct Renderer<'a> {
    variables: &'a VariableMapping,
    /// Set once a substr call with comma-bearing text fails to parse; later
    /// calls of that kind are left untouched.
    substr_halted: bool,
}

impl<'a> Renderer<'a> {
    fn new(variables: &'a VariableMapping) -> Self {
        Self {
            variables,
            substr_halted: false,
        }
    }

    fn render(mut self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Variable(name) => match self.variables.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
                Node::Call { call, raw } => out.push_str(&self.call(call, raw)),
                Node::Malformed { function, raw } => {
                    tracing::debug!("Leaving malformed {} call unresolved: {}", function, raw);
                    match function {
                        Function::Regex => {}
                        Function::Substr => {
                            self.substr_halted = true;
                            out.push_str(raw);
                        }
                        Function::Truncate => out.push_str(raw),
                    }
                }
            }
        }
        out
    }

    fn call(&mut self, call: &Call, raw: &str) -> String {
        match call {
            Call::Truncate { text, length } => {
                truncate(&resolve_argument(text, self.variables), *length)
            }
            Call::Substr {
                text,
                start,
                length,
                simple,
            } => {
                if self.substr_halted && !simple {
                    return raw.to_string();
                }
                substr(&resolve_argument(text, self.variables), *start, *length)
            }
            Call::Regex { text, pattern } => regex_match(
                &resolve_argument(text, self.variables),
                remove_quotes(pattern),
            ),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> VariableMapping {
        pairs.iter().copied().collect()
    }

    // -------------------------------------------------------------------------
    // Plain substitution
    // -------------------------------------------------------------------------

    #[test]
    fn test_format_template_none() {
        assert_eq!(format_template(None, &vars(&[("GIT_REPO", "repo")])), None);
    }

    #[test]
    fn test_format_template_empty() {
        assert_eq!(
            format_template(Some(""), &vars(&[("GIT_REPO", "repo")])),
            Some(String::new())
        );
    }

    #[test]
    fn test_render_no_placeholders() {
        let v = vars(&[("GIT_REPO", "repo"), ("GIT_BRANCH", "main")]);
        assert_eq!(render("Static notification title", &v), "Static notification title");
    }

    #[test]
    fn test_render_basic() {
        let v = vars(&[("GIT_REPO", "my-repo"), ("GIT_BRANCH", "main")]);
        assert_eq!(
            render("Repository: {GIT_REPO}, Branch: {GIT_BRANCH}", &v),
            "Repository: my-repo, Branch: main"
        );
    }

    #[test]
    fn test_render_multiple_occurrences() {
        let v = vars(&[("GIT_REPO", "test"), ("GIT_BRANCH", "dev")]);
        assert_eq!(
            render("{GIT_REPO} - {GIT_BRANCH} - {GIT_REPO}", &v),
            "test - dev - test"
        );
    }

    #[test]
    fn test_render_missing_variable_left_verbatim() {
        let v = vars(&[("GIT_REPO", "repo")]);
        assert_eq!(render("{GIT_REPO} - {UNKNOWN_VAR}", &v), "repo - {UNKNOWN_VAR}");
    }

    #[test]
    fn test_render_is_case_sensitive() {
        let v = vars(&[("GIT_REPO", "repo")]);
        assert_eq!(render("{git_repo}", &v), "{git_repo}");
    }

    #[test]
    fn test_render_msg_variable() {
        let v = vars(&[("GIT_REPO", "repo"), ("MSG0", "Third message")]);
        assert_eq!(render("{GIT_REPO}: {MSG0}", &v), "repo: Third message");
    }

    #[test]
    fn test_render_does_not_substitute_inside_values() {
        let v = vars(&[("MSG0", "{GIT_REPO}"), ("GIT_REPO", "repo")]);
        assert_eq!(render("{MSG0}", &v), "{GIT_REPO}");
    }

    // -------------------------------------------------------------------------
    // Functions
    // -------------------------------------------------------------------------

    #[test]
    fn test_truncate_literal() {
        let v = VariableMapping::default();
        assert_eq!(
            render(
                "{truncate(This is a very long message that needs to be truncated, 20)}",
                &v
            ),
            "This is a very lo..."
        );
        assert_eq!(render("{truncate(Short, 20)}", &v), "Short");
    }

    #[test]
    fn test_truncate_spacing_variants() {
        let v = VariableMapping::default();
        assert_eq!(render("{truncate( Test text , 5 )}", &v), "Te...");
        assert_eq!(render("{truncate(Test text,5)}", &v), "Te...");
    }

    #[test]
    fn test_substr_literal_with_comma() {
        let v = VariableMapping::default();
        assert_eq!(render("{substr(Hello, World!, 7, 5)}", &v), "World");
    }

    #[test]
    fn test_substr_from_start() {
        let v = VariableMapping::default();
        assert_eq!(render("{substr(Testing substring, 0, 7)}", &v), "Testing");
    }

    #[test]
    fn test_substr_quoted_literal() {
        let v = vars(&[("MSG0", "ignored")]);
        assert_eq!(render("{substr(\"MSG0 text\", 0, 4)}", &v), "MSG0");
    }

    #[test]
    fn test_multiple_functions() {
        let v = VariableMapping::default();
        assert_eq!(
            render(
                "{truncate(First long text that needs truncation, 15)} | {substr(Second text for substring, 7, 4)}",
                &v
            ),
            "First long t... | text"
        );
    }

    #[test]
    fn test_functions_with_variables() {
        let v = vars(&[
            ("MSG0", "This is a very long message that should be truncated"),
            ("CWD", "/home/user/very/long/path/to/project"),
        ]);
        let result = render("Message: {truncate(MSG0, 25)}\nPath: {substr(CWD, 0, 15)}", &v);
        assert_eq!(result, "Message: This is a very long me...\nPath: /home/user/very");
    }

    #[test]
    fn test_regex_function() {
        let v = vars(&[("MSG0", "Version 1.2.3 is available")]);
        assert_eq!(render(r"{regex(MSG0, [0-9]+\.[0-9]+\.[0-9]+)}", &v), "1.2.3");
        assert_eq!(
            render(r#"{regex("Version 1.2.3 is available", "[0-9]+\.[0-9]+\.[0-9]+")}"#, &v),
            "1.2.3"
        );
    }

    #[test]
    fn test_regex_invalid_pattern_yields_empty() {
        let v = vars(&[("MSG0", "text")]);
        assert_eq!(render("before {regex(MSG0, [)} after", &v), "before  after");
    }

    #[test]
    fn test_regex_no_match_yields_empty() {
        let v = vars(&[("MSG0", "no digits here")]);
        assert_eq!(render("[{regex(MSG0, [0-9]+)}]", &v), "[]");
    }

    #[test]
    fn test_regex_missing_pattern_yields_empty() {
        let v = vars(&[("MSG0", "text")]);
        assert_eq!(render("a{regex(MSG0)}b", &v), "ab");
    }

    #[test]
    fn test_functions_then_variables() {
        let v = vars(&[("GIT_REPO", "my-repo"), ("MSG0", "Third message")]);
        assert_eq!(
            render("{GIT_REPO}: {truncate(MSG0, 30)}", &v),
            "my-repo: Third message"
        );
    }

    // -------------------------------------------------------------------------
    // Malformed input
    // -------------------------------------------------------------------------

    #[test]
    fn test_unterminated_call_left_untouched() {
        let v = vars(&[("GIT_REPO", "repo")]);
        assert_eq!(
            render("{truncate(MSG0, 5 and {GIT_REPO}", &v),
            "{truncate(MSG0, 5 and repo"
        );
    }

    #[test]
    fn test_malformed_substr_stops_later_complex_substr() {
        let v = VariableMapping::default();
        assert_eq!(
            render("{substr(a, b, c)} {substr(x, y, 0, 1)} {substr(abc, 0, 1)}", &v),
            "{substr(a, b, c)} {substr(x, y, 0, 1)} a"
        );
    }

    #[test]
    fn test_truncate_with_comma_text_left_verbatim() {
        let v = VariableMapping::default();
        assert_eq!(
            render("{truncate(Hello, World, 5)}", &v),
            "{truncate(Hello, World, 5)}"
        );
    }

    #[test]
    fn test_nested_call_only_inner_evaluated() {
        let v = vars(&[("X", "abcdef")]);
        assert_eq!(render("{truncate({substr(X,0,3)},2)}", &v), "{truncate(abc,2)}");
    }

    #[test]
    fn test_unclosed_call_does_not_hide_later_placeholders() {
        let v = vars(&[("GIT_REPO", "repo"), ("CWD", "/home/u")]);
        assert_eq!(
            render("{truncate(MSG0, 50) - {GIT_REPO} {substr(CWD, 0, 5)}", &v),
            "{truncate(MSG0, 50) - repo /home"
        );
    }

    #[test]
    fn test_regex_quantifier_braces_still_parse() {
        let v = vars(&[("MSG0", "Build 20240101 passed")]);
        assert_eq!(render("{regex(MSG0, [0-9]{4})}", &v), "2024");
    }
}

//! Template scanner.
//!
//! Turns a template string into a flat list of nodes. Function calls are
//! recognised as `{name(` up to the first following `)}`; their argument
//! text is split from the right so the leading text argument may itself
//! contain commas. A call whose argument text would run into another
//! placeholder is unterminated: its `{name(` stays text and scanning
//! resumes right after it.

use std::fmt;

const CALL_CLOSE: &str = ")}";

/// Functions callable from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Truncate,
    Substr,
    Regex,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "truncate" => Some(Self::Truncate),
            "substr" => Some(Self::Substr),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Truncate => "truncate",
            Self::Substr => "substr",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A well-formed function call with its arguments split out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Truncate {
        text: String,
        length: usize,
    },
    Substr {
        text: String,
        start: usize,
        length: usize,
        /// Comma-free text and plain digit bounds
        simple: bool,
    },
    Regex {
        text: String,
        pattern: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Text copied through unchanged
    Text(String),
    /// `{NAME}`
    Variable(String),
    /// `{func(args)}` with usable arguments; `raw` is the original source
    Call { call: Call, raw: String },
    /// `{func(args)}` whose arguments could not be split or parsed
    Malformed { function: Function, raw: String },
}

/// Scan `template` into nodes. Never fails: anything unrecognised is text.
pub fn parse(template: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let candidate = &rest[open..];

        match scan_placeholder(candidate) {
            Some((node, consumed)) => {
                if !text.is_empty() {
                    nodes.push(Node::Text(std::mem::take(&mut text)));
                }
                nodes.push(node);
                rest = &candidate[consumed..];
            }
            None => {
                text.push('{');
                rest = &candidate[1..];
            }
        }
    }

    text.push_str(rest);
    if !text.is_empty() {
        nodes.push(Node::Text(text));
    }
    nodes
}

/// Try to read a placeholder at the start of `s` (which begins with `{`).
///
/// Returns the node and the number of bytes it spans.
fn scan_placeholder(s: &str) -> Option<(Node, usize)> {
    let body = &s[1..];
    let ident_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    if ident_len == 0 {
        return None;
    }

    let ident = &body[..ident_len];
    let after = &body[ident_len..];

    if after.starts_with('}') {
        return Some((Node::Variable(ident.to_string()), 1 + ident_len + 1));
    }

    if !after.starts_with('(') {
        return None;
    }
    let function = Function::from_name(ident)?;

    let close = s.find(CALL_CLOSE)?;
    let args_start = 1 + ident_len + 1;
    if close < args_start {
        return None;
    }
    let args = &s[args_start..close];
    if contains_placeholder(args) {
        return None;
    }
    let consumed = close + CALL_CLOSE.len();
    let raw = s[..consumed].to_string();

    let node = match parse_call(function, args) {
        Some(call) => Node::Call { call, raw },
        None => Node::Malformed { function, raw },
    };
    Some((node, consumed))
}

/// True when `s` holds the start of a `{NAME}` or `{func(` placeholder.
///
/// Names must start with a letter or `_`, so regex quantifiers such as
/// `{3}` or `{1,3}` do not count.
fn contains_placeholder(s: &str) -> bool {
    s.match_indices('{').any(|(i, _)| {
        let body = &s[i + 1..];
        if !body.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
            return false;
        }
        let ident_len = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(body.len());
        let after = &body[ident_len..];
        after.starts_with('}')
            || (after.starts_with('(') && Function::from_name(&body[..ident_len]).is_some())
    })
}

fn parse_call(function: Function, args: &str) -> Option<Call> {
    match function {
        Function::Truncate => {
            let (text, length) = args.rsplit_once(',')?;
            let text = text.trim();
            if text.is_empty() || text.contains([',', ')']) {
                return None;
            }
            Some(Call::Truncate {
                text: text.to_string(),
                length: parse_digits(length)?,
            })
        }
        Function::Substr => {
            let mut parts = args.rsplitn(3, ',');
            let length = parts.next()?.trim();
            let start = parts.next()?.trim();
            let text = parts.next()?.trim();

            let simple = !text.is_empty()
                && !text.contains([',', ')'])
                && is_digits(start)
                && is_digits(length);
            Some(Call::Substr {
                text: text.to_string(),
                start: start.parse().ok()?,
                length: length.parse().ok()?,
                simple,
            })
        }
        Function::Regex => {
            let (text, pattern) = args.rsplit_once(',')?;
            Some(Call::Regex {
                text: text.trim().to_string(),
                pattern: pattern.trim().to_string(),
            })
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits(s: &str) -> Option<usize> {
    let s = s.trim();
    if is_digits(s) {
        s.parse().ok()
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Placeholder scanning and caller-side substitution.
//!
//! Supported forms: positional `%1`..`%9`, named `{name}` and `${name}`.

use std::collections::HashMap;

/// A placeholder found in a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `%N`, 1-based.
    Positional(usize),
    /// `{name}` or `${name}`.
    Named(String),
}

/// Values supplied by the caller when rendering a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    positional: Vec<String>,
    named: HashMap<String, String>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next positional argument (`%1`, then `%2`, ...).
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn named(mut self, name: &str, value: impl Into<String>) -> Self {
        self.named.insert(name.to_string(), value.into());
        self
    }

    fn lookup(&self, placeholder: &Placeholder) -> Option<&str> {
        match placeholder {
            Placeholder::Positional(n) => n
                .checked_sub(1)
                .and_then(|i| self.positional.get(i))
                .map(String::as_str),
            Placeholder::Named(name) => self.named.get(name).map(String::as_str),
        }
    }
}

/// Placeholder token with its byte span in the template.
struct Token {
    start: usize,
    end: usize,
    placeholder: Placeholder,
}

fn scan(template: &str) -> Vec<Token> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if matches!(bytes.get(i + 1), Some(b'1'..=b'9')) => {
                tokens.push(Token {
                    start: i,
                    end: i + 2,
                    placeholder: Placeholder::Positional(usize::from(bytes[i + 1] - b'0')),
                });
                i += 2;
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                if let Some((name, end)) = named_at(template, i + 2) {
                    tokens.push(Token {
                        start: i,
                        end,
                        placeholder: Placeholder::Named(name),
                    });
                    i = end;
                } else {
                    i += 1;
                }
            }
            b'{' => {
                if let Some((name, end)) = named_at(template, i + 1) {
                    tokens.push(Token {
                        start: i,
                        end,
                        placeholder: Placeholder::Named(name),
                    });
                    i = end;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    tokens
}

/// Reads an identifier starting at `from` up to a closing brace.
fn named_at(template: &str, from: usize) -> Option<(String, usize)> {
    let rest = template.get(from..)?;
    let close = rest.find('}')?;
    let name = &rest[..close];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| (name.to_string(), from + close + 1))
}

/// Lists placeholders in order of appearance.
pub fn placeholders(template: &str) -> Vec<Placeholder> {
    scan(template).into_iter().map(|t| t.placeholder).collect()
}

/// Substitutes known placeholders; unknown ones are left verbatim.
pub fn render(template: &str, args: &TemplateArgs) -> String {
    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;

    for token in scan(template) {
        if let Some(value) = args.lookup(&token.placeholder) {
            out.push_str(&template[cursor..token.start]);
            out.push_str(value);
            cursor = token.end;
        }
    }

    out.push_str(&template[cursor..]);
    out
}

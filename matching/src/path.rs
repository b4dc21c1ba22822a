//! JSON-path style locations inside message contents and metadata.

use std::fmt;

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// Object field access
    Field(String),
    /// Array element by position
    Index(usize),
    /// Wildcard over every array element
    AnyIndex,
}

/// A path into message content, rendered in the `$.a.b[0]` form used for
/// matching-rule keys and mismatch locations.
///
/// Field names that are not plain identifiers render bracket-quoted, e.g.
/// `$['content-type']`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentPath {
    tokens: Vec<PathToken>,
}

impl ContentPath {
    /// The document root, `$`.
    #[must_use]
    pub const fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Child path for an object field.
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(PathToken::Field(name.into()));
        Self { tokens }
    }

    /// Child path for an array element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(PathToken::Index(index));
        Self { tokens }
    }

    /// Child path for the `[*]` array wildcard.
    #[must_use]
    pub fn any_index(&self) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(PathToken::AnyIndex);
        Self { tokens }
    }

    /// Whether this path is the bare root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token sequence below the root.
    #[must_use]
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    /// Copy of this path with every concrete index replaced by `[*]`.
    ///
    /// Used when resolving a concrete location against rules keyed by
    /// wildcard paths.
    #[must_use]
    pub fn with_wildcard_indices(&self) -> Self {
        let tokens = self
            .tokens
            .iter()
            .map(|token| match token {
                PathToken::Index(_) => PathToken::AnyIndex,
                other => other.clone(),
            })
            .collect();
        Self { tokens }
    }

    /// Parse a rendered path. Returns `None` when the input does not follow
    /// the `$`-rooted grammar.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.chars().peekable();
        if chars.next()? != '$' {
            return None;
        }
        let mut tokens = Vec::new();
        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    let mut name = String::new();
                    while let Some(&next) = chars.peek() {
                        if next == '.' || next == '[' {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    if name.is_empty() {
                        return None;
                    }
                    tokens.push(PathToken::Field(name));
                }
                '[' => match chars.peek().copied()? {
                    '*' => {
                        chars.next();
                        if chars.next()? != ']' {
                            return None;
                        }
                        tokens.push(PathToken::AnyIndex);
                    }
                    '\'' => {
                        chars.next();
                        let mut name = String::new();
                        loop {
                            match chars.next()? {
                                '\\' => name.push(chars.next()?),
                                '\'' => break,
                                other => name.push(other),
                            }
                        }
                        if chars.next()? != ']' {
                            return None;
                        }
                        tokens.push(PathToken::Field(name));
                    }
                    digit if digit.is_ascii_digit() => {
                        let mut digits = String::new();
                        while let Some(&next) = chars.peek() {
                            if next.is_ascii_digit() {
                                digits.push(next);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        if chars.next()? != ']' {
                            return None;
                        }
                        tokens.push(PathToken::Index(digits.parse().ok()?));
                    }
                    _ => return None,
                },
                _ => return None,
            }
        }
        Some(Self { tokens })
    }
}

fn is_plain_field(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for token in &self.tokens {
            match token {
                PathToken::Field(name) if is_plain_field(name) => write!(f, ".{name}")?,
                PathToken::Field(name) => {
                    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
                    write!(f, "['{escaped}']")?;
                }
                PathToken::Index(index) => write!(f, "[{index}]")?,
                PathToken::AnyIndex => write!(f, "[*]")?,
            }
        }
        Ok(())
    }
}

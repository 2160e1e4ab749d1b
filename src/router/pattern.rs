//! Path patterns with `{name}` placeholders.

use std::fmt;

use super::PathParams;

/// Route pattern parse failure, reported at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Pattern does not start with `/`.
    MissingLeadingSlash(String),
    /// A segment has a `{` or `}` that is not a whole `{name}` placeholder.
    UnbalancedBrace { pattern: String, segment: String },
    /// `{}`.
    EmptyName(String),
    /// The same placeholder appears twice.
    DuplicateName { pattern: String, name: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::MissingLeadingSlash(p) => {
                write!(f, "pattern '{}' must start with '/'", p)
            }
            PatternError::UnbalancedBrace { pattern, segment } => {
                write!(f, "pattern '{}': malformed placeholder in '{}'", pattern, segment)
            }
            PatternError::EmptyName(p) => write!(f, "pattern '{}': empty placeholder name", p),
            PatternError::DuplicateName { pattern, name } => {
                write!(f, "pattern '{}': duplicate placeholder '{}'", pattern, name)
            }
        }
    }
}

impl std::error::Error for PatternError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Parsed path pattern such as `/basic-auth/{user}/{passwd}`.
///
/// Matching is segment-wise and exact: a placeholder matches one non-empty
/// segment and trailing slashes are significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(pattern.to_string()))?;

        let mut segments = Vec::new();
        for seg in rest.split('/') {
            if !seg.contains(['{', '}']) {
                segments.push(Segment::Literal(seg.to_string()));
                continue;
            }

            let name = seg
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .filter(|name| !name.contains(['{', '}']))
                .ok_or_else(|| PatternError::UnbalancedBrace {
                    pattern: pattern.to_string(),
                    segment: seg.to_string(),
                })?;

            if name.is_empty() {
                return Err(PatternError::EmptyName(pattern.to_string()));
            }
            if segments.contains(&Segment::Param(name.to_string())) {
                return Err(PatternError::DuplicateName {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
            segments.push(Segment::Param(name.to_string()));
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning percent-decoded placeholder values.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let mut params = PathParams::new();
        let mut parts = rest.split('/');

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    let value = percent_encoding::percent_decode_str(part).decode_utf8_lossy();
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

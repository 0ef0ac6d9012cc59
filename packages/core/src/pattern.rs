//! Resource patterns: templated path strings used as registry lookup keys.
//!
//! Syntax follows the axum router the server mounts routes on: literal
//! segments match exactly, `{name}` segments match any single non-empty
//! path segment. Patterns are parsed once at registration time and are
//! read-only afterwards.

use std::fmt;

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Template(String),
}

// ---------------------------------------------------------------------------
// ResourcePattern
// ---------------------------------------------------------------------------

/// A parsed path pattern, e.g. `/api/v1/ping` or `/api/v1/items/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Errors from parsing a resource pattern string.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern must start with '/': {0}")]
    MissingLeadingSlash(String),
    #[error("pattern has an empty segment: {0}")]
    EmptySegment(String),
    #[error("unterminated template segment in pattern: {0}")]
    UnterminatedTemplate(String),
}

impl ResourcePattern {
    /// Parses a pattern string.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` when the string does not start with `/`,
    /// contains an empty segment (`//`), or has a malformed `{template}`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(raw.to_string()));
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                if part.is_empty() {
                    return Err(PatternError::EmptySegment(raw.to_string()));
                }
                if let Some(inner) = part.strip_prefix('{') {
                    let Some(name) = inner.strip_suffix('}') else {
                        return Err(PatternError::UnterminatedTemplate(raw.to_string()));
                    };
                    if name.is_empty() {
                        return Err(PatternError::UnterminatedTemplate(raw.to_string()));
                    }
                    segments.push(Segment::Template(name.to_string()));
                } else {
                    segments.push(Segment::Literal(part.to_string()));
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern exactly as registered, suitable for mounting on a router.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this pattern contains no template segments.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Matches a concrete request path against this pattern.
    ///
    /// Literal segments must match exactly; template segments match any
    /// single non-empty segment. Segment counts must be equal.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        if parts.len() != self.segments.len() {
            return false;
        }
        self.segments.iter().zip(&parts).all(|(seg, part)| match seg {
            Segment::Literal(lit) => lit == part,
            Segment::Template(_) => !part.is_empty(),
        })
    }

    /// Whether two patterns have the same shape and would claim the same
    /// requests: equal literal segments and template segments in the same
    /// positions. Registering two conflicting keys is a fatal configuration
    /// error in the registry.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(&other.segments)
            .all(|(a, b)| match (a, b) {
                (Segment::Literal(x), Segment::Literal(y)) => x == y,
                (Segment::Template(_), Segment::Template(_)) => true,
                _ => false,
            })
    }
}

impl fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn literal_pattern_matches_itself_only() {
        let pattern = ResourcePattern::parse("/api/v1/ping").unwrap();
        assert!(pattern.matches("/api/v1/ping"));
        assert!(!pattern.matches("/api/v1/pong"));
        assert!(!pattern.matches("/api/v1/ping/extra"));
        assert!(!pattern.matches("/api/v1"));
    }

    #[test]
    fn template_segment_matches_any_single_segment() {
        let pattern = ResourcePattern::parse("/api/v1/items/{id}").unwrap();
        assert!(pattern.matches("/api/v1/items/42"));
        assert!(pattern.matches("/api/v1/items/abc"));
        assert!(!pattern.matches("/api/v1/items"));
        assert!(!pattern.matches("/api/v1/items/42/detail"));
    }

    #[test]
    fn root_pattern_matches_root_path() {
        let pattern = ResourcePattern::parse("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/x"));
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert!(matches!(
            ResourcePattern::parse("no-slash"),
            Err(PatternError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            ResourcePattern::parse("/a//b"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            ResourcePattern::parse("/a/{id"),
            Err(PatternError::UnterminatedTemplate(_))
        ));
        assert!(matches!(
            ResourcePattern::parse("/a/{}"),
            Err(PatternError::UnterminatedTemplate(_))
        ));
    }

    #[test]
    fn is_literal_distinguishes_templates() {
        assert!(ResourcePattern::parse("/a/b").unwrap().is_literal());
        assert!(!ResourcePattern::parse("/a/{b}").unwrap().is_literal());
    }

    #[test]
    fn conflict_rule_compares_shapes() {
        let a = ResourcePattern::parse("/items/{id}").unwrap();
        let b = ResourcePattern::parse("/items/{key}").unwrap();
        let c = ResourcePattern::parse("/items/fixed").unwrap();
        let d = ResourcePattern::parse("/items/{id}/x").unwrap();
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
        assert!(!a.conflicts_with(&d));
        assert!(c.conflicts_with(&c.clone()));
    }

    proptest! {
        /// Any literal pattern built from sane segments matches its own path.
        #[test]
        fn literal_patterns_match_their_own_path(
            segs in prop::collection::vec("[a-z][a-z0-9]{0,8}", 1..5)
        ) {
            let raw = format!("/{}", segs.join("/"));
            let pattern = ResourcePattern::parse(&raw).unwrap();
            prop_assert!(pattern.is_literal());
            prop_assert!(pattern.matches(&raw));
        }

        /// Template patterns match the same path shape with arbitrary values.
        #[test]
        fn template_patterns_match_same_shape(
            value in "[a-z0-9]{1,12}"
        ) {
            let pattern = ResourcePattern::parse("/api/{name}/info").unwrap();
            let path = format!("/api/{value}/info");
            prop_assert!(pattern.matches(&path));
        }
    }
}

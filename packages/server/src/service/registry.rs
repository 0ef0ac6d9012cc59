//! Operation registry: maps `(verb, resource pattern)` keys to handlers.

use std::collections::BTreeMap;
use std::fmt;

use patchbay_core::{PatternError, ResourcePattern, Verb};

use super::handler::Handler;

// ---------------------------------------------------------------------------
// OperationKey
// ---------------------------------------------------------------------------

/// Registry lookup key: verb plus resource pattern.
#[derive(Debug, Clone)]
pub struct OperationKey {
    pub verb: Verb,
    pub pattern: ResourcePattern,
}

impl OperationKey {
    /// Builds a key from a verb and a pattern string.
    ///
    /// # Errors
    ///
    /// Returns `PatternError` when the pattern string is malformed.
    pub fn new(verb: Verb, pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            verb,
            pattern: ResourcePattern::parse(pattern)?,
        })
    }

    /// Whether two keys would claim the same requests: equal verbs and
    /// same-shaped patterns.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.verb == other.verb && self.pattern.conflicts_with(&other.pattern)
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.pattern)
    }
}

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Collects operation registrations at startup.
///
/// Registration order is preserved; it drives the ambiguity resolution in
/// [`OperationRegistry::resolve`] and the route mounting order.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<(OperationKey, Handler)>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for the given key.
    pub fn register(&mut self, key: OperationKey, handler: Handler) {
        self.entries.push((key, handler));
    }

    /// Finalizes the registry.
    ///
    /// # Errors
    ///
    /// Returns an error when two registered keys conflict (same verb,
    /// same-shaped pattern). Duplicate registration is a configuration
    /// mistake and is fatal at startup.
    pub fn build(self) -> anyhow::Result<OperationRegistry> {
        for (i, (key, _)) in self.entries.iter().enumerate() {
            for (other, _) in &self.entries[i + 1..] {
                if key.conflicts_with(other) {
                    anyhow::bail!("duplicate operation key: {key}");
                }
            }
        }
        Ok(OperationRegistry {
            entries: self.entries,
        })
    }
}

// ---------------------------------------------------------------------------
// OperationRegistry
// ---------------------------------------------------------------------------

/// Verb → registered resource patterns, as reported by the restinfo
/// operation.
pub type RouteMap = BTreeMap<Verb, Vec<String>>;

/// Immutable handler lookup table, built once before traffic is admitted.
///
/// Read-only for the remainder of the process lifetime, so lookups need no
/// locking.
#[derive(Debug)]
pub struct OperationRegistry {
    entries: Vec<(OperationKey, Handler)>,
}

impl OperationRegistry {
    /// Resolves the handler registered for a verb and concrete request path.
    ///
    /// Matching contract (deliberately preserved from the observed system,
    /// as an explicit policy rather than an accident):
    /// - no entry matches → `None`; an expected, recoverable outcome;
    /// - exactly one entry matches → that entry;
    /// - several entries match → the **last literal match** in registration
    ///   order wins; when every candidate is templated, `None`. Ambiguity is
    ///   indistinguishable from absence.
    #[must_use]
    pub fn resolve(&self, verb: Verb, path: &str) -> Option<&Handler> {
        let candidates: Vec<&(OperationKey, Handler)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.verb == verb && key.pattern.matches(path))
            .collect();

        match candidates.as_slice() {
            [] => None,
            [only] => Some(&only.1),
            many => many
                .iter()
                .rev()
                .find(|(key, _)| key.pattern.is_literal())
                .map(|(_, handler)| handler),
        }
    }

    /// The full verb → pattern-list map known to the registry.
    #[must_use]
    pub fn route_map(&self) -> RouteMap {
        let mut map = RouteMap::new();
        for (key, _) in &self.entries {
            map.entry(key.verb)
                .or_default()
                .push(key.pattern.as_str().to_string());
        }
        map
    }

    /// Registered entries in registration order, for route mounting.
    pub fn entries(&self) -> impl Iterator<Item = &(OperationKey, Handler)> {
        self.entries.iter()
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Filter specification compiler
//!
//! A filter spec is either an ordered list of pattern tokens or a reference to
//! a predicate registered by the embedding application. Pattern tokens are
//! unanchored regular expressions; the literal `"!"` token negates the single
//! pattern that follows it.
//!
//! Matching semantics:
//! - no negated pattern in the spec: the filter passes iff any pattern matches
//! - at least one negated pattern: patterns are scanned in order, a negated
//!   match vetoes immediately, a plain match records a tentative pass that a
//!   later veto can still override
//! - an empty spec never passes

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

/// Token that flips the meaning of the next pattern in a spec
pub const NEGATION_MARKER: &str = "!";

/// A filter specification as it appears in a build profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
    /// Reference to a predicate registered on a [`PredicateRegistry`]
    Named(String),

    /// Ordered pattern tokens, possibly containing negation markers
    Patterns(Vec<String>),
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec::Patterns(Vec::new())
    }
}

type NamedPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Registry of application-supplied predicates referable from filter specs
///
/// Build profiles may not carry executable code; a profile that needs custom
/// match logic names a predicate here instead.
#[derive(Default, Clone)]
pub struct PredicateRegistry {
    predicates: HashMap<String, NamedPredicate>,
}

impl PredicateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under a name usable from filter specs
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(predicate));
    }

    fn get(&self, name: &str) -> Option<&NamedPredicate> {
        self.predicates.get(name)
    }
}

impl fmt::Debug for PredicateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRegistry")
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A compiled, reusable filter predicate
#[derive(Clone)]
pub struct Filter {
    kind: FilterKind,
}

#[derive(Clone)]
enum FilterKind {
    /// Empty spec: never passes
    Never,
    /// Application-registered predicate
    Named(NamedPredicate),
    /// Plain OR over patterns (no negation anywhere in the spec)
    AnyOf(Vec<Regex>),
    /// Ordered scan with veto semantics; `true` marks a negated pattern
    Veto(Vec<(Regex, bool)>),
}

impl Filter {
    /// Compile a filter spec, resolving named predicates through `registry`
    pub fn compile(spec: &FilterSpec, registry: &PredicateRegistry) -> Result<Filter> {
        match spec {
            FilterSpec::Named(name) => {
                let predicate =
                    registry
                        .get(name)
                        .cloned()
                        .ok_or_else(|| ScoutError::UnknownPredicate {
                            name: name.clone(),
                        })?;
                Ok(Filter {
                    kind: FilterKind::Named(predicate),
                })
            }
            FilterSpec::Patterns(tokens) => Filter::from_tokens(tokens, 0),
        }
    }

    /// Compile pattern tokens, considering only elements from `start_at` on
    ///
    /// Directive descriptors are positional arrays whose exclude tokens begin
    /// at index 2; this entry point lets callers compile such tails directly.
    pub fn from_tokens(tokens: &[String], start_at: usize) -> Result<Filter> {
        let slice = tokens.get(start_at..).unwrap_or(&[]);

        let mut entries = Vec::new();
        let mut negate_next = false;
        let mut any_negated = false;
        for token in slice {
            if token == NEGATION_MARKER {
                negate_next = true;
                continue;
            }
            let regex = Regex::new(token).map_err(|e| ScoutError::FilterParseFailed {
                pattern: token.clone(),
                reason: e.to_string(),
            })?;
            entries.push((regex, negate_next));
            any_negated = any_negated || negate_next;
            negate_next = false;
        }

        let kind = if entries.is_empty() {
            FilterKind::Never
        } else if any_negated {
            FilterKind::Veto(entries)
        } else {
            FilterKind::AnyOf(entries.into_iter().map(|(regex, _)| regex).collect())
        };
        Ok(Filter { kind })
    }

    /// A filter that never passes
    pub fn never() -> Filter {
        Filter {
            kind: FilterKind::Never,
        }
    }

    /// Evaluate the filter against a (forward-slash normalized) name
    pub fn matches(&self, name: &str) -> bool {
        match &self.kind {
            FilterKind::Never => false,
            FilterKind::Named(predicate) => predicate(name),
            FilterKind::AnyOf(patterns) => patterns.iter().any(|regex| regex.is_match(name)),
            FilterKind::Veto(entries) => {
                let mut tentative = false;
                for (regex, negated) in entries {
                    if regex.is_match(name) {
                        if *negated {
                            // negated match is an absolute veto
                            return false;
                        }
                        tentative = true;
                    }
                }
                tentative
            }
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FilterKind::Never => write!(f, "Filter::Never"),
            FilterKind::Named(_) => write!(f, "Filter::Named(..)"),
            FilterKind::AnyOf(patterns) => f.debug_tuple("Filter::AnyOf").field(patterns).finish(),
            FilterKind::Veto(entries) => f.debug_tuple("Filter::Veto").field(entries).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_plain_or_semantics() {
        let filter = Filter::from_tokens(&tokens(&["\\.txt$", "\\.md$"]), 0).unwrap();
        assert!(filter.matches("a.txt"));
        assert!(filter.matches("a.md"));
        assert!(!filter.matches("a.js"));
    }

    #[test]
    fn test_negation_veto() {
        let filter = Filter::from_tokens(&tokens(&["\\.js$", "!", "test\\.js$"]), 0).unwrap();
        assert!(filter.matches("a.js"));
        assert!(!filter.matches("test.js"));
    }

    #[test]
    fn test_veto_overrides_earlier_hit() {
        // plain pattern matches first, later negated pattern still vetoes
        let filter = Filter::from_tokens(&tokens(&[".*", "!", "secret"]), 0).unwrap();
        assert!(filter.matches("public.txt"));
        assert!(!filter.matches("secret.txt"));
    }

    #[test]
    fn test_negated_only_no_match_yields_false() {
        let filter = Filter::from_tokens(&tokens(&["!", "\\.bak$"]), 0).unwrap();
        assert!(!filter.matches("a.txt"));
        assert!(!filter.matches("a.bak"));
    }

    #[test]
    fn test_empty_slice_never_passes() {
        let filter = Filter::from_tokens(&[], 0).unwrap();
        assert!(!filter.matches("anything"));
        assert!(!filter.matches(""));
    }

    #[test]
    fn test_start_at_skips_positional_prefix() {
        // directive form: [src, dest, excludes...]
        let directive = tokens(&["/src", "/dest", "\\.tmp$"]);
        let filter = Filter::from_tokens(&directive, 2).unwrap();
        assert!(filter.matches("a.tmp"));
        assert!(!filter.matches("/src"));
    }

    #[test]
    fn test_start_at_past_end_never_passes() {
        let filter = Filter::from_tokens(&tokens(&["/src", "/dest"]), 2).unwrap();
        assert!(!filter.matches("/src"));
    }

    #[test]
    fn test_lone_negation_marker_never_passes() {
        let filter = Filter::from_tokens(&tokens(&["!"]), 0).unwrap();
        assert!(!filter.matches("anything"));
    }

    #[test]
    fn test_unanchored_substring_match() {
        let filter = Filter::from_tokens(&tokens(&["nls"]), 0).unwrap();
        assert!(filter.matches("/src/app/nls/fr/strings.js"));
    }

    #[test]
    fn test_case_sensitive() {
        let filter = Filter::from_tokens(&tokens(&["README"]), 0).unwrap();
        assert!(filter.matches("/a/README.md"));
        assert!(!filter.matches("/a/readme.md"));
    }

    #[test]
    fn test_invalid_pattern_errors() {
        let err = Filter::from_tokens(&tokens(&["["]), 0).unwrap_err();
        assert!(matches!(err, ScoutError::FilterParseFailed { .. }));
    }

    #[test]
    fn test_named_predicate() {
        let mut registry = PredicateRegistry::new();
        registry.register("onlyMaps", |name: &str| name.ends_with(".map"));

        let spec = FilterSpec::Named("onlyMaps".to_string());
        let filter = Filter::compile(&spec, &registry).unwrap();
        assert!(filter.matches("app.js.map"));
        assert!(!filter.matches("app.js"));
    }

    #[test]
    fn test_unknown_predicate_errors() {
        let registry = PredicateRegistry::new();
        let spec = FilterSpec::Named("missing".to_string());
        let err = Filter::compile(&spec, &registry).unwrap_err();
        assert!(matches!(err, ScoutError::UnknownPredicate { .. }));
    }

    #[test]
    fn test_filter_spec_deserialize_forms() {
        let named: FilterSpec = serde_json::from_str("\"myPredicate\"").unwrap();
        assert_eq!(named, FilterSpec::Named("myPredicate".to_string()));

        let patterns: FilterSpec = serde_json::from_str("[\"\\\\.js$\", \"!\", \"test\"]").unwrap();
        assert_eq!(
            patterns,
            FilterSpec::Patterns(tokens(&["\\.js$", "!", "test"]))
        );
    }
}

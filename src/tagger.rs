//! Resource tagging
//!
//! A package's `resourceTags` map names a filter per tag; every resource the
//! package produces is run through the compiled set before registration, so
//! downstream stages can rely on tags being present as soon as a resource
//! exists. Tags are only ever added, never cleared.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::filter::{Filter, FilterSpec, PredicateRegistry};
use crate::path_utils::to_forward_slashes;
use crate::resource::Resource;

/// Compiled tag predicates for one package
#[derive(Debug)]
pub struct ResourceTagger {
    tags: Vec<(String, Filter)>,
}

impl ResourceTagger {
    /// Compile every declared tag's filter spec
    pub fn new(
        tag_specs: &BTreeMap<String, FilterSpec>,
        predicates: &PredicateRegistry,
    ) -> Result<Self> {
        let mut tags = Vec::with_capacity(tag_specs.len());
        for (name, spec) in tag_specs {
            tags.push((name.clone(), Filter::compile(spec, predicates)?));
        }
        Ok(Self { tags })
    }

    /// A tagger that tags nothing
    pub fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    /// Set every tag whose filter matches the resource's source path
    pub fn apply(&self, resource: &mut Resource) {
        let src = to_forward_slashes(&resource.src);
        for (name, filter) in &self.tags {
            if filter.matches(&src) {
                resource.tag(name.clone());
            }
        }
    }
}

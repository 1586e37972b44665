//! modscout - resource discovery and module resolution for AMD-style builds
//!
//! Turns a build profile (packages, tree/dir/file directives, layers) into a
//! flat list of resources: (source, destination, metadata) records consumed
//! by later compilation and bundling stages. Discovery walks every configured
//! package tree, derives module ids under per-package naming rules,
//! reconciles explicit module declarations against what was found on disk,
//! tags resources through declarative filters, and resolves named layers
//! including loader boot wiring.
//!
//! ```no_run
//! use modscout::config::BuildConfig;
//! use modscout::filter::PredicateRegistry;
//!
//! # fn main() -> modscout::error::Result<()> {
//! let mut config = BuildConfig::new("/src", "/release");
//! config.packages.push(modscout::config::PackageConfig::new("app", "/src/app"));
//!
//! let report = modscout::discover::run(&config, &PredicateRegistry::new())?;
//! for resource in report.resources() {
//!     println!("{} -> {}", resource.src.display(), resource.dest.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discover;
pub mod error;
pub mod filter;
pub mod module;
pub mod package;
pub mod path_utils;
pub mod registry;
pub mod resource;
pub mod tagger;
pub mod walker;

pub use config::BuildConfig;
pub use discover::{run, DiscoveryReport};
pub use error::{Result, ScoutError};
pub use filter::{Filter, FilterSpec, PredicateRegistry};
pub use resource::{Layer, ModuleInfo, Resource};

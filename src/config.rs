//! Build profile data structures
//!
//! A build profile arrives pre-parsed as structured data (typically JSON).
//! The shapes follow the profile format the engine has always consumed:
//! tree/dir/file directives are positional arrays `[src, dest, exclude...]`,
//! and package module declarations are either the sentinel `1` ("use the
//! natural mapping") or an explicit source path string.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use normpath::PathExt;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::{Result, ScoutError};
use crate::filter::FilterSpec;
use crate::path_utils::to_forward_slashes;

fn normalize_root(path: &Path) -> Result<PathBuf> {
    match path.normalize() {
        Ok(normalized) => Ok(normalized.into_path_buf()),
        Err(err) => Err(ScoutError::ConfigInvalid {
            message: format!(
                "source root '{}' cannot be normalized: {err}",
                path.display()
            ),
        }),
    }
}

fn default_module_suffix() -> String {
    ".js".to_string()
}

fn default_main() -> String {
    "main".to_string()
}

/// A tree, dir, or file inclusion directive
///
/// Profiles write these as positional arrays: the first two elements are the
/// source and destination paths, everything after index 2 is an exclusion
/// filter token (pattern or negation marker). File directives carry no
/// exclusion tokens; extra tokens on them are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Source path
    pub src: PathBuf,

    /// Destination path
    pub dest: PathBuf,

    /// Exclusion filter tokens (the descriptor tail from index 2 on)
    pub excludes: Vec<String>,
}

impl Directive {
    /// Create a directive without exclusion tokens
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            excludes: Vec::new(),
        }
    }

    /// Create a directive with exclusion tokens
    pub fn with_excludes(
        src: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        excludes: Vec<String>,
    ) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
            excludes,
        }
    }
}

impl TryFrom<Vec<String>> for Directive {
    type Error = ScoutError;

    fn try_from(items: Vec<String>) -> Result<Self> {
        let len = items.len();
        let mut iter = items.into_iter();
        let (Some(src), Some(dest)) = (iter.next(), iter.next()) else {
            return Err(ScoutError::DirectiveArity { len });
        };
        Ok(Directive {
            src: PathBuf::from(src),
            dest: PathBuf::from(dest),
            excludes: iter.collect(),
        })
    }
}

impl<'de> Deserialize<'de> for Directive {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<String>::deserialize(deserializer)?;
        Directive::try_from(items).map_err(de::Error::custom)
    }
}

impl Serialize for Directive {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2 + self.excludes.len()))?;
        seq.serialize_element(&to_forward_slashes(&self.src))?;
        seq.serialize_element(&to_forward_slashes(&self.dest))?;
        for token in &self.excludes {
            seq.serialize_element(token)?;
        }
        seq.end()
    }
}

/// An explicit module declaration inside a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDecl {
    /// Use the package's natural id-to-path mapping
    Natural,

    /// Override the module's source location
    Path(PathBuf),
}

impl<'de> Deserialize<'de> for ModuleDecl {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Path(String),
            Natural(de::IgnoredAny),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Path(path) => ModuleDecl::Path(PathBuf::from(path)),
            Repr::Natural(_) => ModuleDecl::Natural,
        })
    }
}

impl Serialize for ModuleDecl {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ModuleDecl::Natural => serializer.serialize_u8(1),
            ModuleDecl::Path(path) => serializer.serialize_str(&to_forward_slashes(path)),
        }
    }
}

/// One package: a named root directory plus explicit inclusion rules
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    /// Package name; empty for the implicit default package
    #[serde(default)]
    pub name: String,

    /// Package root directory
    pub location: PathBuf,

    /// Relative id of the package's main module
    #[serde(default = "default_main")]
    pub main: String,

    /// Destination override; defaults to `<release_dir>/<name>`
    #[serde(default)]
    pub dest_location: Option<PathBuf>,

    /// Explicit tree directives, layered on top of auto-discovery
    #[serde(default)]
    pub trees: Vec<Directive>,

    /// Explicit dir directives
    #[serde(default)]
    pub dirs: Vec<Directive>,

    /// Explicit file directives
    #[serde(default)]
    pub files: Vec<Directive>,

    /// Explicit module declarations, relative id -> declaration
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleDecl>,

    /// Tag name -> filter over a resource's source path
    #[serde(default)]
    pub resource_tags: BTreeMap<String, FilterSpec>,
}

impl PackageConfig {
    /// Create a package with the given name and location
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            main: default_main(),
            dest_location: None,
            trees: Vec::new(),
            dirs: Vec::new(),
            files: Vec::new(),
            modules: BTreeMap::new(),
            resource_tags: BTreeMap::new(),
        }
    }

    /// Whether this is the implicit default package
    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    /// The module-id prefix contributed by this package ("name/" or "")
    pub fn prefix(&self) -> String {
        if self.name.is_empty() {
            String::new()
        } else {
            format!("{}/", self.name)
        }
    }
}

/// A layer declaration, keyed in the profile by its root module id
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct LayerConfig {
    /// Module ids rolled into the layer
    #[serde(default)]
    pub include: Vec<String>,

    /// Whether the layer runs at loader boot
    #[serde(default)]
    pub boot: bool,
}

/// The full build profile consumed by a discovery run
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Root of the implicit default package
    pub base_path: PathBuf,

    /// Destination root directory
    pub release_dir: PathBuf,

    /// Suffix marking a file as a module candidate
    #[serde(default = "default_module_suffix")]
    pub module_suffix: String,

    /// Named packages, processed in order before the default package
    #[serde(default)]
    pub packages: Vec<PackageConfig>,

    /// Global tree directives
    #[serde(default)]
    pub trees: Vec<Directive>,

    /// Global dir directives
    #[serde(default)]
    pub dirs: Vec<Directive>,

    /// Global file directives
    #[serde(default)]
    pub files: Vec<Directive>,

    /// Layer declarations, root module id -> layer
    #[serde(default)]
    pub layers: BTreeMap<String, LayerConfig>,

    /// Fully qualified id of the loader module, when one is configured
    #[serde(default)]
    pub loader: Option<String>,
}

impl BuildConfig {
    /// Create a minimal profile from the two root directories
    pub fn new(base_path: impl Into<PathBuf>, release_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            release_dir: release_dir.into(),
            module_suffix: default_module_suffix(),
            packages: Vec::new(),
            trees: Vec::new(),
            dirs: Vec::new(),
            files: Vec::new(),
            layers: BTreeMap::new(),
            loader: None,
        }
    }

    /// Parse a build profile from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Normalize the source roots (base path and package locations)
    ///
    /// Resolves `.`/`..` components and symlink-free casing so that the
    /// walker's visited memo compares paths reliably. Source roots must
    /// exist; the release dir is left untouched since it may not yet.
    pub fn normalize(&mut self) -> Result<()> {
        self.base_path = normalize_root(&self.base_path)?;
        for pack in &mut self.packages {
            pack.location = normalize_root(&pack.location)?;
        }
        Ok(())
    }

    /// Synthesize the implicit default package rooted at `base_path`
    pub fn default_package(&self) -> PackageConfig {
        PackageConfig::new("", &self.base_path)
    }
}

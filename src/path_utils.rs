//! Cross-platform path utilities for modscout
//!
//! Filter patterns are matched against path *strings*, so paths are
//! normalized to forward slashes before any predicate sees them. Without
//! this, a pattern like `"src/nls/"` would never match on Windows.

use std::path::Path;

/// Render a path with forward slashes regardless of platform.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use modscout::path_utils::to_forward_slashes;
///
/// assert_eq!(to_forward_slashes(Path::new("/usr/local/bin")), "/usr/local/bin");
/// ```
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

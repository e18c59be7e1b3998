//! Maps a rewritten path to the library that owns it.
//!
//! Resolution is first-match in the order Jellyfin listed its libraries, not
//! longest-prefix. With nested library roots the earlier library wins even
//! when a later one is more specific; changing that would reroute events for
//! existing setups.

use super::domain::{Library, TargetError};

/// Return the first library whose root is a string prefix of `path`.
pub fn resolve<'a>(path: &str, libraries: &'a [Library]) -> Result<&'a Library, TargetError> {
    libraries
        .iter()
        .find(|lib| path.starts_with(&lib.path))
        .ok_or_else(|| TargetError::NoMatchingLibrary(path.to_string()))
}

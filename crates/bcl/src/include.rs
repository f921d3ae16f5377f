//! `include` resolution
use crate::error::ErrorKind;
use std::path::PathBuf;

/// Hard cap on nested includes, reached by include cycles
pub const MAX_INCLUDE_DEPTH: usize = 100;

/// Expands an include pattern into the matching paths in lexical order
///
/// Relative patterns are resolved against the current working directory.
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>, ErrorKind> {
    let mut paths = glob::glob(pattern)?
        .map(|entry| {
            entry.map_err(|error| ErrorKind::Io {
                path: error.path().to_owned(),
                error: error.into(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    tracing::debug!(pattern, matches = paths.len(), "expanded include");
    Ok(paths)
}

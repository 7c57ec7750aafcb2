//! Path grammar and splitting.
//!
//! A path is `/` or one or more `/`-prefixed components over
//! `[A-Za-z0-9.-]`. Paths are case-sensitive and carry no trailing
//! slash.

use super::error::MutationError;

fn is_component_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'.' || b == b'-'
}

/// Validate `path` against the grammar.
pub fn check(path: &str) -> Result<(), MutationError> {
    if path == "/" {
        return Ok(());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(MutationError::BadPath);
    };
    for component in rest.split('/') {
        if component.is_empty() || !component.bytes().all(is_component_byte) {
            return Err(MutationError::BadPath);
        }
    }
    Ok(())
}

/// Split a valid path into its components; the root splits into none.
pub fn split(path: &str) -> Vec<&str> {
    if path == "/" {
        return Vec::new();
    }
    path[1..].split('/').collect()
}

/// Join components back into an absolute path.
pub fn join(parts: &[&str]) -> String {
    format!("/{}", parts.join("/"))
}

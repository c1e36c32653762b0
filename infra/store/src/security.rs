use crate::error::StoreError;
use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` without ever climbing above the relative base.
pub(crate) fn normalize_relative(path: &Path) -> Result<PathBuf, StoreError> {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StoreError::PathTraversalAttempt {
                        message: path.display().to_string().into(),
                        context: Some("`..` climbs above the store root".into()),
                    });
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StoreError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("absolute paths are rejected".into()),
                });
            },
        }
    }

    Ok(out)
}

/// Joins `path` onto the canonical `root` and proves the result stays inside it,
/// following symlinks on whatever part of the path already exists.
pub(crate) fn resolve_path(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
    let joined = root.join(normalize_relative(path.as_ref())?);

    match joined.canonicalize() {
        Ok(canonical) => ensure_inside(root, canonical),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            check_existing_ancestor(root, &joined)?;
            Ok(joined)
        },
        Err(err) => Err(StoreError::Io {
            source: err,
            context: Some(format!("resolving {}", joined.display()).into()),
        }),
    }
}

fn ensure_inside(root: &Path, candidate: PathBuf) -> Result<PathBuf, StoreError> {
    if candidate.starts_with(root) {
        Ok(candidate)
    } else {
        Err(StoreError::PathTraversalAttempt {
            message: candidate.display().to_string().into(),
            context: Some("resolved outside the store root".into()),
        })
    }
}

fn check_existing_ancestor(root: &Path, joined: &Path) -> Result<(), StoreError> {
    for ancestor in joined.ancestors() {
        if ancestor == root {
            return Ok(());
        }
        if ancestor.exists() {
            let canonical = ancestor.canonicalize().map_err(|source| StoreError::Io {
                source,
                context: Some(format!("resolving {}", ancestor.display()).into()),
            })?;
            return ensure_inside(root, canonical).map(|_| ());
        }
    }

    Err(StoreError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("no ancestor inside the store root".into()),
    })
}

//! Path-keyed structural patches over `serde_json::Value`.

use super::error::DeltaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Field of an object
    Key(String),
    /// Element of an array
    Index(usize),
}

/// Location inside a value. The empty path is the value itself.
///
/// Displays as a JSON pointer.
///
/// # Example
///
/// ```rust
/// use rewind::delta::Path;
///
/// let path = Path::root().key("todos").index(2).key("done");
/// assert_eq!(path.to_string(), "/todos/2/done");
/// assert_eq!(Path::root().to_string(), "/");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path, addressing the whole value.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this path addresses the whole value.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Steps from the root, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Extend the path with an object field.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    /// Extend the path with an array index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    fn from_slice(segments: &[PathSegment]) -> Self {
        Self(segments.to_vec())
    }

    fn child(segments: &[PathSegment], last: PathSegment) -> Self {
        let mut path = Self::from_slice(segments);
        path.0.push(last);
        path
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, "/{}", key.replace('~', "~0").replace('/', "~1"))?,
                PathSegment::Index(index) => write!(f, "/{index}")?,
            }
        }
        Ok(())
    }
}

/// A single structural change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOp {
    /// Insert an object field or array element. At the root, sets the value.
    Add { path: Path, value: Value },
    /// Remove an existing object field or array element.
    Remove { path: Path },
    /// Overwrite an existing location.
    Replace { path: Path, value: Value },
}

impl PatchOp {
    /// Location this operation targets.
    pub fn path(&self) -> &Path {
        match self {
            Self::Add { path, .. } | Self::Remove { path } | Self::Replace { path, .. } => path,
        }
    }
}

/// Ordered list of operations that transforms one value into another.
///
/// Patches are produced in pairs by [`Patch::between`]: the patch from `a` to
/// `b` and the patch from `b` to `a` exactly invert each other. An empty
/// patch is a no-op.
///
/// # Example
///
/// ```rust
/// use rewind::delta::Patch;
/// use serde_json::json;
///
/// let before = json!({ "count": 1, "tags": ["a"] });
/// let after = json!({ "count": 2, "tags": ["a", "b"] });
///
/// let forward = Patch::between(&before, &after);
/// let inverse = Patch::between(&after, &before);
///
/// let mut value = before.clone();
/// forward.apply(&mut value).unwrap();
/// assert_eq!(value, after);
///
/// inverse.apply(&mut value).unwrap();
/// assert_eq!(value, before);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    /// Create an empty, no-op patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap operations that are applied in order.
    pub fn from_ops(ops: Vec<PatchOp>) -> Self {
        Self { ops }
    }

    /// Operations in application order.
    pub fn ops(&self) -> &[PatchOp] {
        &self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether applying this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Compose two patches: apply `self`, then `next`.
    pub fn then(mut self, next: Patch) -> Self {
        self.ops.extend(next.ops);
        self
    }

    /// Compute the patch that turns `before` into `after`.
    ///
    /// Objects are diffed field by field. Arrays skip their common prefix
    /// and suffix, then diff the remaining middle index by index. Any other
    /// mismatch replaces the value at that location.
    pub fn between(before: &Value, after: &Value) -> Self {
        let mut ops = Vec::new();
        let mut path = Vec::new();
        diff_into(&mut path, before, after, &mut ops);
        Self { ops }
    }

    /// Apply every operation in order.
    ///
    /// Stops at the first failing operation; `target` may then be partially
    /// patched and should be discarded.
    pub fn apply(&self, target: &mut Value) -> Result<(), DeltaError> {
        for op in &self.ops {
            apply_op(target, op)?;
        }
        Ok(())
    }
}

fn diff_into(path: &mut Vec<PathSegment>, before: &Value, after: &Value, ops: &mut Vec<PatchOp>) {
    if before == after {
        return;
    }
    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, old_value) in old {
                let segment = PathSegment::Key(key.clone());
                match new.get(key) {
                    Some(new_value) => {
                        path.push(segment);
                        diff_into(path, old_value, new_value, ops);
                        path.pop();
                    }
                    None => ops.push(PatchOp::Remove {
                        path: Path::child(path, segment),
                    }),
                }
            }
            for (key, new_value) in new {
                if !old.contains_key(key) {
                    ops.push(PatchOp::Add {
                        path: Path::child(path, PathSegment::Key(key.clone())),
                        value: new_value.clone(),
                    });
                }
            }
        }
        (Value::Array(old), Value::Array(new)) => {
            // Unchanged runs at either end emit nothing, so an insertion or
            // removal at the head costs one op instead of a shifted tail.
            let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
            let limit = old.len().min(new.len()) - prefix;
            let suffix = old
                .iter()
                .rev()
                .zip(new.iter().rev())
                .take(limit)
                .take_while(|(a, b)| a == b)
                .count();
            let old_mid = &old[prefix..old.len() - suffix];
            let new_mid = &new[prefix..new.len() - suffix];

            let shared = old_mid.len().min(new_mid.len());
            for offset in 0..shared {
                path.push(PathSegment::Index(prefix + offset));
                diff_into(path, &old_mid[offset], &new_mid[offset], ops);
                path.pop();
            }
            // Removals run back to front so earlier indices stay valid.
            for offset in (new_mid.len()..old_mid.len()).rev() {
                ops.push(PatchOp::Remove {
                    path: Path::child(path, PathSegment::Index(prefix + offset)),
                });
            }
            for (offset, value) in new_mid.iter().enumerate().skip(old_mid.len()) {
                ops.push(PatchOp::Add {
                    path: Path::child(path, PathSegment::Index(prefix + offset)),
                    value: value.clone(),
                });
            }
        }
        _ => ops.push(PatchOp::Replace {
            path: Path::from_slice(path),
            value: after.clone(),
        }),
    }
}

fn resolve_mut<'a>(mut current: &'a mut Value, segments: &[PathSegment]) -> Option<&'a mut Value> {
    for segment in segments {
        current = match (current, segment) {
            (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key)?,
            (Value::Array(items), PathSegment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn apply_op(root: &mut Value, op: &PatchOp) -> Result<(), DeltaError> {
    let path = op.path();
    let Some((last, parents)) = path.segments().split_last() else {
        return match op {
            PatchOp::Add { value, .. } | PatchOp::Replace { value, .. } => {
                *root = value.clone();
                Ok(())
            }
            PatchOp::Remove { .. } => Err(DeltaError::RootRemoval),
        };
    };

    let not_found = || DeltaError::PathNotFound {
        path: path.to_string(),
    };
    let parent = resolve_mut(root, parents).ok_or_else(not_found)?;

    match (parent, last) {
        (Value::Object(map), PathSegment::Key(key)) => match op {
            PatchOp::Add { value, .. } => {
                map.insert(key.clone(), value.clone());
                Ok(())
            }
            PatchOp::Remove { .. } => map.remove(key).map(|_| ()).ok_or_else(not_found),
            PatchOp::Replace { value, .. } => {
                let slot = map.get_mut(key).ok_or_else(not_found)?;
                *slot = value.clone();
                Ok(())
            }
        },
        (Value::Array(items), PathSegment::Index(index)) => {
            let index = *index;
            let len = items.len();
            let out_of_bounds = || DeltaError::IndexOutOfBounds {
                path: path.to_string(),
                index,
                len,
            };
            match op {
                PatchOp::Add { value, .. } => {
                    if index > len {
                        return Err(out_of_bounds());
                    }
                    items.insert(index, value.clone());
                    Ok(())
                }
                PatchOp::Remove { .. } => {
                    if index >= len {
                        return Err(out_of_bounds());
                    }
                    items.remove(index);
                    Ok(())
                }
                PatchOp::Replace { value, .. } => {
                    let slot = items.get_mut(index).ok_or_else(out_of_bounds)?;
                    *slot = value.clone();
                    Ok(())
                }
            }
        }
        (Value::Object(_), PathSegment::Index(_)) | (Value::Array(_), PathSegment::Key(_)) => {
            Err(not_found())
        }
        _ => Err(DeltaError::NotAContainer {
            path: Path::from_slice(parents).to_string(),
        }),
    }
}

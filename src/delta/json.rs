//! Diff engine over the `serde_json` representation of a state.

use super::error::DeltaError;
use super::patch::Patch;
use super::DiffEngine;
use crate::core::State;
use serde_json::Value;

/// Diff engine for any serde-serializable state.
///
/// The mutator runs against a clone of the state. Both versions are then
/// converted to `serde_json::Value` and diffed in each direction, giving a
/// forward and an inverse [`Patch`].
///
/// A mutation is rejected unless its result decodes back from JSON to an
/// equal value. Non-finite floats (encoded as `null`) and `#[serde(skip)]`
/// fields that the mutation changed are the usual offenders.
///
/// # Example
///
/// ```rust
/// use rewind::delta::{DiffEngine, JsonDiffEngine};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Counter {
///     count: i64,
/// }
///
/// let engine = JsonDiffEngine;
/// let before = Counter { count: 1 };
/// let (after, forward, inverse) = engine
///     .diff_with_delta(&before, |c: &mut Counter| c.count += 1)
///     .unwrap();
///
/// assert_eq!(after, Counter { count: 2 });
/// assert_eq!(engine.apply_delta(&before, &forward).unwrap(), after);
/// assert_eq!(engine.apply_delta(&after, &inverse).unwrap(), before);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDiffEngine;

impl<T: State> DiffEngine<T> for JsonDiffEngine {
    type Delta = Patch;

    fn diff_with_delta<F>(&self, state: &T, mutator: F) -> Result<(T, Patch, Patch), DeltaError>
    where
        F: FnOnce(&mut T),
    {
        let before = encode(state)?;
        let mut draft = state.clone();
        mutator(&mut draft);
        let after = encode(&draft)?;

        // Patches are replayed through the encoded form, so a draft that does
        // not survive it would leave undo and redo unable to restore it.
        let restored: T = serde_json::from_value(after.clone()).map_err(DeltaError::Decode)?;
        if restored != draft {
            return Err(DeltaError::LossyEncoding);
        }

        let forward = Patch::between(&before, &after);
        let inverse = Patch::between(&after, &before);
        Ok((draft, forward, inverse))
    }

    fn apply_delta(&self, state: &T, delta: &Patch) -> Result<T, DeltaError> {
        if delta.is_empty() {
            return Ok(state.clone());
        }
        let mut value = encode(state)?;
        delta.apply(&mut value)?;
        serde_json::from_value(value).map_err(DeltaError::Decode)
    }
}

/// Build the next state from a partial one.
///
/// With `replace`, `partial` must describe a complete state. Otherwise its
/// top-level fields overwrite those of `current` and the rest are kept.
///
/// # Example
///
/// ```rust
/// use rewind::delta::merge_partial;
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// struct Settings {
///     theme: String,
///     font_size: u32,
/// }
///
/// let current = Settings { theme: "dark".into(), font_size: 12 };
/// let next = merge_partial(&current, json!({ "font_size": 14 }), false).unwrap();
/// assert_eq!(next, Settings { theme: "dark".into(), font_size: 14 });
/// ```
pub fn merge_partial<T: State>(current: &T, partial: Value, replace: bool) -> Result<T, DeltaError> {
    if replace {
        return serde_json::from_value(partial).map_err(DeltaError::Decode);
    }

    let mut value = encode(current)?;
    let Value::Object(target) = &mut value else {
        // Non-object states have no fields to merge into; the partial is the whole value.
        return serde_json::from_value(partial).map_err(DeltaError::Decode);
    };
    let Value::Object(fields) = partial else {
        return Err(DeltaError::NotAContainer {
            path: "/".to_string(),
        });
    };
    target.extend(fields);
    serde_json::from_value(value).map_err(DeltaError::Decode)
}

fn encode<T: State>(state: &T) -> Result<Value, DeltaError> {
    serde_json::to_value(state).map_err(DeltaError::Encode)
}

//! Keyframe storage: `(progress, value)` pairs kept sorted by progress.
//!
//! Invariants:
//! - every progress lies in [0, 1] (NaN never enters the table)
//! - progress values are strictly increasing (no duplicates)

use crate::value::Value;
use crate::KeyframeError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One anchor on the normalized timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub progress: f64,
    pub value: Value,
}

impl Keyframe {
    #[inline]
    pub fn new(progress: f64, value: impl Into<Value>) -> Self {
        Self {
            progress,
            value: value.into(),
        }
    }
}

impl<V: Into<Value>> From<(f64, V)> for Keyframe {
    fn from((progress, value): (f64, V)) -> Self {
        Keyframe::new(progress, value)
    }
}

/// Validate a keyframe progress; NaN fails the range check and `-0.0`
/// comes back as `0.0`.
#[inline]
pub fn check_progress(progress: f64) -> Result<f64, KeyframeError> {
    if (0.0..=1.0).contains(&progress) {
        Ok(if progress == 0.0 { 0.0 } else { progress })
    } else {
        Err(KeyframeError::ProgressOutOfRange { progress })
    }
}

#[inline]
fn by_progress(a: &Keyframe, b: &Keyframe) -> Ordering {
    a.progress.total_cmp(&b.progress)
}

/// Sorted keyframe table.
///
/// Serializes as a plain keyframe list; deserializing goes through
/// [`KeyframeTable::replace_all`], so unsorted input is accepted and
/// out-of-range progress is rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeTable {
    frames: Vec<Keyframe>,
}

impl KeyframeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from unordered keyframes; see [`KeyframeTable::replace_all`].
    pub fn from_keyframes<I>(keyframes: I) -> Result<Self, KeyframeError>
    where
        I: IntoIterator<Item = Keyframe>,
    {
        let mut table = Self::new();
        table.replace_all(keyframes)?;
        Ok(table)
    }

    /// Index of the first keyframe whose progress is `>= progress`
    /// (`len()` if there is none).
    #[inline]
    pub fn lower_bound(&self, progress: f64) -> usize {
        self.frames.partition_point(|k| k.progress < progress)
    }

    /// Set, replace or (with `None`) remove the keyframe at `progress`.
    ///
    /// Out-of-range progress is rejected and leaves the table untouched.
    pub fn set_value_at(
        &mut self,
        progress: f64,
        value: Option<Value>,
    ) -> Result<(), KeyframeError> {
        let progress = check_progress(progress)?;
        let idx = self.lower_bound(progress);
        let exact = self.frames.get(idx).is_some_and(|k| k.progress == progress);
        match (exact, value) {
            (true, Some(value)) => self.frames[idx].value = value,
            (true, None) => {
                self.frames.remove(idx);
            }
            (false, Some(value)) => self.frames.insert(idx, Keyframe { progress, value }),
            (false, None) => {}
        }
        Ok(())
    }

    /// Exact-match lookup; no interpolation.
    pub fn value_at(&self, progress: f64) -> Option<&Value> {
        let idx = self.lower_bound(progress);
        self.frames
            .get(idx)
            .filter(|k| k.progress == progress)
            .map(|k| &k.value)
    }

    /// Replace every keyframe. Input order does not matter; for duplicate
    /// progress values the entry that comes later in the input wins.
    ///
    /// The whole batch is rejected if any progress is outside [0, 1].
    pub fn replace_all<I>(&mut self, keyframes: I) -> Result<(), KeyframeError>
    where
        I: IntoIterator<Item = Keyframe>,
    {
        let mut frames: Vec<Keyframe> = keyframes.into_iter().collect();
        for k in frames.iter_mut() {
            k.progress = check_progress(k.progress)?;
        }
        // Stable sort keeps input order among equal progress values.
        frames.sort_by(by_progress);
        let mut deduped: Vec<Keyframe> = Vec::with_capacity(frames.len());
        for k in frames {
            match deduped.last_mut() {
                Some(last) if last.progress == k.progress => *last = k,
                _ => deduped.push(k),
            }
        }
        self.frames = deduped;
        Ok(())
    }

    /// All keyframes, ascending by progress.
    #[inline]
    pub fn key_values(&self) -> &[Keyframe] {
        &self.frames
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe> {
        self.frames.iter()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Keyframe> {
        self.frames.get(idx)
    }

    #[inline]
    pub fn first(&self) -> Option<&Keyframe> {
        self.frames.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&Keyframe> {
        self.frames.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl<'a> IntoIterator for &'a KeyframeTable {
    type Item = &'a Keyframe;
    type IntoIter = std::slice::Iter<'a, Keyframe>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl TryFrom<Vec<Keyframe>> for KeyframeTable {
    type Error = KeyframeError;

    fn try_from(keyframes: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::from_keyframes(keyframes)
    }
}

impl From<KeyframeTable> for Vec<Keyframe> {
    fn from(table: KeyframeTable) -> Self {
        table.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progresses(table: &KeyframeTable) -> Vec<f64> {
        table.iter().map(|k| k.progress).collect()
    }

    #[test]
    fn inserts_keep_sorted_order() {
        let mut table = KeyframeTable::new();
        for p in [0.5, 1.0, 0.0, 0.25, 0.75] {
            table.set_value_at(p, Some(Value::Double(p))).unwrap();
        }
        assert_eq!(progresses(&table), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn set_existing_replaces_and_absent_removes() {
        let mut table = KeyframeTable::new();
        table.set_value_at(0.5, Some(Value::Int(1))).unwrap();
        table.set_value_at(1.0, Some(Value::Int(2))).unwrap();

        table.set_value_at(0.5, Some(Value::Int(9))).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value_at(0.5), Some(&Value::Int(9)));

        table.set_value_at(0.5, None).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.value_at(0.5), None);

        // Removing a missing keyframe is a no-op.
        table.set_value_at(0.3, None).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn out_of_range_progress_is_rejected() {
        let mut table = KeyframeTable::new();
        table.set_value_at(0.5, Some(Value::Int(1))).unwrap();
        for bad in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            let err = table.set_value_at(bad, Some(Value::Int(3))).unwrap_err();
            assert!(matches!(err, KeyframeError::ProgressOutOfRange { .. }));
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn value_at_is_exact_match_only() {
        let table = KeyframeTable::from_keyframes(vec![
            Keyframe::new(0.0, Value::Int(0)),
            Keyframe::new(1.0, Value::Int(10)),
        ])
        .unwrap();
        assert_eq!(table.value_at(0.0), Some(&Value::Int(0)));
        assert_eq!(table.value_at(0.5), None);
        assert_eq!(table.value_at(1.0), Some(&Value::Int(10)));
    }

    #[test]
    fn replace_all_sorts_and_later_duplicates_win() {
        let mut table = KeyframeTable::new();
        table
            .replace_all(vec![
                Keyframe::new(1.0, Value::Int(3)),
                Keyframe::new(0.5, Value::Int(1)),
                Keyframe::new(0.0, Value::Int(0)),
                Keyframe::new(0.5, Value::Int(2)),
            ])
            .unwrap();
        assert_eq!(progresses(&table), vec![0.0, 0.5, 1.0]);
        assert_eq!(table.value_at(0.5), Some(&Value::Int(2)));
    }

    #[test]
    fn replace_all_rejects_whole_batch() {
        let mut table = KeyframeTable::from_keyframes(vec![Keyframe::new(0.0, Value::Int(1))]).unwrap();
        let err = table
            .replace_all(vec![
                Keyframe::new(0.5, Value::Int(1)),
                Keyframe::new(2.0, Value::Int(2)),
            ])
            .unwrap_err();
        assert_eq!(err, KeyframeError::ProgressOutOfRange { progress: 2.0 });
        assert_eq!(progresses(&table), vec![0.0]);
    }

    #[test]
    fn lower_bound_finds_first_not_less() {
        let table = KeyframeTable::from_keyframes(vec![
            Keyframe::new(0.2, Value::Int(1)),
            Keyframe::new(0.6, Value::Int(2)),
        ])
        .unwrap();
        assert_eq!(table.lower_bound(0.0), 0);
        assert_eq!(table.lower_bound(0.2), 0);
        assert_eq!(table.lower_bound(0.3), 1);
        assert_eq!(table.lower_bound(0.6), 1);
        assert_eq!(table.lower_bound(0.9), 2);
    }

    #[test]
    fn negative_zero_is_the_same_slot_as_zero() {
        let table = KeyframeTable::from_keyframes(vec![
            Keyframe::new(0.0, Value::Int(1)),
            Keyframe::new(-0.0, Value::Int(2)),
        ])
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.value_at(0.0), Some(&Value::Int(2)));
        assert!(table.first().unwrap().progress.is_sign_positive());

        let mut table = KeyframeTable::new();
        table.set_value_at(-0.0, Some(Value::Int(5))).unwrap();
        table.set_value_at(0.0, Some(Value::Int(6))).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.value_at(-0.0), Some(&Value::Int(6)));
    }

    #[test]
    fn deserialized_table_is_sorted_and_validated() {
        let json = r#"[
            { "progress": 0.9, "value": { "type": "Int", "data": 9 } },
            { "progress": 0.1, "value": { "type": "Int", "data": 1 } },
            { "progress": 0.1, "value": { "type": "Int", "data": 2 } }
        ]"#;
        let table: KeyframeTable = serde_json::from_str(json).unwrap();
        assert_eq!(progresses(&table), vec![0.1, 0.9]);
        assert_eq!(table.value_at(0.1), Some(&Value::Int(2)));

        let json = r#"[
            { "progress": 0.9, "value": { "type": "Int", "data": 9 } },
            { "progress": 7.0, "value": { "type": "Int", "data": 7 } }
        ]"#;
        assert!(serde_json::from_str::<KeyframeTable>(json).is_err());
    }

    #[test]
    fn serializes_as_a_keyframe_list() {
        let table = KeyframeTable::from_keyframes(vec![Keyframe::new(0.5, Value::Int(1))]).unwrap();
        assert_eq!(
            serde_json::to_value(&table).unwrap(),
            serde_json::json!([{ "progress": 0.5, "value": { "type": "Int", "data": 1 } }])
        );
    }
}

//! KeyframeAnimation: one engine instance per animated property.
//!
//! The host driver owns wall-clock time and calls
//! [`KeyframeAnimation::on_time_advanced`] once per tick; the engine maps the
//! time to effective progress (direction + easing), keeps the bracketing
//! interval cached, and publishes the interpolated value to listeners.
//!
//! Cache discipline:
//! - keyframe/default-value changes mark the cache `DirtyStructural` and
//!   recompute eagerly with a forced re-bracket
//! - duration/easing/direction/override changes mark it `DirtyProgress`;
//!   the value is recomputed on the next read or tick
//! - a tick re-brackets only when progress leaves the cached interval
//!
//! The engine is single-writer: every mutating call takes `&mut self` and
//! there is no internal locking. Only the shared [`InterpRegistry`] is locked.

use crate::config::{AnimationConfig, Direction};
use crate::easing::EasingCurve;
use crate::interp::{InterpRegistry, SharedInterpolator};
use crate::interval::{anchor_count, CurrentInterval};
use crate::keyframes::{Keyframe, KeyframeTable};
use crate::value::Value;
use crate::KeyframeError;
use std::fmt;
use std::sync::Arc;

/// Validity of the cached interval/value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CacheState {
    /// Interval and value match the current inputs.
    Valid,
    /// Timing inputs changed; the bracket may still hold.
    DirtyProgress,
    /// Anchors changed; the next recompute must re-bracket.
    DirtyStructural,
}

/// Counters exposing how much work recomputation actually did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecomputeStats {
    /// Sorted searches performed to establish a new bracket.
    pub bracket_searches: u64,
    /// Interpolations evaluated (one per published value).
    pub evaluations: u64,
    /// Recompute requests ignored because fewer than two anchors exist.
    pub skipped_underdetermined: u64,
}

/// Handle returned by [`KeyframeAnimation::on_value_changed`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ValueListener = Box<dyn FnMut(Option<&Value>) + Send>;

pub struct KeyframeAnimation {
    keyframes: KeyframeTable,
    default_value: Option<Value>,
    interval: Option<CurrentInterval>,
    current_value: Option<Value>,
    cache: CacheState,

    duration_ms: i64,
    current_time_ms: i64,
    direction: Direction,
    easing: EasingCurve,

    registry: Arc<InterpRegistry>,
    interpolator: Option<SharedInterpolator>,

    listeners: Vec<(ListenerId, ValueListener)>,
    next_listener: u64,
    stats: RecomputeStats,
}

impl KeyframeAnimation {
    /// Engine with default config, dispatching through the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(InterpRegistry::global())
    }

    /// Engine with default config and an explicit registry.
    pub fn with_registry(registry: Arc<InterpRegistry>) -> Self {
        let cfg = AnimationConfig::default();
        Self {
            keyframes: KeyframeTable::new(),
            default_value: None,
            interval: None,
            current_value: None,
            cache: CacheState::DirtyStructural,
            duration_ms: cfg.duration_ms,
            current_time_ms: 0,
            direction: cfg.direction,
            easing: EasingCurve::linear(),
            registry,
            interpolator: None,
            listeners: Vec::new(),
            next_listener: 0,
            stats: RecomputeStats::default(),
        }
    }

    pub fn with_config(cfg: &AnimationConfig) -> Result<Self, KeyframeError> {
        Self::with_config_and_registry(cfg, InterpRegistry::global())
    }

    pub fn with_config_and_registry(
        cfg: &AnimationConfig,
        registry: Arc<InterpRegistry>,
    ) -> Result<Self, KeyframeError> {
        let mut anim = Self::with_registry(registry);
        anim.set_duration(cfg.duration_ms)?;
        anim.set_direction(cfg.direction);
        Ok(anim)
    }

    // ---------------------------------------------------------------------
    // Timing inputs
    // ---------------------------------------------------------------------

    #[inline]
    pub fn duration(&self) -> i64 {
        self.duration_ms
    }

    /// Set the duration in milliseconds. Negative values are rejected and
    /// leave the engine unchanged.
    pub fn set_duration(&mut self, duration_ms: i64) -> Result<(), KeyframeError> {
        if duration_ms < 0 {
            log::warn!("KeyframeAnimation::set_duration: cannot set a negative duration ({duration_ms} ms)");
            return Err(KeyframeError::NegativeDuration { duration_ms });
        }
        if self.duration_ms != duration_ms {
            self.duration_ms = duration_ms;
            self.mark_progress_dirty();
        }
        Ok(())
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        if self.direction != direction {
            self.direction = direction;
            self.mark_progress_dirty();
        }
    }

    #[inline]
    pub fn easing_curve(&self) -> &EasingCurve {
        &self.easing
    }

    pub fn set_easing_curve(&mut self, easing: EasingCurve) {
        self.easing = easing;
        self.mark_progress_dirty();
    }

    /// Last time reported by the host, in milliseconds.
    #[inline]
    pub fn current_time(&self) -> i64 {
        self.current_time_ms
    }

    /// Effective progress for the last reported time: direction, then easing.
    pub fn effective_progress(&self) -> f64 {
        let raw = if self.duration_ms == 0 {
            self.direction.end_progress()
        } else {
            let t = self.current_time_ms as f64 / self.duration_ms as f64;
            match self.direction {
                Direction::Forward => t,
                Direction::Backward => 1.0 - t,
            }
        };
        self.easing.value_for_progress(raw)
    }

    /// Tick entry point for the host driver.
    pub fn on_time_advanced(&mut self, current_time_ms: i64) {
        self.current_time_ms = current_time_ms;
        self.recalculate(false);
    }

    // ---------------------------------------------------------------------
    // Anchors
    // ---------------------------------------------------------------------

    /// Keyframe value at exactly `progress`, if any.
    #[inline]
    pub fn key_value_at(&self, progress: f64) -> Option<&Value> {
        self.keyframes.value_at(progress)
    }

    /// Keyframes sorted by progress.
    #[inline]
    pub fn key_values(&self) -> &[Keyframe] {
        self.keyframes.key_values()
    }

    /// Create, replace or (with `None`) remove the keyframe at `progress`.
    pub fn set_key_value_at(
        &mut self,
        progress: f64,
        value: Option<Value>,
    ) -> Result<(), KeyframeError> {
        if let Err(err) = self.keyframes.set_value_at(progress, value) {
            log::warn!("KeyframeAnimation::set_key_value_at: {err}");
            return Err(err);
        }
        self.structural_change();
        Ok(())
    }

    /// Replace all keyframes. The batch is sorted; later duplicates win.
    pub fn set_key_values<I>(&mut self, keyframes: I) -> Result<(), KeyframeError>
    where
        I: IntoIterator<Item = Keyframe>,
    {
        if let Err(err) = self.keyframes.replace_all(keyframes) {
            log::warn!("KeyframeAnimation::set_key_values: {err}");
            return Err(err);
        }
        self.structural_change();
        Ok(())
    }

    #[inline]
    pub fn start_value(&self) -> Option<&Value> {
        self.key_value_at(0.0)
    }

    pub fn set_start_value(&mut self, value: Option<Value>) {
        if self.keyframes.set_value_at(0.0, value).is_ok() {
            self.structural_change();
        }
    }

    #[inline]
    pub fn end_value(&self) -> Option<&Value> {
        self.key_value_at(1.0)
    }

    pub fn set_end_value(&mut self, value: Option<Value>) {
        if self.keyframes.set_value_at(1.0, value).is_ok() {
            self.structural_change();
        }
    }

    #[inline]
    pub fn default_start_end_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Implicit anchor used at progress 0 and/or 1 when no keyframe sits there.
    pub fn set_default_start_end_value(&mut self, value: Option<Value>) {
        self.default_value = value;
        self.structural_change();
    }

    // ---------------------------------------------------------------------
    // Blending
    // ---------------------------------------------------------------------

    /// Per-engine blending override; `None` restores registry dispatch.
    pub fn set_interpolator(&mut self, interpolator: Option<SharedInterpolator>) {
        self.interpolator = interpolator;
        self.mark_progress_dirty();
    }

    #[inline]
    pub fn has_interpolator_override(&self) -> bool {
        self.interpolator.is_some()
    }

    #[inline]
    pub fn registry(&self) -> &Arc<InterpRegistry> {
        &self.registry
    }

    /// Blend two values the way this engine would: the override if set,
    /// otherwise a fresh registry lookup.
    pub fn interpolated(&self, from: &Value, to: &Value, t: f64) -> Option<Value> {
        match &self.interpolator {
            Some(f) => f.interpolate(from, to, t),
            None => self.registry.interpolate(from, to, t),
        }
    }

    // ---------------------------------------------------------------------
    // Publication
    // ---------------------------------------------------------------------

    /// Current value, recomputing first if the cache is stale or no value
    /// has been computed yet. With fewer than two anchors the previously
    /// cached value (possibly `None`) is returned unchanged.
    pub fn current_value(&mut self) -> Option<Value> {
        if self.current_value.is_none() || self.cache != CacheState::Valid {
            self.recalculate(false);
        }
        self.current_value.clone()
    }

    /// Cached value without triggering a recompute.
    #[inline]
    pub fn cached_value(&self) -> Option<&Value> {
        self.current_value.as_ref()
    }

    /// Register a listener called after every recompute that publishes a value.
    pub fn on_value_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(Option<&Value>) + Send + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    // ---------------------------------------------------------------------
    // Cache
    // ---------------------------------------------------------------------

    #[inline]
    pub fn cache_state(&self) -> CacheState {
        self.cache
    }

    #[inline]
    pub fn stats(&self) -> RecomputeStats {
        self.stats
    }

    #[inline]
    pub fn current_interval(&self) -> Option<&CurrentInterval> {
        self.interval.as_ref()
    }

    /// Recompute the interval (if needed) and the current value for the
    /// last reported time. `force` re-brackets unconditionally; a pending
    /// structural change forces as well.
    ///
    /// Does nothing while fewer than two anchors exist.
    pub fn recalculate(&mut self, force: bool) {
        if anchor_count(&self.keyframes, self.default_value.as_ref()) < 2 {
            self.stats.skipped_underdetermined += 1;
            return;
        }

        let progress = self.effective_progress();
        let force = force || self.cache == CacheState::DirtyStructural;
        let rebracket = force
            || self
                .interval
                .as_ref()
                .map_or(true, |iv| iv.needs_rebracket(progress));

        if rebracket {
            self.stats.bracket_searches += 1;
            self.interval = CurrentInterval::bracket(
                &self.keyframes,
                self.default_value.as_ref(),
                progress,
                &self.registry,
            );
            if let Some(iv) = &self.interval {
                log::debug!(
                    "keyframe interval [{} -> {}] for progress {progress} ({:?})",
                    iv.start.progress,
                    iv.end.progress,
                    iv.interpolation
                );
            }
        }

        self.set_current_value_for_progress(progress);
        self.cache = CacheState::Valid;
    }

    fn set_current_value_for_progress(&mut self, progress: f64) {
        let Some(iv) = &self.interval else {
            return;
        };
        let local = iv.local_progress(progress);
        let value = iv.values().and_then(|(from, to)| match &self.interpolator {
            Some(f) => f.interpolate(from, to, local),
            None => iv.interpolation.apply(from, to, local),
        });
        log::trace!("keyframe value at progress {progress} (local {local}): {value:?}");

        self.stats.evaluations += 1;
        self.current_value = value;
        let current = self.current_value.as_ref();
        for (_, listener) in self.listeners.iter_mut() {
            listener(current);
        }
    }

    fn structural_change(&mut self) {
        self.cache = CacheState::DirtyStructural;
        self.recalculate(true);
    }

    fn mark_progress_dirty(&mut self) {
        if self.cache == CacheState::Valid {
            self.cache = CacheState::DirtyProgress;
        }
    }
}

impl Default for KeyframeAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyframeAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyframeAnimation")
            .field("keyframes", &self.keyframes)
            .field("default_value", &self.default_value)
            .field("current_value", &self.current_value)
            .field("cache", &self.cache)
            .field("duration_ms", &self.duration_ms)
            .field("current_time_ms", &self.current_time_ms)
            .field("direction", &self.direction)
            .field("easing", &self.easing)
            .field("listeners", &self.listeners.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolated() -> KeyframeAnimation {
        KeyframeAnimation::with_registry(Arc::new(InterpRegistry::new()))
    }

    #[test]
    fn new_engine_starts_structurally_dirty() {
        let anim = isolated();
        assert_eq!(anim.cache_state(), CacheState::DirtyStructural);
        assert_eq!(anim.duration(), crate::config::DEFAULT_DURATION_MS);
        assert_eq!(anim.direction(), Direction::Forward);
    }

    #[test]
    fn timing_changes_are_lazy() {
        let mut anim = isolated();
        anim.set_key_values(vec![
            Keyframe::new(0.0, Value::Double(0.0)),
            Keyframe::new(1.0, Value::Double(1.0)),
        ])
        .unwrap();
        assert_eq!(anim.cache_state(), CacheState::Valid);
        let evaluations = anim.stats().evaluations;

        anim.set_duration(1000).unwrap();
        anim.set_easing_curve(EasingCurve::new(|t| t * t));
        assert_eq!(anim.cache_state(), CacheState::DirtyProgress);
        assert_eq!(anim.stats().evaluations, evaluations);

        anim.current_value();
        assert_eq!(anim.cache_state(), CacheState::Valid);
        assert_eq!(anim.stats().evaluations, evaluations + 1);
    }

    #[test]
    fn same_duration_is_a_no_op() {
        let mut anim = isolated();
        anim.set_key_values(vec![
            Keyframe::new(0.0, Value::Int(0)),
            Keyframe::new(1.0, Value::Int(1)),
        ])
        .unwrap();
        anim.set_duration(anim.duration()).unwrap();
        assert_eq!(anim.cache_state(), CacheState::Valid);
    }

    #[test]
    fn structural_mark_survives_underdetermined_recompute() {
        let mut anim = isolated();
        anim.set_key_value_at(0.5, Some(Value::Int(1))).unwrap();
        assert_eq!(anim.cache_state(), CacheState::DirtyStructural);
        assert_eq!(anim.stats().skipped_underdetermined, 1);
        assert!(anim.current_interval().is_none());
    }

    #[test]
    fn removed_listener_is_not_called() {
        let mut anim = isolated();
        let (tx, rx) = std::sync::mpsc::channel();
        let id = anim.on_value_changed(move |v| {
            let _ = tx.send(v.cloned());
        });
        anim.set_key_values(vec![
            Keyframe::new(0.0, Value::Int(0)),
            Keyframe::new(1.0, Value::Int(10)),
        ])
        .unwrap();
        assert_eq!(rx.try_recv().unwrap(), Some(Value::Int(0)));

        assert!(anim.remove_listener(id));
        assert!(!anim.remove_listener(id));
        anim.on_time_advanced(125);
        assert!(rx.try_recv().is_err());
    }
}

//! Interpolation registry (the dispatch table) and helpers.
//!
//! The registry maps a `ValueKind` to the interpolator that blends two values
//! of that kind. Lookups consult registered entries first and fall back to
//! the built-ins in [`functions`]. Mismatched or unhandled kinds resolve to
//! the no-op, which yields an absent value.
//!
//! A registry is `Send + Sync`. One mutex guards the table and is held only
//! for the map access itself; interpolators are cloned out as `Arc`s and run
//! without the lock.

pub mod functions;

use crate::value::{Value, ValueKind};
use functions::{builtin_interpolator, noop_value, BuiltinFn};
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Blends two values of the same kind at local progress `t`.
pub trait Interpolator: Send + Sync {
    fn interpolate(&self, from: &Value, to: &Value, t: f64) -> Option<Value>;
}

impl<F> Interpolator for F
where
    F: Fn(&Value, &Value, f64) -> Option<Value> + Send + Sync,
{
    #[inline]
    fn interpolate(&self, from: &Value, to: &Value, t: f64) -> Option<Value> {
        self(from, to, t)
    }
}

pub type SharedInterpolator = Arc<dyn Interpolator>;

/// Wrap a closure as a [`SharedInterpolator`].
pub fn interpolator<F>(f: F) -> SharedInterpolator
where
    F: Fn(&Value, &Value, f64) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An interpolator resolved for one pair of endpoint kinds.
#[derive(Clone)]
pub enum Interpolation {
    /// Entry installed through [`InterpRegistry::register`].
    Registered(SharedInterpolator),
    /// Built-in component-wise blend.
    Builtin(BuiltinFn),
    /// Mismatched or unhandled kinds; always yields `None`.
    Noop,
}

impl Interpolation {
    #[inline]
    pub fn apply(&self, from: &Value, to: &Value, t: f64) -> Option<Value> {
        match self {
            Interpolation::Registered(f) => f.interpolate(from, to, t),
            Interpolation::Builtin(f) => f(from, to, t),
            Interpolation::Noop => noop_value(from, to, t),
        }
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        matches!(self, Interpolation::Noop)
    }
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Noop
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Registered(_) => f.write_str("Interpolation::Registered"),
            Interpolation::Builtin(_) => f.write_str("Interpolation::Builtin"),
            Interpolation::Noop => f.write_str("Interpolation::Noop"),
        }
    }
}

static GLOBAL: Lazy<Arc<InterpRegistry>> = Lazy::new(|| Arc::new(InterpRegistry::new()));

/// Registry of interpolators keyed by value kind.
#[derive(Default)]
pub struct InterpRegistry {
    entries: Mutex<HashMap<ValueKind, SharedInterpolator>>,
}

impl InterpRegistry {
    /// An isolated registry holding no registrations (built-ins still apply).
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry shared by engines built without an explicit one.
    pub fn global() -> Arc<InterpRegistry> {
        Arc::clone(&GLOBAL)
    }

    fn table(&self) -> MutexGuard<'_, HashMap<ValueKind, SharedInterpolator>> {
        // Entries are plain data; a panic elsewhere cannot leave them half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install, override, or (with `None`) remove the interpolator for `kind`.
    ///
    /// Removing a kind that has a built-in reverts it to the built-in;
    /// otherwise the kind becomes unhandled. Only lookups made after this call
    /// observe the change.
    pub fn register(&self, kind: ValueKind, interpolator: Option<SharedInterpolator>) {
        match (&interpolator, Self::has_builtin(&kind)) {
            (Some(_), true) => log::debug!("interp registry: register {kind} (overrides built-in)"),
            (Some(_), false) => log::debug!("interp registry: register {kind}"),
            (None, true) => log::debug!("interp registry: unregister {kind} (reverts to built-in)"),
            (None, false) => log::debug!("interp registry: unregister {kind}"),
        }
        let mut table = self.table();
        match interpolator {
            Some(f) => {
                table.insert(kind, f);
            }
            None => {
                table.remove(&kind);
            }
        }
    }

    /// Register a closure for `kind`.
    pub fn register_fn<F>(&self, kind: ValueKind, f: F)
    where
        F: Fn(&Value, &Value, f64) -> Option<Value> + Send + Sync + 'static,
    {
        self.register(kind, Some(interpolator(f)));
    }

    #[inline]
    pub fn unregister(&self, kind: &ValueKind) {
        self.register(kind.clone(), None);
    }

    pub fn is_registered(&self, kind: &ValueKind) -> bool {
        self.table().contains_key(kind)
    }

    /// Kinds with a registered (non built-in) interpolator.
    pub fn registered_kinds(&self) -> Vec<ValueKind> {
        self.table().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    /// Whether `kind` can be blended without any registration.
    #[inline]
    pub fn has_builtin(kind: &ValueKind) -> bool {
        builtin_interpolator(kind).is_some()
    }

    /// Resolve the interpolation for a pair of endpoint kinds.
    pub fn resolve(&self, from: &ValueKind, to: &ValueKind) -> Interpolation {
        if from != to {
            return Interpolation::Noop;
        }
        // Clone out under the lock, never call through it.
        let registered = self.table().get(from).cloned();
        if let Some(f) = registered {
            return Interpolation::Registered(f);
        }
        match builtin_interpolator(from) {
            Some(f) => Interpolation::Builtin(f),
            None => Interpolation::Noop,
        }
    }

    /// One-shot resolve and apply.
    pub fn interpolate(&self, from: &Value, to: &Value, t: f64) -> Option<Value> {
        if !from.same_kind(to) {
            return None;
        }
        self.resolve(&from.kind(), &to.kind()).apply(from, to, t)
    }
}

impl fmt::Debug for InterpRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpRegistry")
            .field("registered", &self.registered_kinds())
            .finish()
    }
}

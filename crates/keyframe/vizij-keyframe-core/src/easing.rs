//! Easing curve: an opaque `progress -> progress` mapping supplied by the host.
//!
//! The engine only calls [`EasingCurve::value_for_progress`]; curves may
//! return values outside [0, 1] (overshoot), which the engine extrapolates.

use std::fmt;
use std::sync::Arc;

type EaseFn = dyn Fn(f64) -> f64 + Send + Sync;

#[derive(Clone, Default)]
pub struct EasingCurve {
    // `None` is the identity (linear) curve.
    f: Option<Arc<EaseFn>>,
}

impl EasingCurve {
    /// Identity mapping.
    pub fn linear() -> Self {
        Self::default()
    }

    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self { f: Some(Arc::new(f)) }
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        self.f.is_none()
    }

    #[inline]
    pub fn value_for_progress(&self, progress: f64) -> f64 {
        match &self.f {
            Some(f) => f(progress),
            None => progress,
        }
    }
}

impl fmt::Debug for EasingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_linear() {
            f.write_str("EasingCurve::Linear")
        } else {
            f.write_str("EasingCurve::Custom")
        }
    }
}

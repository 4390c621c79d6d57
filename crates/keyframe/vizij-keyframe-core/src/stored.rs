use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::animation::KeyframeAnimation;
use crate::config::{AnimationConfig, Direction};
use crate::interp::InterpRegistry;
use crate::keyframes::{check_progress, Keyframe};
use crate::value::Value;
use crate::KeyframeError;

/// Serialized keyframe animation.
///
/// ```json
/// {
///   "duration_ms": 1000,
///   "direction": "forward",
///   "default_value": { "type": "Int", "data": 0 },
///   "keyframes": [ { "progress": 1.0, "value": { "type": "Int", "data": 100 } } ]
/// }
/// ```
///
/// Notes:
/// - `duration_ms` and `direction` fall back to `AnimationConfig::default()`.
/// - Keyframes may appear in any order; they are sorted on build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeDocument {
    #[serde(flatten)]
    pub config: AnimationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl KeyframeDocument {
    /// Check progress ranges and duration without building an engine.
    pub fn validate(&self) -> Result<(), KeyframeError> {
        if self.config.duration_ms < 0 {
            return Err(KeyframeError::NegativeDuration {
                duration_ms: self.config.duration_ms,
            });
        }
        for k in &self.keyframes {
            check_progress(k.progress)?;
        }
        Ok(())
    }

    /// Build an engine on the process-wide registry.
    pub fn build(&self) -> Result<KeyframeAnimation, KeyframeError> {
        self.build_with_registry(InterpRegistry::global())
    }

    pub fn build_with_registry(
        &self,
        registry: Arc<InterpRegistry>,
    ) -> Result<KeyframeAnimation, KeyframeError> {
        self.validate()?;
        let mut anim = KeyframeAnimation::with_config_and_registry(&self.config, registry)?;
        anim.set_key_values(self.keyframes.iter().cloned())?;
        if self.default_value.is_some() {
            anim.set_default_start_end_value(self.default_value.clone());
        }
        Ok(anim)
    }

    /// Snapshot an engine's anchors and timing.
    pub fn from_animation(anim: &KeyframeAnimation) -> Self {
        Self {
            config: AnimationConfig {
                duration_ms: anim.duration(),
                direction: anim.direction(),
            },
            default_value: anim.default_start_end_value().cloned(),
            keyframes: anim.key_values().to_vec(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.config.direction
    }
}

/// Parse a keyframe document from JSON and validate it.
pub fn parse_keyframes_json(s: &str) -> Result<KeyframeDocument, KeyframeError> {
    let doc: KeyframeDocument = serde_json::from_str(s)?;
    doc.validate()?;
    Ok(doc)
}

/// Serialize an engine's anchors and timing to JSON.
pub fn to_keyframes_json(anim: &KeyframeAnimation) -> Result<String, KeyframeError> {
    Ok(serde_json::to_string_pretty(&KeyframeDocument::from_animation(anim))?)
}

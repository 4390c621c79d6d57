//! Shared JSON fixtures for keyframe tests, resolved through `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    keyframes: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod keyframes {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.keyframes.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.keyframes, "keyframes", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.keyframes, "keyframes", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.keyframes, "keyframes", name)?;
        Ok(resolve_path(rel))
    }

    /// Progress of every keyframe in the fixture, in file order.
    pub fn progresses(name: &str) -> Result<Vec<f64>> {
        let doc: serde_json::Value = load(name)?;
        doc.get("keyframes")
            .and_then(|k| k.as_array())
            .ok_or_else(|| anyhow!("keyframe fixture '{name}' has no keyframes array"))?
            .iter()
            .map(|k| {
                k.get("progress")
                    .and_then(|p| p.as_f64())
                    .ok_or_else(|| anyhow!("keyframe fixture '{name}' has a keyframe without progress"))
            })
            .collect()
    }

    /// Fixture JSON with top-level document fields (`duration_ms`,
    /// `direction`, `default_value`, ...) replaced by those in `overrides`.
    pub fn json_with(name: &str, overrides: serde_json::Value) -> Result<String> {
        let mut doc: serde_json::Value = load(name)?;
        let (Some(fields), Some(patch)) = (doc.as_object_mut(), overrides.as_object()) else {
            return Err(anyhow!(
                "keyframe fixture '{name}' and its overrides must both be JSON objects"
            ));
        };
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        serde_json::to_string(&doc).context("failed to re-serialize keyframe fixture")
    }
}

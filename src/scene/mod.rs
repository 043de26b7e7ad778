//! Scene configuration store.
//!
//! Holds camera, lighting, visibility and quality settings for the rendering
//! layer. Independent of the domain stores; the renderer reads it, never writes.

pub mod config;

pub use config::*;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::StoreError;

#[derive(Clone)]
pub struct SceneStore {
    state: Arc<watch::Sender<SceneConfig>>,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneStore {
    pub fn new(initial: SceneConfig) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn config(&self) -> SceneConfig {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SceneConfig> {
        self.state.subscribe()
    }

    pub fn set_camera(&self, camera: CameraConfig) {
        self.state.send_modify(|c| c.camera = camera);
    }

    pub fn set_camera_position(&self, position: [f64; 3]) {
        self.state.send_modify(|c| c.camera.position = position);
    }

    pub fn set_lighting(&self, lighting: LightingConfig) {
        self.state.send_modify(|c| c.lighting = lighting);
    }

    pub fn set_object_visibility(&self, object: SceneObject, visible: bool) {
        self.state.send_if_modified(|c| {
            let changed = c.object_visibility.get(object) != visible;
            c.object_visibility.set(object, visible);
            changed
        });
    }

    /// Flip one object's visibility and return the new value.
    pub fn toggle_object(&self, object: SceneObject) -> bool {
        let mut visible = false;
        self.state.send_modify(|c| {
            visible = !c.object_visibility.get(object);
            c.object_visibility.set(object, visible);
        });
        visible
    }

    pub fn set_orbit_controls(&self, controls: OrbitControls) {
        self.state.send_modify(|c| c.orbit_controls = controls);
    }

    pub fn set_auto_rotate(&self, enabled: bool) {
        self.state.send_modify(|c| c.orbit_controls.auto_rotate = enabled);
    }

    pub fn set_render_quality(&self, quality: RenderQuality) {
        self.state.send_modify(|c| c.render_quality = quality);
    }

    /// Clamped to [`MIN_ANIMATION_SPEED`], [`MAX_ANIMATION_SPEED`].
    pub fn set_animation_speed(&self, speed: f64) {
        let speed = clamp_speed(speed);
        self.state.send_modify(|c| c.animation_speed = speed);
    }

    pub fn apply_quality_preset(&self, preset: QualityPreset) {
        self.state.send_modify(|c| c.render_quality = preset.config());
        info!(%preset, "quality preset applied");
    }

    pub fn apply_camera_preset(&self, preset: CameraPreset) {
        self.state.send_modify(|c| c.camera = preset.config());
        info!(%preset, "camera preset applied");
    }

    pub fn apply_lighting_preset(&self, preset: LightingPreset) {
        self.state.send_modify(|c| c.lighting = preset.config());
        info!(%preset, "lighting preset applied");
    }

    pub fn reset(&self) {
        self.state.send_replace(SceneConfig::default());
    }

    pub fn export_config(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&*self.state.borrow())
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load a previously exported configuration.
    ///
    /// Input that is not a JSON object is rejected and nothing changes. Otherwise
    /// every recognized key is decoded on its own; missing or malformed keys keep
    /// their current value.
    pub fn import_config(&self, json: &str) -> Result<(), StoreError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "scene import rejected");
            StoreError::Serialization(e.to_string())
        })?;
        let Value::Object(fields) = value else {
            warn!("scene import rejected: root is not an object");
            return Err(StoreError::Serialization(
                "scene configuration must be a JSON object".to_string(),
            ));
        };

        self.state.send_modify(|current| {
            let imported = SceneConfig {
                camera: field_or(&fields, "camera", &current.camera),
                lighting: field_or(&fields, "lighting", &current.lighting),
                object_visibility: field_or(
                    &fields,
                    "objectVisibility",
                    &current.object_visibility,
                ),
                orbit_controls: field_or(&fields, "orbitControls", &current.orbit_controls),
                render_quality: field_or(&fields, "renderQuality", &current.render_quality),
                animation_speed: clamp_speed(field_or(
                    &fields,
                    "animationSpeed",
                    &current.animation_speed,
                )),
            };
            *current = imported;
        });
        info!(keys = fields.len(), "scene configuration imported");
        Ok(())
    }
}

fn clamp_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.clamp(MIN_ANIMATION_SPEED, MAX_ANIMATION_SPEED)
    } else {
        1.0
    }
}

fn field_or<T: DeserializeOwned + Clone>(fields: &Map<String, Value>, key: &str, current: &T) -> T {
    match fields.get(key) {
        None => current.clone(),
        Some(raw) => serde_json::from_value(raw.clone()).unwrap_or_else(|e| {
            warn!(key, error = %e, "ignoring malformed scene field");
            current.clone()
        }),
    }
}

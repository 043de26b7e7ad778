use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const MIN_ANIMATION_SPEED: f64 = 0.1;
pub const MAX_ANIMATION_SPEED: f64 = 5.0;

/// Rendering configuration consumed by the 3D scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub object_visibility: ObjectVisibility,
    pub orbit_controls: OrbitControls,
    pub render_quality: RenderQuality,
    pub animation_speed: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraPreset::Overview.config(),
            lighting: LightingPreset::Day.config(),
            object_visibility: ObjectVisibility::default(),
            orbit_controls: OrbitControls::default(),
            render_quality: QualityPreset::High.config(),
            animation_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraConfig {
    pub position: [f64; 3],
    pub target: [f64; 3],
    pub fov: f64,
    pub near: f64,
    pub far: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingConfig {
    pub ambient_intensity: f64,
    pub directional_intensity: f64,
    pub directional_position: [f64; 3],
    /// Hex color, e.g. `#ffffff`.
    pub color: String,
    pub shadows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectVisibility {
    pub terrain: bool,
    pub power_plants: bool,
    pub transmission_lines: bool,
    pub distribution_nodes: bool,
    pub energy_flow: bool,
    pub weather: bool,
    pub labels: bool,
}

impl Default for ObjectVisibility {
    fn default() -> Self {
        Self {
            terrain: true,
            power_plants: true,
            transmission_lines: true,
            distribution_nodes: true,
            energy_flow: true,
            weather: false,
            labels: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SceneObject {
    Terrain,
    PowerPlants,
    TransmissionLines,
    DistributionNodes,
    EnergyFlow,
    Weather,
    Labels,
}

impl ObjectVisibility {
    pub fn get(&self, object: SceneObject) -> bool {
        *self.field(object)
    }

    pub fn set(&mut self, object: SceneObject, visible: bool) {
        *self.field_mut(object) = visible;
    }

    fn field(&self, object: SceneObject) -> &bool {
        match object {
            SceneObject::Terrain => &self.terrain,
            SceneObject::PowerPlants => &self.power_plants,
            SceneObject::TransmissionLines => &self.transmission_lines,
            SceneObject::DistributionNodes => &self.distribution_nodes,
            SceneObject::EnergyFlow => &self.energy_flow,
            SceneObject::Weather => &self.weather,
            SceneObject::Labels => &self.labels,
        }
    }

    fn field_mut(&mut self, object: SceneObject) -> &mut bool {
        match object {
            SceneObject::Terrain => &mut self.terrain,
            SceneObject::PowerPlants => &mut self.power_plants,
            SceneObject::TransmissionLines => &mut self.transmission_lines,
            SceneObject::DistributionNodes => &mut self.distribution_nodes,
            SceneObject::EnergyFlow => &mut self.energy_flow,
            SceneObject::Weather => &mut self.weather,
            SceneObject::Labels => &mut self.labels,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitControls {
    pub enabled: bool,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f64,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_rotate: false,
            auto_rotate_speed: 0.5,
            enable_zoom: true,
            enable_pan: true,
            min_distance: 10.0,
            max_distance: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderQuality {
    pub preset: QualityPreset,
    pub shadows: bool,
    pub antialias: bool,
    pub particle_count: u32,
    pub pixel_ratio: f64,
    pub post_processing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QualityPreset {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityPreset {
    pub fn config(self) -> RenderQuality {
        let (shadows, antialias, particle_count, pixel_ratio, post_processing) = match self {
            QualityPreset::Low => (false, false, 500, 1.0, false),
            QualityPreset::Medium => (true, false, 2_000, 1.0, false),
            QualityPreset::High => (true, true, 5_000, 1.5, true),
            QualityPreset::Ultra => (true, true, 12_000, 2.0, true),
        };
        RenderQuality {
            preset: self,
            shadows,
            antialias,
            particle_count,
            pixel_ratio,
            post_processing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CameraPreset {
    Overview,
    Closeup,
    Side,
    Top,
}

impl CameraPreset {
    pub fn config(self) -> CameraConfig {
        let (position, fov) = match self {
            CameraPreset::Overview => ([0.0, 120.0, 180.0], 60.0),
            CameraPreset::Closeup => ([0.0, 30.0, 50.0], 45.0),
            CameraPreset::Side => ([200.0, 40.0, 0.0], 55.0),
            CameraPreset::Top => ([0.0, 300.0, 0.01], 50.0),
        };
        CameraConfig {
            position,
            target: [0.0, 0.0, 0.0],
            fov,
            near: 0.1,
            far: 2_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LightingPreset {
    Day,
    Night,
    Dramatic,
    Studio,
}

impl LightingPreset {
    pub fn config(self) -> LightingConfig {
        let (ambient, directional, position, color, shadows) = match self {
            LightingPreset::Day => (0.6, 1.0, [100.0, 200.0, 100.0], "#ffffff", true),
            LightingPreset::Night => (0.15, 0.3, [-100.0, 150.0, -50.0], "#8fa8ff", false),
            LightingPreset::Dramatic => (0.1, 1.6, [200.0, 60.0, 0.0], "#ffb070", true),
            LightingPreset::Studio => (0.8, 0.7, [0.0, 250.0, 150.0], "#f4f4f4", false),
        };
        LightingConfig {
            ambient_intensity: ambient,
            directional_intensity: directional,
            directional_position: position,
            color: color.to_string(),
            shadows,
        }
    }
}

// src/bench/settings.rs
//! Data-driven startup config (`bench.ron`) and the live geometry settings edited from the panel.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "assets/bench.ron";

// ---------- Config file (data form) ----------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialPreset {
    pub name: String,
    #[serde(default = "default_color")]
    pub base_color: [f32; 4],
    #[serde(default)]
    pub metallic: f32,
    #[serde(default = "default_roughness")]
    pub perceptual_roughness: f32,
    #[serde(default)]
    pub unlit: bool,
}

impl MaterialPreset {
    pub fn to_material(&self) -> StandardMaterial {
        let [r, g, b, a] = self.base_color;
        StandardMaterial {
            base_color: Color::srgba(r, g, b, a),
            metallic: self.metallic,
            perceptual_roughness: self.perceptual_roughness,
            unlit: self.unlit,
            alpha_mode: if a < 1.0 { AlphaMode::Blend } else { AlphaMode::Opaque },
            ..default()
        }
    }
}

/// A user mesh loaded through the asset server, e.g. `models/rock.glb#Mesh0/Primitive0`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomMeshDef {
    pub name: String,
    pub path: String,
}

fn default_color() -> [f32; 4] {
    [0.8, 0.8, 0.8, 1.0]
}
fn default_roughness() -> f32 {
    0.5
}
fn default_count() -> [u32; 3] {
    [10, 1, 10]
}
fn default_spacing() -> f32 {
    2.0
}
fn default_scale() -> f32 {
    1.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default = "default_count")]
    pub count: [u32; 3],
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub combine_meshes: bool,
    #[serde(default)]
    pub static_batching: bool,
    #[serde(default)]
    pub materials: Vec<MaterialPreset>,
    #[serde(default)]
    pub custom_meshes: Vec<CustomMeshDef>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            spacing: default_spacing(),
            scale: default_scale(),
            combine_meshes: false,
            static_batching: false,
            materials: vec![
                MaterialPreset {
                    name: "Default".into(),
                    base_color: default_color(),
                    metallic: 0.0,
                    perceptual_roughness: default_roughness(),
                    unlit: false,
                },
                MaterialPreset {
                    name: "Unlit".into(),
                    base_color: [0.4, 0.7, 1.0, 1.0],
                    metallic: 0.0,
                    perceptual_roughness: 1.0,
                    unlit: true,
                },
            ],
            custom_meshes: Vec::new(),
        }
    }
}

impl BenchConfig {
    pub fn from_ron(text: &str) -> Result<Self, BenchConfigError> {
        ron::de::from_str(text).map_err(|e| BenchConfigError::Ron(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Load from `path`, falling back to defaults (with a warning) on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(cfg) => {
                info!("Bench: loaded config from '{}'", path.display());
                cfg
            }
            Err(e) => {
                warn!("Bench: using default config ({}): {e}", path.display());
                Self::default()
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BenchConfigError {
    #[error("I/O while reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
}

// ---------- Live settings ----------

/// Where the config lives; insert before `BenchPlugin` to override.
#[derive(Resource, Clone)]
pub struct BenchSettings {
    pub config_path: String,
}
impl Default for BenchSettings {
    fn default() -> Self {
        Self { config_path: DEFAULT_CONFIG_PATH.to_string() }
    }
}

/// Geometry parameters the panel edits; read when a generate request arrives.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GeometrySettings {
    pub count: UVec3,
    pub spacing: f32,
    pub scale: f32,
    pub combine_meshes: bool,
    pub static_batching: bool,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self::from_config(&BenchConfig::default())
    }
}

impl GeometrySettings {
    pub const SPACING_RANGE: (f32, f32) = (1.0, 10.0);

    pub fn from_config(cfg: &BenchConfig) -> Self {
        Self {
            count: UVec3::from_array(cfg.count),
            spacing: cfg.spacing,
            scale: cfg.scale,
            combine_meshes: cfg.combine_meshes,
            static_batching: cfg.static_batching,
        }
    }

    /// Apply `GRIDBENCH_COUNT` ("x,y,z"), `GRIDBENCH_SPACING`, `GRIDBENCH_SCALE` when set.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("GRIDBENCH_COUNT") {
            self.count = parse_count3(&v);
        }
        if let Some(v) = lookup("GRIDBENCH_SPACING") {
            self.spacing = parse_float_or_one(&v);
        }
        if let Some(v) = lookup("GRIDBENCH_SCALE") {
            self.scale = parse_float_or_one(&v);
        }
    }

    /// Set one count axis (0 = x, 1 = y, 2 = z); other axes are ignored.
    pub fn set_count(&mut self, axis: usize, value: u32) {
        if axis <= 2 {
            self.count[axis] = value;
        }
    }

    /// Slider semantics: clamped to [`Self::SPACING_RANGE`].
    pub fn set_spacing(&mut self, value: f32) {
        let (min, max) = Self::SPACING_RANGE;
        self.spacing = value.clamp(min, max);
    }
}

// ---------- Text input ----------

/// Integer text field semantics: anything unparsable becomes 1.
pub fn parse_count_or_one(text: &str) -> u32 {
    text.trim().parse().unwrap_or(1)
}

/// Float text field semantics: anything unparsable (or non-finite) becomes 1.
pub fn parse_float_or_one(text: &str) -> f32 {
    match text.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => 1.0,
    }
}

/// "x,y,z" with per-component fallback to 1; missing components are 1 too.
pub fn parse_count3(text: &str) -> UVec3 {
    let mut parts = text.split(',');
    let mut next = || parts.next().map(parse_count_or_one).unwrap_or(1);
    let x = next();
    let y = next();
    let z = next();
    UVec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_numbers_fall_back_to_one() {
        assert_eq!(parse_count_or_one("12"), 12);
        assert_eq!(parse_count_or_one(" 7 "), 7);
        assert_eq!(parse_count_or_one("abc"), 1);
        assert_eq!(parse_count_or_one("-3"), 1);
        assert_eq!(parse_float_or_one("2.5"), 2.5);
        assert_eq!(parse_float_or_one("nope"), 1.0);
        assert_eq!(parse_float_or_one("inf"), 1.0);
    }

    #[test]
    fn count3_parses_per_component() {
        assert_eq!(parse_count3("4,2,8"), UVec3::new(4, 2, 8));
        assert_eq!(parse_count3("4,x,8"), UVec3::new(4, 1, 8));
        assert_eq!(parse_count3("5"), UVec3::new(5, 1, 1));
    }

    #[test]
    fn overrides_replace_only_present_keys() {
        let mut g = GeometrySettings::default();
        g.apply_overrides(|k| match k {
            "GRIDBENCH_COUNT" => Some("3,3,3".into()),
            "GRIDBENCH_SCALE" => Some("bad".into()),
            _ => None,
        });
        assert_eq!(g.count, UVec3::splat(3));
        assert_eq!(g.scale, 1.0);
        assert_eq!(g.spacing, 2.0);
    }

    #[test]
    fn set_count_touches_one_axis() {
        let mut g = GeometrySettings::default();
        g.count = UVec3::new(1, 1, 1);
        g.set_count(1, 500);
        assert_eq!(g.count, UVec3::new(1, 500, 1));
        g.set_count(9, 5);
        assert_eq!(g.count, UVec3::new(1, 500, 1));
    }

    #[test]
    fn spacing_is_clamped_to_slider_range() {
        let mut g = GeometrySettings::default();
        g.set_spacing(100.0);
        assert_eq!(g.spacing, 10.0);
        g.set_spacing(-100.0);
        assert_eq!(g.spacing, 1.0);
        g.set_spacing(4.5);
        assert_eq!(g.spacing, 4.5);
    }

    #[test]
    fn ron_config_parses_with_defaults() {
        let cfg = BenchConfig::from_ron(
            r#"(
                count: (4, 2, 4),
                combine_meshes: true,
                materials: [(name: "Red", base_color: (1.0, 0.0, 0.0, 1.0))],
                custom_meshes: [(name: "Rock", path: "models/rock.glb#Mesh0/Primitive0")],
            )"#,
        )
        .unwrap();
        assert_eq!(cfg.count, [4, 2, 4]);
        assert!(cfg.combine_meshes);
        assert_eq!(cfg.spacing, 2.0);
        assert_eq!(cfg.materials.len(), 1);
        assert_eq!(cfg.materials[0].perceptual_roughness, 0.5);
        assert_eq!(cfg.custom_meshes[0].name, "Rock");
    }

    #[test]
    fn bad_ron_is_reported() {
        assert!(matches!(BenchConfig::from_ron("(count: oops)"), Err(BenchConfigError::Ron(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            BenchConfig::load("does/not/exist.ron"),
            Err(BenchConfigError::Io(_))
        ));
    }
}

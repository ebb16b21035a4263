// src/bench/material.rs
//! Live-editable numeric material parameters, discovered through reflection.

use bevy::prelude::*;
use bevy::reflect::Struct;

/// Fields with a meaningful closed range; every other `f32` field is unbounded.
const BOUNDED_FIELDS: &[(&str, f32, f32)] = &[
    ("perceptual_roughness", 0.0, 1.0),
    ("metallic", 0.0, 1.0),
    ("reflectance", 0.0, 1.0),
    ("specular_transmission", 0.0, 1.0),
    ("diffuse_transmission", 0.0, 1.0),
    ("clearcoat", 0.0, 1.0),
    ("clearcoat_perceptual_roughness", 0.0, 1.0),
    ("anisotropy_strength", 0.0, 1.0),
    ("anisotropy_rotation", 0.0, std::f32::consts::TAU),
];

/// One editable parameter bound to a reflected field by name.
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterControl {
    BoundedFloat { name: String, value: f32, min: f32, max: f32 },
    Float { name: String, value: f32 },
}

impl ParameterControl {
    pub fn name(&self) -> &str {
        match self {
            Self::BoundedFloat { name, .. } | Self::Float { name, .. } => name,
        }
    }

    /// Cached value (as of the last read or write).
    pub fn value(&self) -> f32 {
        match self {
            Self::BoundedFloat { value, .. } | Self::Float { value, .. } => *value,
        }
    }

    pub fn range(&self) -> Option<(f32, f32)> {
        match self {
            Self::BoundedFloat { min, max, .. } => Some((*min, *max)),
            Self::Float { .. } => None,
        }
    }

    /// Re-read the field from `material`. Returns the fresh value.
    pub fn read<M: Struct>(&mut self, material: &M) -> Option<f32> {
        let v = read_f32(material, self.name())?;
        match self {
            Self::BoundedFloat { value, .. } | Self::Float { value, .. } => *value = v,
        }
        Some(v)
    }

    /// Push `input` into `material`. Bounded values are clamped, non-finite input is ignored.
    /// Returns the value actually written.
    pub fn write<M: Struct>(&mut self, material: &mut M, input: f32) -> Option<f32> {
        if !input.is_finite() {
            return None;
        }
        let v = match self.range() {
            Some((min, max)) => input.clamp(min, max),
            None => input,
        };
        let slot = material.field_mut(self.name())?.try_downcast_mut::<f32>()?;
        *slot = v;
        match self {
            Self::BoundedFloat { value, .. } | Self::Float { value, .. } => *value = v,
        }
        Some(v)
    }
}

fn read_f32<M: Struct>(material: &M, field: &str) -> Option<f32> {
    material.field(field)?.try_downcast_ref::<f32>().copied()
}

/// One control per finite `f32` field of `material`, in declaration order.
/// Fields holding infinity or NaN (e.g. an unset attenuation distance) cannot be edited and are skipped.
pub fn reflect_parameters<M: Struct>(material: &M) -> Vec<ParameterControl> {
    let mut out = Vec::new();
    for i in 0..material.field_len() {
        let (Some(name), Some(field)) = (material.name_at(i), material.field_at(i)) else { continue };
        let Some(&value) = field.try_downcast_ref::<f32>() else { continue };
        if !value.is_finite() {
            continue;
        }

        let control = match BOUNDED_FIELDS.iter().find(|(n, ..)| *n == name) {
            Some(&(_, min, max)) => ParameterControl::BoundedFloat { name: name.to_string(), value, min, max },
            None => ParameterControl::Float { name: name.to_string(), value },
        };
        out.push(control);
    }
    out
}

/// A selectable material plus the controls for its parameters.
#[derive(Clone, Debug)]
pub struct MaterialPanel {
    pub name: String,
    pub handle: Handle<StandardMaterial>,
    pub controls: Vec<ParameterControl>,
}

impl MaterialPanel {
    pub fn new(name: impl Into<String>, handle: Handle<StandardMaterial>, material: &StandardMaterial) -> Self {
        Self { name: name.into(), handle, controls: reflect_parameters(material) }
    }

    /// Pull every cached value from the material (e.g. after an external edit).
    pub fn refresh(&mut self, material: &StandardMaterial) {
        for c in &mut self.controls {
            c.read(material);
        }
    }

    /// Write `value` through control `index`; returns what actually landed in the material.
    pub fn set(&mut self, index: usize, value: f32, material: &mut StandardMaterial) -> Option<f32> {
        self.controls.get_mut(index)?.write(material, value)
    }
}

//! The sun and the bodies orbiting it.

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::error::SceneError;
use crate::model::OrbitModifiers;
use crate::params::OrbitParameters;

/// Unvalidated description of an orbiting body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDefinition {
    pub name: String,
    /// Texture identifier; empty means untextured.
    pub texture: String,
    pub semi_major_axis: f32,
    pub semi_minor_axis: f32,
    pub scale: f32,
    pub mass: f32,
}

/// Unvalidated description of the sun.
#[derive(Debug, Clone, PartialEq)]
pub struct SunDefinition {
    pub name: String,
    pub texture: String,
    pub mass: f32,
    pub scale: f32,
    pub position: Vec3,
}

fn check_positive(name: &str, mass: f32, scale: f32) -> Result<(), SceneError> {
    if !(mass.is_finite() && mass > 0.0) {
        return Err(SceneError::NonPositiveMass {
            name: name.to_string(),
            mass,
        });
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(SceneError::NonPositiveScale {
            name: name.to_string(),
            scale,
        });
    }
    Ok(())
}

/// A body on an elliptical orbit.
///
/// Keeps the world position it was last placed at; the scene reads it back
/// on the following frame to rebuild the barycenter.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    name: String,
    texture: String,
    orbit: OrbitParameters,
    scale: f32,
    mass: f32,
    position: Vec3,
}

impl CelestialBody {
    /// Build around an already validated orbit.
    pub fn new(
        name: String,
        texture: String,
        orbit: OrbitParameters,
        scale: f32,
        mass: f32,
    ) -> Result<Self, SceneError> {
        check_positive(&name, mass, scale)?;
        Ok(Self {
            name,
            texture,
            orbit,
            scale,
            mass,
            position: Vec3::ZERO,
        })
    }

    /// Build from a definition, drawing the orbit's phase and speed from `rng`.
    pub fn from_definition<R: Rng + ?Sized>(
        definition: BodyDefinition,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let BodyDefinition {
            name,
            texture,
            semi_major_axis,
            semi_minor_axis,
            scale,
            mass,
        } = definition;
        let orbit = OrbitParameters::random(semi_major_axis, semi_minor_axis, rng).map_err(
            |source| SceneError::InvalidOrbit {
                name: name.clone(),
                source,
            },
        )?;
        Self::new(name, texture, orbit, scale, mass)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn has_texture(&self) -> bool {
        !self.texture.is_empty()
    }

    pub fn orbit(&self) -> &OrbitParameters {
        &self.orbit
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// World position from the most recent placement.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World transform at time `t` against `barycenter`.
    pub fn transform_at(&self, t: f64, barycenter: Vec3, modifiers: &OrbitModifiers) -> Mat4 {
        let translation = self.orbit.local_position(t, modifiers)
            + barycenter
            + self.orbit.focus_translation(modifiers);
        Mat4::from_rotation_translation(self.orbit.spin(t), translation)
    }

    /// Compute the transform for this frame and cache its translation.
    ///
    /// A non-finite translation is returned but never cached, so the next
    /// barycenter is still built from the last good position.
    pub(crate) fn place(&mut self, t: f64, barycenter: Vec3, modifiers: &OrbitModifiers) -> Mat4 {
        let model = self.transform_at(t, barycenter, modifiers);
        let position = model.w_axis.truncate();
        if position.is_finite() {
            self.position = position;
        }
        model
    }
}

/// The central body. It has a fixed position and is never orbit-evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    name: String,
    texture: String,
    mass: f32,
    scale: f32,
    position: Vec3,
}

impl Sun {
    pub fn new(definition: SunDefinition) -> Result<Self, SceneError> {
        let SunDefinition {
            name,
            texture,
            mass,
            scale,
            position,
        } = definition;
        check_positive(&name, mass, scale)?;
        if !position.is_finite() {
            return Err(SceneError::NonFiniteSunPosition);
        }
        Ok(Self {
            name,
            texture,
            mass,
            scale,
            position,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn has_texture(&self) -> bool {
        !self.texture.is_empty()
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World transform at time `t`: fixed translation, slow spin.
    pub fn transform_at(&self, t: f64) -> Mat4 {
        Mat4::from_rotation_translation(crate::model::spin_rotation(t, 0.0), self.position)
    }
}

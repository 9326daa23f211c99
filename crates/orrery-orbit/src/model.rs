//! Position on the ellipse and self-rotation as functions of time.

use std::f64::consts::TAU;

use glam::{Quat, Vec3};

use crate::params::OrbitParameters;

/// Self-rotation of every body, in radians per second.
pub const SPIN_RATE: f32 = 0.572_957_8;

/// Amplitude of the fixed per-body rotation derived from the start phase:
/// six, taken as degrees and applied as radians.
const PHASE_AMPLITUDE: f32 = 343.774_68;

/// Global multipliers applied on top of every orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitModifiers {
    /// Scales both axes and the focus offset.
    pub orbit_scale: f32,
    /// Scales every body's angular speed.
    pub speed_multiplier: f32,
}

impl OrbitModifiers {
    pub fn is_finite(&self) -> bool {
        self.orbit_scale.is_finite() && self.speed_multiplier.is_finite()
    }
}

impl Default for OrbitModifiers {
    fn default() -> Self {
        Self {
            orbit_scale: 1.0,
            speed_multiplier: 1.0,
        }
    }
}

/// Distance from the centre of an ellipse with semi-axes `a` (X) and `b` (Z)
/// to its boundary at polar angle `theta`.
pub fn orbit_radius(a: f32, b: f32, theta: f32) -> f32 {
    let (sin, cos) = theta.sin_cos();
    1.0 / ((cos / a).powi(2) + (sin / b).powi(2)).sqrt()
}

/// Rotation about +Y by `SPIN_RATE * t + phase`.
pub fn spin_rotation(t: f64, phase: f32) -> Quat {
    let angle = (f64::from(SPIN_RATE) * t + f64::from(phase)).rem_euclid(TAU);
    Quat::from_rotation_y(angle as f32)
}

impl OrbitParameters {
    /// Polar angle at time `t`, wrapped to `[0, 2pi)`.
    ///
    /// Evaluated in `f64` since the start phase alone reaches 10^4 radians.
    pub fn angle_at(&self, t: f64, speed_multiplier: f32) -> f32 {
        let speed = f64::from(self.speed()) * f64::from(speed_multiplier);
        (speed * t + f64::from(self.start_theta())).rem_euclid(TAU) as f32
    }

    /// Position relative to the ellipse centre, in the XZ plane.
    pub fn local_position(&self, t: f64, modifiers: &OrbitModifiers) -> Vec3 {
        let theta = self.angle_at(t, modifiers.speed_multiplier);
        let r = orbit_radius(
            self.semi_major_axis() * modifiers.orbit_scale,
            self.semi_minor_axis() * modifiers.orbit_scale,
            theta,
        );
        let (sin, cos) = theta.sin_cos();
        Vec3::new(r * cos, 0.0, r * sin)
    }

    /// Translation that puts the ellipse's focus on the barycenter.
    pub fn focus_translation(&self, modifiers: &OrbitModifiers) -> Vec3 {
        Vec3::new(self.focus_offset() * modifiers.orbit_scale, 0.0, 0.0)
    }

    /// The body's own orientation at time `t`.
    pub fn spin(&self, t: f64) -> Quat {
        spin_rotation(t, PHASE_AMPLITUDE * self.start_theta().sin())
    }
}

//! Orbit parameters and the seeded jitter source.

use std::ops::{Range, RangeInclusive};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::OrbitError;

/// Shape and timing of one elliptical orbit.
///
/// Immutable once built; every constructor validates, so derived values such
/// as [`eccentricity`](Self::eccentricity) are always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParameters {
    semi_major_axis: f32,
    semi_minor_axis: f32,
    eccentricity: f32,
    start_theta: f32,
    speed: f32,
}

impl OrbitParameters {
    /// Range the random start phase is drawn from, in radians.
    pub const START_THETA_RANGE: Range<f32> = 0.0..10_000.0;
    /// Range the random angular speed is drawn from, in radians per second.
    pub const SPEED_RANGE: RangeInclusive<f32> = 0.5..=1.0;

    pub fn new(a: f32, b: f32, start_theta: f32, speed: f32) -> Result<Self, OrbitError> {
        if !(a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0) {
            return Err(OrbitError::NonPositiveAxis { a, b });
        }
        if b > a {
            return Err(OrbitError::MinorExceedsMajor { a, b });
        }
        if !start_theta.is_finite() {
            return Err(OrbitError::NonFiniteStartTheta(start_theta));
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(OrbitError::InvalidSpeed(speed));
        }

        Ok(Self {
            semi_major_axis: a,
            semi_minor_axis: b,
            eccentricity: (a * a - b * b).sqrt() / a,
            start_theta,
            speed,
        })
    }

    /// Orbit with a random start phase and speed drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(a: f32, b: f32, rng: &mut R) -> Result<Self, OrbitError> {
        let start_theta = rng.random_range(Self::START_THETA_RANGE);
        let speed = rng.random_range(Self::SPEED_RANGE);
        Self::new(a, b, start_theta, speed)
    }

    pub fn semi_major_axis(&self) -> f32 {
        self.semi_major_axis
    }

    pub fn semi_minor_axis(&self) -> f32 {
        self.semi_minor_axis
    }

    /// `sqrt(a^2 - b^2) / a`, in `[0, 1)`.
    pub fn eccentricity(&self) -> f32 {
        self.eccentricity
    }

    /// Distance from the ellipse centre to its focus along X.
    pub fn focus_offset(&self) -> f32 {
        self.eccentricity * self.semi_major_axis
    }

    pub fn start_theta(&self) -> f32 {
        self.start_theta
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

/// Jitter source for orbit construction.
///
/// Uses `seed` when given, otherwise draws one from the thread RNG and logs it
/// so the run can be reproduced. Returns the RNG and the seed actually used.
pub fn orbit_rng(seed: Option<u64>) -> (ChaCha8Rng, u64) {
    let seed = seed.unwrap_or_else(|| {
        let seed = rand::random();
        tracing::info!(seed, "No orbit seed configured, picked a random one");
        seed
    });
    (ChaCha8Rng::seed_from_u64(seed), seed)
}

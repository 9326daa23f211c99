/// Invalid orbit parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrbitError {
    #[error("orbit axes must be positive and finite (a = {a}, b = {b})")]
    NonPositiveAxis { a: f32, b: f32 },

    #[error("semi-minor axis {b} exceeds semi-major axis {a}")]
    MinorExceedsMajor { a: f32, b: f32 },

    #[error("start phase must be finite (got {0})")]
    NonFiniteStartTheta(f32),

    #[error("angular speed must be positive and finite (got {0})")]
    InvalidSpeed(f32),
}

/// Invalid scene layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("body {name:?}: {source}")]
    InvalidOrbit {
        name: String,
        #[source]
        source: OrbitError,
    },

    #[error("body {name:?}: mass must be positive and finite (got {mass})")]
    NonPositiveMass { name: String, mass: f32 },

    #[error("body {name:?}: scale must be positive and finite (got {scale})")]
    NonPositiveScale { name: String, scale: f32 },

    #[error("sun position must be finite")]
    NonFiniteSunPosition,

    /// The barycenter feeds back into every body's placement; a gain of one or
    /// more makes it grow without bound.
    #[error("barycenter feedback gain {gain} must be below 1; lower body masses or normalize")]
    DivergentBarycenter { gain: f32 },
}

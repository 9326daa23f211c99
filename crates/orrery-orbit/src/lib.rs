//! Orbital kinematics for the orrery.
//!
//! Bodies follow centre-parameterized ellipses whose focus is pinned to the
//! system barycenter. Each frame runs in two phases: the barycenter is rebuilt
//! from the positions cached on the previous frame, then every body is placed
//! against it and handed to a [`DrawSink`].

pub mod body;
pub mod error;
pub mod kinematics;
pub mod model;
pub mod params;
pub mod scene;

pub use body::{BodyDefinition, CelestialBody, Sun, SunDefinition};
pub use error::{OrbitError, SceneError};
pub use kinematics::{BarycenterMode, barycenter, feedback_gain};
pub use model::{OrbitModifiers, SPIN_RATE, orbit_radius, spin_rotation};
pub use params::{OrbitParameters, orbit_rng};
pub use scene::{DrawCommand, DrawSink, DrawTarget, SceneModifiers, SceneState};

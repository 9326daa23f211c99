//! Per-frame scene update.

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::body::{BodyDefinition, CelestialBody, Sun, SunDefinition};
use crate::error::SceneError;
use crate::kinematics::{BarycenterMode, barycenter, feedback_gain};
use crate::model::OrbitModifiers;

/// Frames between periodic position reports.
const REPORT_INTERVAL: u64 = 300;

/// What a [`DrawCommand`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    Sun,
    /// Index into [`SceneState::bodies`].
    Body(usize),
}

/// One draw call for the shared body sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub target: DrawTarget,
    pub model: Mat4,
    /// Uniform scale applied to the sphere before `model`.
    pub scale: f32,
    pub has_texture: bool,
    /// Shade without lighting (the sun).
    pub emissive: bool,
}

/// Receives the draw calls produced by [`SceneState::step`].
pub trait DrawSink {
    fn draw(&mut self, command: &DrawCommand);
}

impl DrawSink for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(*command);
    }
}

/// Runtime knobs, adjustable from the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneModifiers {
    pub orbit: OrbitModifiers,
    /// Added to the sun's scale only.
    pub sun_scale_modifier: f32,
}

impl SceneModifiers {
    pub fn is_finite(&self) -> bool {
        self.orbit.is_finite() && self.sun_scale_modifier.is_finite()
    }
}

impl Default for SceneModifiers {
    fn default() -> Self {
        Self {
            orbit: OrbitModifiers::default(),
            sun_scale_modifier: 0.0,
        }
    }
}

/// The sun, the orbiting bodies and the barycenter placing them.
#[derive(Debug, Clone)]
pub struct SceneState {
    sun: Sun,
    bodies: Vec<CelestialBody>,
    mode: BarycenterMode,
    barycenter: Vec3,
    frame: u64,
}

impl SceneState {
    /// Build from definitions, drawing every orbit's phase and speed from `rng`.
    pub fn new<R: Rng + ?Sized>(
        sun: SunDefinition,
        bodies: Vec<BodyDefinition>,
        mode: BarycenterMode,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let sun = Sun::new(sun)?;
        let bodies = bodies
            .into_iter()
            .map(|definition| CelestialBody::from_definition(definition, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(sun, bodies, mode)
    }

    /// Assemble from validated parts, rejecting mass layouts whose barycenter diverges.
    pub fn from_parts(
        sun: Sun,
        bodies: Vec<CelestialBody>,
        mode: BarycenterMode,
    ) -> Result<Self, SceneError> {
        let gain = feedback_gain(mode, sun.mass(), bodies.iter().map(CelestialBody::mass));
        if gain >= 1.0 {
            return Err(SceneError::DivergentBarycenter { gain });
        }

        tracing::info!(
            bodies = bodies.len(),
            ?mode,
            gain,
            "Scene assembled around {}",
            sun.name()
        );
        for body in &bodies {
            let orbit = body.orbit();
            tracing::debug!(
                body = body.name(),
                a = orbit.semi_major_axis(),
                b = orbit.semi_minor_axis(),
                e = orbit.eccentricity(),
                start_theta = orbit.start_theta(),
                speed = orbit.speed(),
                "Orbit"
            );
        }

        Ok(Self {
            sun,
            bodies,
            mode,
            barycenter: Vec3::ZERO,
            frame: 0,
        })
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn mode(&self) -> BarycenterMode {
        self.mode
    }

    /// Barycenter used for the most recent placement.
    pub fn barycenter(&self) -> Vec3 {
        self.barycenter
    }

    /// Frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Rebuild the barycenter from the positions cached on the previous frame.
    ///
    /// A non-finite result is logged and dropped; the previous barycenter stays.
    pub fn update_barycenter(&mut self) -> Vec3 {
        let next = barycenter(
            self.mode,
            self.sun.position(),
            self.sun.mass(),
            self.bodies.iter().map(|b| (b.position(), b.mass())),
        );
        if next.is_finite() {
            self.barycenter = next;
        } else {
            tracing::error!(
                frame = self.frame,
                ?next,
                kept = ?self.barycenter,
                "Non-finite barycenter, keeping previous"
            );
        }
        self.barycenter
    }

    /// Place the sun and every body at time `t`, emitting one draw each.
    pub fn place_bodies(&mut self, t: f64, modifiers: &SceneModifiers, sink: &mut impl DrawSink) {
        sink.draw(&DrawCommand {
            target: DrawTarget::Sun,
            model: self.sun.transform_at(t),
            scale: self.sun.scale() + modifiers.sun_scale_modifier,
            has_texture: self.sun.has_texture(),
            emissive: true,
        });

        for (index, body) in self.bodies.iter_mut().enumerate() {
            let model = body.place(t, self.barycenter, &modifiers.orbit);
            let position = model.w_axis.truncate();
            if !position.is_finite() {
                tracing::error!(
                    body = body.name(),
                    t,
                    ?position,
                    barycenter = ?self.barycenter,
                    "Non-finite body position"
                );
            }
            debug_assert!(
                position.is_finite(),
                "non-finite position for {}",
                body.name()
            );

            sink.draw(&DrawCommand {
                target: DrawTarget::Body(index),
                model,
                scale: body.scale(),
                has_texture: body.has_texture(),
                emissive: false,
            });
        }
    }

    /// Advance one frame: barycenter first, then every body against it.
    ///
    /// Non-finite modifiers are logged and replaced by the defaults for this frame.
    pub fn step(&mut self, t: f64, modifiers: &SceneModifiers, sink: &mut impl DrawSink) -> Vec3 {
        let modifiers = if modifiers.is_finite() {
            *modifiers
        } else {
            tracing::error!(?modifiers, "Non-finite scene modifiers, using defaults");
            SceneModifiers::default()
        };
        self.update_barycenter();
        self.place_bodies(t, &modifiers, sink);

        if self.frame % REPORT_INTERVAL == 0 {
            tracing::debug!(
                frame = self.frame,
                t,
                barycenter = ?self.barycenter,
                "Scene positions"
            );
            for body in &self.bodies {
                tracing::debug!(body = body.name(), position = ?body.position());
            }
        }
        self.frame += 1;
        self.barycenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{OrbitParameters, orbit_rng};

    const EPS: f32 = 1e-4;

    fn sun_at(position: Vec3, mass: f32) -> Sun {
        Sun::new(SunDefinition {
            name: "sun".into(),
            texture: "sun.jpg".into(),
            mass,
            scale: 0.3,
            position,
        })
        .unwrap()
    }

    fn circle(name: &str, radius: f32, start_theta: f32, mass: f32) -> CelestialBody {
        let orbit = OrbitParameters::new(radius, radius, start_theta, 1.0).unwrap();
        CelestialBody::new(name.into(), String::new(), orbit, 0.1, mass).unwrap()
    }

    fn default_definitions() -> (SunDefinition, Vec<BodyDefinition>) {
        let body = |name: &str, a: f32, b: f32, scale: f32, mass: f32| BodyDefinition {
            name: name.into(),
            texture: format!("{name}.jpg"),
            semi_major_axis: a,
            semi_minor_axis: b,
            scale,
            mass,
        };
        (
            SunDefinition {
                name: "sun".into(),
                texture: "sun.jpg".into(),
                mass: 1.0,
                scale: 0.3,
                position: Vec3::ZERO,
            },
            vec![
                body("earth", 52.0, 50.0, 0.1, 0.01),
                body("mars", 57.0, 55.0, 0.2, 0.5),
                body("venus", 62.0, 60.0, 0.1, 0.01),
                body("jupiter", 72.0, 70.0, 0.15, 0.01),
            ],
        )
    }

    #[test]
    fn test_first_frame_uses_zero_cached_positions() {
        let sun = sun_at(Vec3::new(1.0, 0.0, 0.0), 2.0);
        let mut scene = SceneState::from_parts(
            sun,
            vec![circle("a", 10.0, 0.0, 0.1)],
            BarycenterMode::Unnormalized,
        )
        .unwrap();
        let mut draws = Vec::new();
        let barycenter = scene.step(0.0, &SceneModifiers::default(), &mut draws);
        assert!((barycenter - Vec3::new(2.0, 0.0, 0.0)).length() < EPS);
        assert!((scene.bodies()[0].position() - Vec3::new(12.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_barycenter_uses_previous_frame_positions() {
        let sun = Sun::new(SunDefinition {
            name: "sun".into(),
            texture: String::new(),
            mass: 1.5,
            scale: 0.3,
            position: Vec3::new(0.0, 0.0, 2.0),
        })
        .unwrap();
        let bodies = vec![circle("a", 10.0, 0.0, 0.2), circle("b", 20.0, 1.0, 0.3)];
        let mut scene =
            SceneState::from_parts(sun, bodies, BarycenterMode::Unnormalized).unwrap();
        let modifiers = SceneModifiers::default();

        scene.step(0.0, &modifiers, &mut Vec::new());
        let p1 = scene.bodies()[0].position();
        let p2 = scene.bodies()[1].position();

        let barycenter = scene.step(0.5, &modifiers, &mut Vec::new());
        let expected = Vec3::new(0.0, 0.0, 2.0) * 1.5 + p1 * 0.2 + p2 * 0.3;
        assert!((barycenter - expected).length() < EPS);
    }

    #[test]
    fn test_circle_scenario_at_origin() {
        // A vanishing mass keeps the barycenter pinned to the origin.
        let sun = sun_at(Vec3::ZERO, 1.0);
        let mut scene = SceneState::from_parts(
            sun,
            vec![circle("ring", 10.0, 0.0, 1e-9)],
            BarycenterMode::Unnormalized,
        )
        .unwrap();
        let modifiers = SceneModifiers::default();

        scene.step(0.0, &modifiers, &mut Vec::new());
        assert!((scene.bodies()[0].position() - Vec3::new(10.0, 0.0, 0.0)).length() < EPS);

        scene.step(std::f64::consts::PI, &modifiers, &mut Vec::new());
        assert!((scene.bodies()[0].position() - Vec3::new(-10.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_each_body_drawn_once_per_frame() {
        let (sun, bodies) = default_definitions();
        let (mut rng, _) = orbit_rng(Some(11));
        let mut scene =
            SceneState::new(sun, bodies, BarycenterMode::Unnormalized, &mut rng).unwrap();

        for frame in 0..5 {
            let mut draws = Vec::new();
            scene.step(frame as f64 / 60.0, &SceneModifiers::default(), &mut draws);
            assert_eq!(draws.len(), 5);
            assert_eq!(draws[0].target, DrawTarget::Sun);
            assert!(draws[0].emissive);
            for (i, draw) in draws[1..].iter().enumerate() {
                assert_eq!(draw.target, DrawTarget::Body(i));
                assert!(!draw.emissive);
                assert!(draw.has_texture);
                assert_eq!(draw.model.w_axis.truncate(), scene.bodies()[i].position());
            }
        }
        assert_eq!(scene.frame(), 5);
    }

    #[test]
    fn test_sun_scale_modifier_only_affects_sun() {
        let (sun, bodies) = default_definitions();
        let (mut rng, _) = orbit_rng(Some(5));
        let mut scene =
            SceneState::new(sun, bodies, BarycenterMode::Unnormalized, &mut rng).unwrap();
        let modifiers = SceneModifiers {
            sun_scale_modifier: 0.5,
            ..Default::default()
        };
        let mut draws = Vec::new();
        scene.step(1.0, &modifiers, &mut draws);
        assert!((draws[0].scale - 0.8).abs() < 1e-6);
        assert_eq!(draws[1].scale, 0.1);
        assert_eq!(draws[2].scale, 0.2);
    }

    #[test]
    fn test_body_focus_offset_applied() {
        let sun = sun_at(Vec3::ZERO, 1.0);
        let orbit = OrbitParameters::new(5.0, 4.0, 0.0, 1.0).unwrap();
        let body = CelestialBody::new("e".into(), String::new(), orbit, 0.1, 1e-9).unwrap();
        let mut scene =
            SceneState::from_parts(sun, vec![body], BarycenterMode::Unnormalized).unwrap();
        scene.step(0.0, &SceneModifiers::default(), &mut Vec::new());
        // local (5, 0, 0) plus focus offset e*a = 3
        assert!((scene.bodies()[0].position() - Vec3::new(8.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let run = |seed| {
            let (sun, bodies) = default_definitions();
            let (mut rng, _) = orbit_rng(Some(seed));
            let mut scene =
                SceneState::new(sun, bodies, BarycenterMode::Unnormalized, &mut rng).unwrap();
            for frame in 0..30 {
                scene.step(frame as f64 * 0.1, &SceneModifiers::default(), &mut Vec::new());
            }
            scene
                .bodies()
                .iter()
                .map(CelestialBody::position)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn test_default_layout_stays_bounded() {
        let (sun, bodies) = default_definitions();
        let (mut rng, _) = orbit_rng(Some(8));
        let mut scene =
            SceneState::new(sun, bodies, BarycenterMode::Unnormalized, &mut rng).unwrap();
        let modifiers = SceneModifiers {
            orbit: OrbitModifiers {
                orbit_scale: 3.0,
                speed_multiplier: 1.0,
            },
            sun_scale_modifier: 1.0,
        };
        for frame in 0..2_000 {
            let barycenter = scene.step(frame as f64 / 60.0, &modifiers, &mut Vec::new());
            assert!(barycenter.is_finite());
            // Bounded by the fixed point of a gain-0.53 feedback on ~3x72 orbits.
            assert!(barycenter.length() < 1_000.0, "frame {frame}: {barycenter}");
        }
    }

    #[test]
    fn test_normalized_mode_is_weighted_mean() {
        let sun = sun_at(Vec3::ZERO, 1.0);
        let mut scene = SceneState::from_parts(
            sun,
            vec![circle("a", 10.0, 0.0, 1.0)],
            BarycenterMode::Normalized,
        )
        .unwrap();
        scene.step(0.0, &SceneModifiers::default(), &mut Vec::new());
        let p = scene.bodies()[0].position();
        let barycenter = scene.update_barycenter();
        assert!((barycenter - p * 0.5).length() < EPS);
    }

    #[test]
    fn test_divergent_mass_layout_rejected() {
        let sun = sun_at(Vec3::ZERO, 1.0);
        let bodies = vec![circle("a", 10.0, 0.0, 0.6), circle("b", 20.0, 0.0, 0.6)];
        let result = SceneState::from_parts(sun.clone(), bodies.clone(), BarycenterMode::Unnormalized);
        assert!(matches!(result, Err(SceneError::DivergentBarycenter { .. })));

        assert!(SceneState::from_parts(sun, bodies, BarycenterMode::Normalized).is_ok());
    }

    #[test]
    fn test_invalid_definition_propagates() {
        let (sun, mut bodies) = default_definitions();
        bodies[2].semi_minor_axis = 100.0;
        let (mut rng, _) = orbit_rng(Some(1));
        let result = SceneState::new(sun, bodies, BarycenterMode::Unnormalized, &mut rng);
        assert!(matches!(
            result,
            Err(SceneError::InvalidOrbit { ref name, .. }) if name == "venus"
        ));
    }

    #[test]
    fn test_non_finite_speed_does_not_poison_scene() {
        let (sun, bodies) = default_definitions();
        let (mut rng, _) = orbit_rng(Some(9));
        let mut scene =
            SceneState::new(sun, bodies, BarycenterMode::Unnormalized, &mut rng).unwrap();
        let broken = SceneModifiers {
            orbit: OrbitModifiers {
                orbit_scale: 1.0,
                speed_multiplier: f32::INFINITY,
            },
            sun_scale_modifier: 0.0,
        };
        let mut draws = Vec::new();
        scene.step(1.0, &broken, &mut draws);
        assert!(draws.iter().all(|draw| draw.model.is_finite()));

        for frame in 2..10 {
            let mut draws = Vec::new();
            let barycenter = scene.step(frame as f64, &SceneModifiers::default(), &mut draws);
            assert!(barycenter.is_finite());
            assert!(draws.iter().all(|draw| draw.model.is_finite()));
        }
        assert!(scene.bodies().iter().all(|b| b.position().is_finite()));
    }

    #[test]
    fn test_overflowing_barycenter_keeps_previous() {
        let sun = sun_at(Vec3::new(3.0e38, 0.0, 0.0), 10.0);
        let mut scene = SceneState::from_parts(
            sun,
            vec![circle("a", 10.0, 0.0, 0.1)],
            BarycenterMode::Unnormalized,
        )
        .unwrap();
        assert_eq!(scene.update_barycenter(), Vec3::ZERO);
        assert_eq!(scene.barycenter(), Vec3::ZERO);
    }
}

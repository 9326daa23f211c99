//! Glue between the configuration, the orbit model, and the frame loop.

use std::path::{Path, PathBuf};

use glam::Vec3;
use orrery_config::{BodyConfig, Config, ProgramSettings, SceneConfig, SunConfig};
use orrery_debug::{
    CLEAR_COLOR_STEP, ORBIT_SCALE_STEP, OverlayProperties, PropertyNudge, SUN_SCALE_MODIFIER_STEP,
};
use orrery_input::{ControlAction, MoveDirection};
use orrery_orbit::{
    BarycenterMode, BodyDefinition, OrbitModifiers, SceneError, SceneModifiers, SceneState,
    SunDefinition, orbit_rng,
};
use orrery_render::FlyCamera;

pub fn sun_definition(sun: &SunConfig) -> SunDefinition {
    SunDefinition {
        name: sun.name.clone(),
        texture: sun.texture.clone(),
        mass: sun.mass,
        scale: sun.scale,
        position: Vec3::from_array(sun.position),
    }
}

pub fn body_definitions(bodies: &[BodyConfig]) -> Vec<BodyDefinition> {
    bodies
        .iter()
        .map(|body| BodyDefinition {
            name: body.name.clone(),
            texture: body.texture.clone(),
            semi_major_axis: body.semi_major_axis,
            semi_minor_axis: body.semi_minor_axis,
            scale: body.scale,
            mass: body.mass,
        })
        .collect()
}

/// Build the scene, returning it with the seed actually used.
pub fn build_scene(scene: &SceneConfig) -> Result<(SceneState, u64), SceneError> {
    let (mut rng, seed) = orbit_rng(scene.seed);
    let state = SceneState::new(
        sun_definition(&scene.sun),
        body_definitions(&scene.bodies),
        BarycenterMode::from_normalize_flag(scene.normalize_barycenter),
        &mut rng,
    )?;
    tracing::info!(seed, "Orbit phases drawn");
    Ok((state, seed))
}

/// This frame's orbit and sun modifiers.
pub fn scene_modifiers(properties: &OverlayProperties, speed_multiplier: f32) -> SceneModifiers {
    SceneModifiers {
        orbit: OrbitModifiers {
            orbit_scale: properties.orbit_scale,
            speed_multiplier,
        },
        sun_scale_modifier: properties.sun_scale_modifier,
    }
}

/// Overlay values at startup: sliders from the config, clear colour from the
/// persisted settings when a settings file exists, else from the config.
pub fn initial_properties(config: &Config, persisted: Option<&ProgramSettings>) -> OverlayProperties {
    OverlayProperties {
        sun_scale_modifier: config.scene.sun_scale_modifier,
        orbit_scale: config.scene.orbit_scale,
        clear_color: persisted.map_or(config.render.clear_color, |s| s.clear_color),
    }
    .clamped()
}

/// Carry config edits into the live properties. Only fields whose config
/// value changed are taken, so keyboard and API adjustments survive
/// unrelated edits.
pub fn reloaded_properties(
    current: OverlayProperties,
    old: &Config,
    new: &Config,
) -> OverlayProperties {
    let mut next = current;
    if new.scene.orbit_scale != old.scene.orbit_scale {
        next.orbit_scale = new.scene.orbit_scale;
    }
    if new.scene.sun_scale_modifier != old.scene.sun_scale_modifier {
        next.sun_scale_modifier = new.scene.sun_scale_modifier;
    }
    if new.render.clear_color != old.render.clear_color {
        next.clear_color = new.render.clear_color;
    }
    next.clamped()
}

/// Config fields that differ between `old` and `new` but are only read at startup.
pub fn restart_required_changes(old: &Config, new: &Config) -> Vec<&'static str> {
    let checks = [
        ("scene.seed", old.scene.seed != new.scene.seed),
        (
            "scene.normalize_barycenter",
            old.scene.normalize_barycenter != new.scene.normalize_barycenter,
        ),
        ("scene.sun", old.scene.sun != new.scene.sun),
        ("scene.bodies", old.scene.bodies != new.scene.bodies),
        ("render.sphere_radius", old.render.sphere_radius != new.render.sphere_radius),
        (
            "render.latitude_segments",
            old.render.latitude_segments != new.render.latitude_segments,
        ),
        (
            "render.longitude_segments",
            old.render.longitude_segments != new.render.longitude_segments,
        ),
        ("window", old.window != new.window),
        ("assets", old.assets != new.assets),
    ];
    checks
        .into_iter()
        .filter_map(|(field, changed)| changed.then_some(field))
        .collect()
}

/// The property step bound to `action`, if any.
pub fn property_nudge(action: ControlAction) -> Option<PropertyNudge> {
    match action {
        ControlAction::OrbitScaleUp => Some(PropertyNudge::OrbitScale(ORBIT_SCALE_STEP)),
        ControlAction::OrbitScaleDown => Some(PropertyNudge::OrbitScale(-ORBIT_SCALE_STEP)),
        ControlAction::SunScaleUp => Some(PropertyNudge::SunScaleModifier(SUN_SCALE_MODIFIER_STEP)),
        ControlAction::SunScaleDown => {
            Some(PropertyNudge::SunScaleModifier(-SUN_SCALE_MODIFIER_STEP))
        }
        ControlAction::Brighten => Some(PropertyNudge::Brightness(CLEAR_COLOR_STEP)),
        ControlAction::Darken => Some(PropertyNudge::Brightness(-CLEAR_COLOR_STEP)),
        ControlAction::Quit | ControlAction::ToggleCapture | ControlAction::ToggleOverlay => None,
    }
}

/// Whether the overlay starts visible. A settings file that exists wins over
/// the config default.
pub fn initial_overlay_enabled(config: &Config, settings: Option<&ProgramSettings>) -> bool {
    settings.map_or(config.debug.overlay_enabled, |s| s.overlay_enabled)
}

/// Camera restored from the persisted pose with projection and motion from the config.
pub fn initial_camera(config: &Config, settings: &ProgramSettings) -> FlyCamera {
    let mut camera = FlyCamera::looking_along(
        Vec3::from_array(settings.camera_position),
        Vec3::from_array(settings.camera_front),
    );
    camera.zoom = config
        .render
        .fov_degrees
        .clamp(orrery_render::MIN_ZOOM, orrery_render::MAX_ZOOM);
    camera.near = config.render.near;
    camera.far = config.render.far;
    camera.speed = config.render.camera_speed;
    camera.sensitivity = config.render.mouse_sensitivity;
    camera.set_aspect_ratio(config.window.width as f32, config.window.height as f32);
    camera
}

/// Persisted state captured at shutdown.
pub fn settings_snapshot(
    camera: &FlyCamera,
    properties: &OverlayProperties,
    overlay_enabled: bool,
) -> ProgramSettings {
    ProgramSettings {
        clear_color: properties.clear_color,
        overlay_enabled,
        camera_position: camera.position.to_array(),
        camera_front: camera.front().to_array(),
    }
}

/// Combine held directions into a camera-local `(right, up, forward)` vector.
/// Opposing keys cancel.
pub fn movement_vector(movement: &[MoveDirection]) -> Vec3 {
    movement.iter().fold(Vec3::ZERO, |acc, direction| {
        acc + match direction {
            MoveDirection::Forward => Vec3::Z,
            MoveDirection::Backward => Vec3::NEG_Z,
            MoveDirection::Right => Vec3::X,
            MoveDirection::Left => Vec3::NEG_X,
            MoveDirection::Up => Vec3::Y,
            MoveDirection::Down => Vec3::NEG_Y,
        }
    })
}

/// An empty texture field means untextured.
pub fn texture_path(texture: &str) -> Option<&Path> {
    (!texture.is_empty()).then(|| Path::new(texture))
}

/// The six cubemap face paths, or `None` if the list is not exactly six long.
pub fn skybox_paths(faces: &[String]) -> Option<[PathBuf; 6]> {
    match <&[String; 6]>::try_from(faces) {
        Ok(faces) => Some(faces.each_ref().map(PathBuf::from)),
        Err(_) => {
            tracing::warn!(
                "Skybox needs exactly 6 faces, config lists {}; skybox disabled",
                faces.len()
            );
            None
        }
    }
}

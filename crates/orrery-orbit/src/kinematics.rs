//! Barycenter of the sun and the orbiting bodies.

use glam::Vec3;

/// How the mass-weighted position sum is turned into a barycenter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BarycenterMode {
    /// `Ms*S + sum(m_i * P_i)`, not divided by total mass. Its magnitude grows
    /// with total mass, which is what the classic scene is tuned for.
    #[default]
    Unnormalized,
    /// The physical centre of mass: the weighted sum divided by total mass.
    Normalized,
}

impl BarycenterMode {
    pub fn from_normalize_flag(normalize: bool) -> Self {
        if normalize {
            Self::Normalized
        } else {
            Self::Unnormalized
        }
    }
}

/// Barycenter of a fixed sun plus `bodies` given as `(position, mass)`.
pub fn barycenter<I>(mode: BarycenterMode, sun_position: Vec3, sun_mass: f32, bodies: I) -> Vec3
where
    I: IntoIterator<Item = (Vec3, f32)>,
{
    let (weighted, total_mass) = bodies.into_iter().fold(
        (sun_position * sun_mass, sun_mass),
        |(sum, total), (position, mass)| (sum + position * mass, total + mass),
    );

    match mode {
        BarycenterMode::Unnormalized => weighted,
        BarycenterMode::Normalized if total_mass > 0.0 => weighted / total_mass,
        BarycenterMode::Normalized => weighted,
    }
}

/// How strongly a shift of the barycenter feeds into the next one.
///
/// Every body is placed relative to the barycenter, so moving it by `d` moves
/// the next barycenter by `gain * d`. The sun is fixed and does not contribute.
pub fn feedback_gain<I>(mode: BarycenterMode, sun_mass: f32, body_masses: I) -> f32
where
    I: IntoIterator<Item = f32>,
{
    let body_total: f32 = body_masses.into_iter().sum();
    match mode {
        BarycenterMode::Unnormalized => body_total,
        BarycenterMode::Normalized => body_total / (sun_mass + body_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnormalized_is_weighted_sum() {
        let sun = Vec3::new(1.0, 2.0, 3.0);
        let p1 = Vec3::new(10.0, 0.0, -4.0);
        let p2 = Vec3::new(-6.0, 1.0, 8.0);
        let result = barycenter(
            BarycenterMode::Unnormalized,
            sun,
            2.0,
            [(p1, 0.5), (p2, 0.25)],
        );
        let expected = sun * 2.0 + p1 * 0.5 + p2 * 0.25;
        assert!((result - expected).length() < 1e-6);
    }

    #[test]
    fn test_normalized_divides_by_total_mass() {
        let result = barycenter(
            BarycenterMode::Normalized,
            Vec3::ZERO,
            1.0,
            [(Vec3::new(4.0, 0.0, 0.0), 1.0)],
        );
        assert!((result - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sun_alone() {
        let sun = Vec3::new(0.0, 5.0, 0.0);
        assert_eq!(
            barycenter(BarycenterMode::Unnormalized, sun, 3.0, std::iter::empty()),
            sun * 3.0
        );
        assert_eq!(barycenter(BarycenterMode::Normalized, sun, 3.0, std::iter::empty()), sun);
    }

    #[test]
    fn test_feedback_gain() {
        let masses = [0.01, 0.5, 0.01, 0.01];
        let unnormalized = feedback_gain(BarycenterMode::Unnormalized, 1.0, masses);
        assert!((unnormalized - 0.53).abs() < 1e-6);
        let normalized = feedback_gain(BarycenterMode::Normalized, 1.0, masses);
        assert!((normalized - 0.53 / 1.53).abs() < 1e-6);
        assert!(normalized < 1.0);
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(
            BarycenterMode::from_normalize_flag(false),
            BarycenterMode::Unnormalized
        );
        assert_eq!(
            BarycenterMode::from_normalize_flag(true),
            BarycenterMode::Normalized
        );
        assert_eq!(BarycenterMode::default(), BarycenterMode::Unnormalized);
    }
}

/// Directional lighting.
/// Intensity is computed per vertex during mesh rendering and carried
/// through clipping, so lit triangles shade consistently after being cut.
use glam::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    direction: Vec3,
}

impl DirectionalLight {
    /// `direction` is the direction the light travels, normalized on
    /// construction.
    pub fn new(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Lambert term for a unit surface normal. Surfaces facing against
    /// the travel direction get positive intensity; back sides go
    /// negative and clamp to black when applied.
    #[inline]
    pub fn intensity(&self, normal: Vec3) -> f32 {
        -normal.dot(self.direction)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        // Down and into the scene, lighting faces that look back at the
        // viewer from above.
        Self::new(Vec3::new(0.0, -1.0, 1.0))
    }
}

/// Scales the RGB channels of an ARGB color by a [0, 1] intensity,
/// leaving alpha untouched. Intensity 1.0 returns the color unchanged.
#[inline]
pub fn apply_intensity(color: u32, intensity: f32) -> u32 {
    let scale = (intensity.clamp(0.0, 1.0) * 256.0) as u32;
    let a = color & 0xFF00_0000;
    let r = (((color >> 16) & 0xFF) * scale) >> 8;
    let g = (((color >> 8) & 0xFF) * scale) >> 8;
    let b = ((color & 0xFF) * scale) >> 8;
    a | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_intensity_preserves_color() {
        assert_eq!(apply_intensity(0xFF8040C0, 1.0), 0xFF8040C0);
        assert_eq!(apply_intensity(0x80FFFFFF, 2.5), 0x80FFFFFF);
    }

    #[test]
    fn zero_intensity_blacks_rgb_and_keeps_alpha() {
        assert_eq!(apply_intensity(0xFF8040C0, 0.0), 0xFF000000);
        assert_eq!(apply_intensity(0xFF8040C0, -3.0), 0xFF000000);
    }

    #[test]
    fn half_intensity_halves_channels() {
        assert_eq!(apply_intensity(0xFF804020, 0.5), 0xFF402010);
    }

    #[test]
    fn intensity_follows_facing_direction() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 1.0));
        assert!((light.intensity(Vec3::NEG_Z) - 1.0).abs() < 1e-6);
        assert!((light.intensity(Vec3::Z) + 1.0).abs() < 1e-6);
        assert!(light.intensity(Vec3::X).abs() < 1e-6);
    }

    #[test]
    fn construction_normalizes_direction() {
        let light = DirectionalLight::new(Vec3::new(0.0, 0.0, 10.0));
        assert!((light.direction().length() - 1.0).abs() < 1e-6);
    }
}

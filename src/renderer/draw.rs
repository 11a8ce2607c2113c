//! Draw commands for the 2D reveal scene
//!
//! Shape generators emit these; a backend (the canvas on web) replays them.

use glam::Vec2;

/// Linear RGBA, 0-1 per channel
pub type Rgba = [f32; 4];

/// One primitive to paint
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Filled closed polygon, optional glow (shadow blur in px)
    Polygon {
        points: Vec<Vec2>,
        color: Rgba,
        glow: f32,
    },
    /// Solid disc
    Circle { center: Vec2, radius: f32, color: Rgba },
    /// Disc of `radius` filled with a radial gradient spanning `gradient_radius`
    RadialGlow {
        center: Vec2,
        radius: f32,
        gradient_radius: f32,
        stops: Vec<(f32, Rgba)>,
    },
    /// Stroked circle
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Rgba,
        glow: f32,
    },
    /// Centred glyph
    Glyph {
        center: Vec2,
        glyph: char,
        size: f32,
        color: Rgba,
        glow: f32,
    },
    /// Card back (face down) or front (flipped), centred, 96x144 at scale 1
    Card {
        center: Vec2,
        scale: f32,
        opacity: f32,
        flipped: bool,
        highlight: bool,
    },
}

/// Replace the alpha channel
#[inline]
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for a color
pub fn css(color: Rgba) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        color[3]
    )
}

/// Colors for reveal elements
pub mod colors {
    use super::Rgba;

    const fn hex(rgb: u32) -> Rgba {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    /// Particle palette: violets then ambers
    pub const PARTICLES: [Rgba; 7] = [
        hex(0x8B5CF6),
        hex(0xA78BFA),
        hex(0xC4B5FD),
        hex(0x7C3AED),
        hex(0xF59E0B),
        hex(0xFBBF24),
        hex(0xFCD34D),
    ];

    pub const ARCANE: Rgba = hex(0x8B5CF6);
    pub const RUNE: Rgba = hex(0xA78BFA);
    pub const CHOSEN_GLOW: Rgba = hex(0xF59E0B);
    pub const TRANSPARENT: Rgba = [0.0, 0.0, 0.0, 0.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css() {
        assert_eq!(css([1.0, 0.0, 0.5, 0.25]), "rgba(255, 0, 128, 0.250)");
    }

    #[test]
    fn test_palette_hex() {
        let violet = colors::PARTICLES[0];
        assert!((violet[0] - 139.0 / 255.0).abs() < 1e-6);
        assert!((violet[1] - 92.0 / 255.0).abs() < 1e-6);
        assert!((violet[2] - 246.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(with_alpha(colors::ARCANE, 2.0)[3], 1.0);
        assert_eq!(with_alpha(colors::ARCANE, -1.0)[3], 0.0);
    }
}

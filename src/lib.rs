//! Roll Reveal - an animated "the fates decide" random draw widget
//!
//! Core modules:
//! - `sim`: Deterministic reveal simulation (phase sequencing, particles, table rolls)
//! - `renderer`: Side-effect free draw command generation (+ canvas backend on web)
//! - `audio`: Procedural tone cues via Web Audio
//! - `reveal`: The widget facade callers talk to (accept / reroll / close)
//! - `settings`: Persisted user preferences
//! - `stage`: A page's reveal and table roll sharing one frame loop

pub mod audio;
pub mod error;
pub mod renderer;
pub mod reveal;
pub mod settings;
pub mod sim;
pub mod stage;

pub use error::{Result, RevealError};
pub use reveal::{RevealOptions, ResultView, RollReveal};
pub use settings::Settings;
pub use stage::Stage;

use glam::Vec2;

/// Widget configuration constants
pub mod consts {
    /// Reference frame step the particle tuning was authored against (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed to the simulation (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Particles spawn on a ring around the centre
    pub const SPAWN_RADIUS_MIN: f32 = 50.0;
    pub const SPAWN_RADIUS_SPREAD: f32 = 100.0;
    /// Spawn chance per reference frame at intensity 1.0
    pub const SPAWN_CHANCE: f32 = 0.3;
    /// Life lost per reference frame, divided by the particle's max life
    pub const LIFE_DECAY_PER_FRAME: f32 = 0.016;

    /// Rotation accumulator speed (units per reference frame)
    pub const ROTATION_SLOW: f32 = 2.0;
    pub const ROTATION_FAST: f32 = 8.0;

    /// Arcane circle
    pub const RUNE_COUNT: usize = 12;
    pub const RUNE_RADIUS: f32 = 145.0;

    /// Floating cards
    pub const MIN_CARDS: usize = 5;
    pub const MAX_CARDS: usize = 7;
    pub const CARD_ORBIT_RADIUS: f32 = 120.0;
    pub const CARD_CHAOS_RADIUS: f32 = 60.0;
    pub const CARD_SCATTER_RADIUS: f32 = 300.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Frame count equivalent of `dt` seconds at the reference frame rate
#[inline]
pub fn reference_frames(dt: f32) -> f32 {
    dt / consts::FRAME_DT
}

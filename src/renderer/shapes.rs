//! Shape generation for the reveal scene
//!
//! Everything here reads simulation state and returns draw commands; nothing
//! writes back.

use glam::Vec2;
use std::f32::consts::TAU;

use super::draw::{DrawCmd, colors, with_alpha};
use crate::consts::*;
use crate::polar_to_cartesian;
use crate::sim::{Particle, ParticleKind, Phase, RevealState};

/// Runes around the arcane circle
pub const RUNES: [char; RUNE_COUNT] = [
    'ᚠ', 'ᚢ', 'ᚦ', 'ᚨ', 'ᚱ', 'ᚲ', 'ᚷ', 'ᚹ', 'ᚺ', 'ᚾ', 'ᛁ', 'ᛃ',
];

/// Oscillate between `lo` and `hi` with the given period, starting at `lo`
fn pulse(time: f32, period: f32, lo: f32, hi: f32) -> f32 {
    let t = (1.0 - (time / period * TAU).cos()) * 0.5;
    lo + (hi - lo) * t
}

/// Draw a single particle by kind
pub fn particle(p: &Particle) -> DrawCmd {
    let color = colors::PARTICLES[p.color as usize % colors::PARTICLES.len()];
    let alpha = p.life.clamp(0.0, 1.0);

    match p.kind {
        // Soft glowing orb
        ParticleKind::Orb => DrawCmd::RadialGlow {
            center: p.pos,
            radius: p.size * 2.0,
            gradient_radius: p.size,
            stops: vec![
                (0.0, with_alpha(color, alpha)),
                (0.5, with_alpha(color, alpha * 0.5)),
                (1.0, colors::TRANSPARENT),
            ],
        },
        // Sharp four-point sparkle
        ParticleKind::Spark => DrawCmd::Polygon {
            points: vec![
                p.pos + Vec2::new(0.0, -p.size),
                p.pos + Vec2::new(p.size * 0.3, 0.0),
                p.pos + Vec2::new(0.0, p.size),
                p.pos + Vec2::new(-p.size * 0.3, 0.0),
            ],
            color: with_alpha(color, alpha),
            glow: 10.0,
        },
        // Trail dot shrinks as it fades
        ParticleKind::Trail => DrawCmd::Circle {
            center: p.pos,
            radius: p.size * alpha,
            color: with_alpha(color, alpha * 200.0 / 255.0),
        },
    }
}

/// Draw every live particle, oldest first
pub fn particles(particles: &[Particle]) -> Vec<DrawCmd> {
    particles.iter().map(particle).collect()
}

/// Number of floating cards for a candidate list
pub fn card_count(candidates: usize) -> usize {
    candidates.clamp(MIN_CARDS, MAX_CARDS)
}

/// Where a floating card sits relative to the scene centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPose {
    pub offset: Vec2,
    pub scale: f32,
    pub opacity: f32,
    pub flipped: bool,
}

impl CardPose {
    const HIDDEN: CardPose = CardPose {
        offset: Vec2::new(0.0, 50.0),
        scale: 0.0,
        opacity: 0.0,
        flipped: false,
    };
}

/// Pose of card `index` of `total` for the given phase
pub fn card_pose(
    index: usize,
    total: usize,
    phase: Phase,
    is_chosen: bool,
    rotation: f32,
) -> CardPose {
    let angle = index as f32 / total.max(1) as f32 * TAU;
    // Spiral inward during chaos
    let radius = if phase >= Phase::Chaos {
        CARD_CHAOS_RADIUS
    } else {
        CARD_ORBIT_RADIUS
    };

    match phase {
        Phase::Closed | Phase::Summon => CardPose::HIDDEN,
        // Cards emerge and fan out
        Phase::Emerge => CardPose {
            offset: polar_to_cartesian(radius, angle + rotation * 0.01),
            scale: 1.0,
            opacity: 1.0,
            flipped: false,
        },
        // Spinning faster, pulled in as rotation builds
        Phase::Chaos => CardPose {
            offset: polar_to_cartesian(radius - rotation * 0.3, angle + rotation * 0.05),
            scale: 1.0,
            opacity: 1.0,
            flipped: false,
        },
        // Chosen card moves to center
        _ if is_chosen => CardPose {
            offset: Vec2::ZERO,
            scale: 1.2,
            opacity: 1.0,
            flipped: phase >= Phase::Reveal,
        },
        // Other cards scatter
        _ => CardPose {
            offset: polar_to_cartesian(CARD_SCATTER_RADIUS, angle),
            scale: 0.5,
            opacity: 0.0,
            flipped: false,
        },
    }
}

/// Arcane circle: two glowing rings, a rune ring and a centre glow
pub fn arcane_circle(center: Vec2, phase: Phase, rotation: f32, time: f32) -> Vec<DrawCmd> {
    if phase < Phase::Summon {
        return Vec::new();
    }

    let opacity = pulse(time, 2.0, 0.4, 0.8);
    let spin = rotation.to_radians();
    let mut cmds = Vec::with_capacity(RUNE_COUNT + 3);

    cmds.push(DrawCmd::Ring {
        center,
        radius: 160.0,
        width: 2.0,
        color: with_alpha(colors::ARCANE, 0.5 * opacity),
        glow: 30.0,
    });
    cmds.push(DrawCmd::Ring {
        center,
        radius: 128.0,
        width: 1.0,
        color: with_alpha(colors::RUNE, 0.4 * opacity),
        glow: 20.0,
    });

    for (i, &glyph) in RUNES.iter().enumerate() {
        let angle = i as f32 / RUNE_COUNT as f32 * TAU + spin;
        // Staggered shimmer
        let rune_alpha = pulse(time - i as f32 * 0.1, 1.5, 0.5, 1.0);
        cmds.push(DrawCmd::Glyph {
            center: center + polar_to_cartesian(RUNE_RADIUS, angle),
            glyph,
            size: 20.0,
            color: with_alpha(colors::RUNE, rune_alpha * opacity),
            glow: 10.0,
        });
    }

    let glow_scale = pulse(time, 1.5, 1.0, 1.2);
    cmds.push(DrawCmd::RadialGlow {
        center,
        radius: 64.0 * glow_scale,
        gradient_radius: 64.0 * glow_scale,
        stops: vec![
            (0.0, with_alpha(colors::ARCANE, 0.4 * pulse(time, 1.5, 0.5, 0.8))),
            (0.7, colors::TRANSPARENT),
        ],
    });

    cmds
}

/// Floating cards for the current run
pub fn cards(state: &RevealState, center: Vec2) -> Vec<DrawCmd> {
    let Some(chosen) = state.chosen_index else {
        return Vec::new();
    };
    let total = card_count(state.candidate_count);
    let chosen_slot = chosen % total;

    (0..total)
        .map(|i| {
            let pose = card_pose(i, total, state.phase, i == chosen_slot, state.rotation);
            DrawCmd::Card {
                center: center + pose.offset,
                scale: pose.scale,
                opacity: pose.opacity,
                flipped: pose.flipped,
                highlight: i == chosen_slot && state.phase >= Phase::Draw,
            }
        })
        .filter(|cmd| !matches!(cmd, DrawCmd::Card { opacity, .. } if *opacity <= 0.0))
        .collect()
}

/// Full scene, back to front. `time` is seconds since the widget opened.
pub fn scene(state: &RevealState, center: Vec2, time: f32) -> Vec<DrawCmd> {
    if !state.phase.is_animating() {
        return Vec::new();
    }
    let mut cmds = particles(&state.particles.particles);
    cmds.extend(arcane_circle(center, state.phase, state.rotation, time));
    cmds.extend(cards(state, center));
    cmds
}

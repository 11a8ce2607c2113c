//! Reveal phases and the transition schedule
//!
//! A run walks the phases strictly forward. Every transition of a run lives in
//! one table so that a single cursor (and a single cancellation point) drives
//! them all.

use serde::{Deserialize, Serialize};

use crate::audio::ToneCue;
use crate::consts::{ROTATION_FAST, ROTATION_SLOW};

/// Stage of the reveal animation, ordered by progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Widget not running
    Closed,
    /// Arcane circle fades in
    Summon,
    /// Cards fan out and orbit
    Emerge,
    /// Cards spin inward, particle storm
    Chaos,
    /// Chosen card pulled to the centre
    Draw,
    /// Chosen card flips
    Reveal,
    /// Result shown, waiting for accept/reroll
    Settled,
}

impl Phase {
    /// Any phase between `Summon` and `Reveal` inclusive
    pub fn is_animating(self) -> bool {
        self > Phase::Closed && self < Phase::Settled
    }

    /// Particle spawn/speed multiplier (0 = no particle field)
    pub fn intensity(self) -> f32 {
        match self {
            Phase::Chaos => 2.0,
            p if p.is_animating() => 1.0,
            _ => 0.0,
        }
    }

    /// Rotation accumulator advance per reference frame
    pub fn rotation_speed(self) -> f32 {
        match self {
            Phase::Emerge | Phase::Draw => ROTATION_SLOW,
            Phase::Chaos => ROTATION_FAST,
            _ => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Closed => "closed",
            Phase::Summon => "summon",
            Phase::Emerge => "emerge",
            Phase::Chaos => "chaos",
            Phase::Draw => "draw",
            Phase::Reveal => "reveal",
            Phase::Settled => "settled",
        }
    }
}

/// One scheduled transition of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep {
    pub phase: Phase,
    /// Milliseconds after the run started
    pub at_ms: f64,
    pub cue: Option<ToneCue>,
}

/// The full run timeline. Offsets are strictly increasing.
///
/// `Reveal` is the card flip and stays silent; the shimmer plays once the
/// result is on screen.
pub const PHASE_SCHEDULE: [PhaseStep; 6] = [
    PhaseStep {
        phase: Phase::Summon,
        at_ms: 0.0,
        cue: Some(ToneCue::Summon),
    },
    PhaseStep {
        phase: Phase::Emerge,
        at_ms: 600.0,
        cue: Some(ToneCue::Whoosh),
    },
    PhaseStep {
        phase: Phase::Chaos,
        at_ms: 1400.0,
        cue: Some(ToneCue::Chaos),
    },
    PhaseStep {
        phase: Phase::Draw,
        at_ms: 2900.0,
        cue: Some(ToneCue::Draw),
    },
    PhaseStep {
        phase: Phase::Reveal,
        at_ms: 3500.0,
        cue: None,
    },
    PhaseStep {
        phase: Phase::Settled,
        at_ms: 4100.0,
        cue: Some(ToneCue::Reveal),
    },
];

/// Total run length in milliseconds
pub fn run_duration_ms() -> f64 {
    PHASE_SCHEDULE[PHASE_SCHEDULE.len() - 1].at_ms
}

//! Reveal state and core simulation types
//!
//! Everything one widget instance mutates lives here. Nothing outlives a run
//! except the RNG and the run counter.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particles::ParticleField;
use super::phase::Phase;
use crate::audio::ToneCue;

/// Something the platform layer should react to (sound, logging, UI)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealEvent {
    /// A new run drew its candidate
    RunStarted { run: u32, chosen_index: usize },
    /// The phase changed (including the drop back to `Closed`)
    PhaseChanged { run: u32, phase: Phase },
    /// A transition asked for a tone cue
    Cue(ToneCue),
}

/// Cursor into the phase schedule of one run
///
/// Holding `None` in [`RevealState::pending`] means no transition can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub run: u32,
    /// Index of the next `PHASE_SCHEDULE` entry to fire
    pub next: usize,
}

/// Complete widget state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct RevealState {
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    /// Current phase
    pub phase: Phase,
    /// Candidates in the current run
    pub candidate_count: usize,
    /// Drawn once per run
    pub chosen_index: Option<usize>,
    /// Drives continuous visual motion; reset each run
    pub rotation: f32,
    /// Milliseconds since the current run started
    pub elapsed_ms: f64,
    /// Run counter, bumped on every start
    pub run: u32,
    /// Set from start until `Settled`; blocks overlapping starts
    pub in_progress: bool,
    /// Skip the timeline and settle immediately
    pub reduced_motion: bool,
    /// Pending transitions of the current run
    pub pending: Option<Schedule>,
    /// Visual particles (not outcome-affecting)
    pub particles: ParticleField,
    /// Events since the last drain
    events: Vec<RevealEvent>,
}

impl RevealState {
    /// Create a closed widget state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Closed,
            candidate_count: 0,
            chosen_index: None,
            rotation: 0.0,
            elapsed_ms: 0.0,
            run: 0,
            in_progress: false,
            reduced_motion: false,
            pending: None,
            particles: ParticleField::new(Vec2::ZERO),
            events: Vec::new(),
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// True once the result may be shown and acted upon
    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled && self.chosen_index.is_some()
    }

    pub fn push_event(&mut self, event: RevealEvent) {
        self.events.push(event);
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<RevealEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter `phase`, emitting a change event if it differs
    pub(super) fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            let run = self.run;
            self.push_event(RevealEvent::PhaseChanged { run, phase });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_closed() {
        let state = RevealState::new(1);
        assert_eq!(state.phase, Phase::Closed);
        assert!(state.pending.is_none());
        assert!(!state.in_progress);
        assert!(!state.is_settled());
    }

    #[test]
    fn test_enter_emits_only_on_change() {
        let mut state = RevealState::new(1);
        state.enter(Phase::Closed);
        assert!(state.drain_events().is_empty());
        state.enter(Phase::Summon);
        assert_eq!(
            state.drain_events(),
            vec![RevealEvent::PhaseChanged {
                run: 0,
                phase: Phase::Summon
            }]
        );
        assert!(state.drain_events().is_empty());
    }
}

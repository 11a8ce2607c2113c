//! Run control and the per-frame tick
//!
//! `tick` is the only scheduler: it walks `PHASE_SCHEDULE` with the run's
//! cursor. Cancelling a run is dropping that cursor.

use rand::Rng;

use super::phase::{PHASE_SCHEDULE, Phase};
use super::state::{RevealEvent, RevealState, Schedule};
use crate::consts::MAX_FRAME_DT;
use crate::error::{Result, RevealError};
use crate::reference_frames;

/// Start a run over `candidate_count` candidates.
///
/// Returns `Ok(false)` without touching anything when a run is already in
/// progress.
pub fn start(state: &mut RevealState, candidate_count: usize) -> Result<bool> {
    if candidate_count == 0 {
        return Err(RevealError::NoCandidates);
    }
    if state.in_progress {
        log::debug!("Start ignored, run {} still in progress", state.run);
        return Ok(false);
    }

    // Drop anything left over from a previous run
    state.pending = None;
    state.particles.clear();

    state.run = state.run.wrapping_add(1);
    state.candidate_count = candidate_count;
    state.rotation = 0.0;
    state.elapsed_ms = 0.0;

    let chosen = state.rng().random_range(0..candidate_count);
    state.chosen_index = Some(chosen);
    let run = state.run;
    state.push_event(RevealEvent::RunStarted {
        run,
        chosen_index: chosen,
    });
    log::info!("Run {} started: {} candidates, chose #{}", run, candidate_count, chosen);

    if state.reduced_motion {
        // No timeline, no particles, no cues
        state.enter(Phase::Settled);
        return Ok(true);
    }

    state.in_progress = true;
    state.pending = Some(Schedule { run, next: 0 });
    fire_due(state);
    Ok(true)
}

/// Cancel every pending transition and close
pub fn reset(state: &mut RevealState) {
    if state.pending.take().is_some() {
        log::debug!("Run {} cancelled in {}", state.run, state.phase.as_str());
    }
    state.in_progress = false;
    state.chosen_index = None;
    state.particles.clear();
    state.enter(Phase::Closed);
}

/// Restart with the same candidates. A no-op while a run is in progress.
pub fn reroll(state: &mut RevealState) -> Result<bool> {
    if state.in_progress {
        log::debug!("Reroll ignored, run {} still in progress", state.run);
        return Ok(false);
    }
    let count = state.candidate_count;
    if count == 0 {
        return Err(RevealError::NoCandidates);
    }
    reset(state);
    start(state, count)
}

/// Fire schedule entry `step` of `run`.
///
/// Stale or out-of-order firings (a cancelled run, an entry already
/// consumed) are ignored and return false.
pub fn fire_step(state: &mut RevealState, run: u32, step: usize) -> bool {
    let Some(pending) = state.pending else {
        return false;
    };
    if pending.run != run || pending.next != step || step >= PHASE_SCHEDULE.len() {
        return false;
    }

    let entry = PHASE_SCHEDULE[step];
    state.enter(entry.phase);
    if let Some(cue) = entry.cue {
        state.push_event(RevealEvent::Cue(cue));
    }
    log::debug!("Run {} -> {} at {}ms", run, entry.phase.as_str(), entry.at_ms);

    if step + 1 < PHASE_SCHEDULE.len() {
        state.pending = Some(Schedule { run, next: step + 1 });
    } else {
        state.pending = None;
        state.in_progress = false;
        state.particles.clear();
        log::info!("Run {} settled on #{:?}", run, state.chosen_index);
    }
    true
}

/// Fire every transition whose offset has been reached
fn fire_due(state: &mut RevealState) {
    while let Some(Schedule { run, next }) = state.pending {
        if PHASE_SCHEDULE[next].at_ms > state.elapsed_ms {
            break;
        }
        fire_step(state, run, next);
    }
}

/// Advance the widget by `dt` seconds
pub fn tick(state: &mut RevealState, dt: f32) {
    if state.pending.is_some() {
        state.elapsed_ms += f64::from(dt) * 1000.0;
        fire_due(state);
    }

    let phase = state.phase;
    let frame_dt = dt.min(MAX_FRAME_DT);
    state.rotation += phase.rotation_speed() * reference_frames(frame_dt);

    let intensity = phase.intensity();
    if intensity > 0.0 {
        let mut particles = std::mem::take(&mut state.particles);
        particles.step(intensity, frame_dt, state.rng());
        state.particles = particles;
    } else if !state.particles.is_empty() {
        state.particles.clear();
    }
}

//! Deterministic reveal simulation
//!
//! All reveal logic lives here. This module must stay pure:
//! - Time only advances through `tick(dt)`
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies

pub mod particles;
pub mod phase;
pub mod slot;
pub mod state;
pub mod tick;

pub use particles::{Particle, ParticleField, ParticleKind, advance};
pub use phase::{PHASE_SCHEDULE, Phase, PhaseStep};
pub use slot::{SlotPhase, SlotRoll};
pub use state::{RevealEvent, RevealState, Schedule};
pub use tick::{fire_step, reroll, reset, start, tick};

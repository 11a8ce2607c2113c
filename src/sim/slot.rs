//! Slot-machine style reveal for random table rolls
//!
//! The result is known up front; the spin only dresses it up. Numbers flicker
//! quickly, slow down past 60% of the spin, then land on the real roll.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Total spin length
pub const SPIN_DURATION_MS: f64 = 1500.0;
/// First redraw delay
pub const START_STEP_MS: f64 = 30.0;
/// Delay growth per redraw once slowing
pub const STEP_GROWTH_MS: f64 = 20.0;
/// Slowest redraw delay
pub const MAX_STEP_MS: f64 = 300.0;
/// Die used when the die label cannot be read
pub const DEFAULT_DIE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlotPhase {
    Spinning,
    Slowing,
    Result,
}

/// Parse "d20" / "D6" style labels; anything unreadable is a d20
pub fn parse_die_size(die_type: &str) -> u32 {
    let digits: String = die_type
        .chars()
        .skip(1)
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => DEFAULT_DIE,
    }
}

/// One table roll being revealed
#[derive(Debug, Clone)]
pub struct SlotRoll {
    pub table_name: String,
    pub roll_value: u32,
    pub result_text: String,
    pub die_size: u32,
    pub phase: SlotPhase,
    /// Number currently on the die face
    pub display: u32,
    /// Spin time consumed by redraws so far
    pub elapsed_ms: f64,
    step_ms: f64,
    /// Time left until the next redraw
    wait_ms: f64,
    rng: Pcg32,
}

impl SlotRoll {
    pub fn new(
        table_name: impl Into<String>,
        roll_value: u32,
        result_text: impl Into<String>,
        die_type: &str,
        seed: u64,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            roll_value,
            result_text: result_text.into(),
            die_size: parse_die_size(die_type),
            phase: SlotPhase::Spinning,
            display: 1,
            elapsed_ms: 0.0,
            step_ms: START_STEP_MS,
            wait_ms: START_STEP_MS,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == SlotPhase::Result
    }

    /// Backdrop clicks only dismiss a finished roll
    pub fn backdrop_closes(&self) -> bool {
        self.is_done()
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.is_done() {
            return;
        }
        self.wait_ms -= f64::from(dt) * 1000.0;
        while self.wait_ms <= 0.0 && !self.is_done() {
            self.redraw();
            self.wait_ms += self.step_ms;
        }
    }

    fn redraw(&mut self) {
        self.elapsed_ms += self.step_ms;
        self.display = self.rng.random_range(1..=self.die_size);

        if self.elapsed_ms >= SPIN_DURATION_MS * 0.6 {
            self.phase = SlotPhase::Slowing;
            self.step_ms = (self.step_ms + STEP_GROWTH_MS).min(MAX_STEP_MS);
        }
        if self.elapsed_ms >= SPIN_DURATION_MS {
            self.display = self.roll_value;
            self.phase = SlotPhase::Result;
            log::debug!("{} landed on {}", self.table_name, self.roll_value);
        }
    }

    /// Text placed on the clipboard by the copy action
    pub fn copy_text(&self) -> String {
        format!(
            "{}: {} (rolled {})",
            self.table_name, self.result_text, self.roll_value
        )
    }
}
